//! Logon autostart through the per-user `Run` key.
//!
//! The `Trayward` value under
//! `HKEY_CURRENT_USER\Software\Microsoft\Windows\CurrentVersion\Run`
//! holds `"<exe>" run --background`. HKCU needs no elevation.

use windows::Win32::Foundation::ERROR_FILE_NOT_FOUND;
use windows::Win32::System::Registry::{
    HKEY, HKEY_CURRENT_USER, KEY_QUERY_VALUE, KEY_SET_VALUE, REG_SAM_FLAGS, REG_SZ, RegCloseKey,
    RegDeleteValueW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW,
};
use windows::core::PCWSTR;

const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";
const VALUE_NAME: &str = "Trayward";

/// Arguments appended to the executable path in the Run value.
const RUN_ARGS: &str = "run --background";

/// Registers the current executable to run at logon.
///
/// Overwrites any previous value, so a moved executable is picked up.
pub fn enable() -> Result<(), String> {
    let exe = std::env::current_exe().map_err(|e| format!("could not resolve exe path: {e}"))?;
    RunKey::open(KEY_SET_VALUE)?.write(&run_command(&exe.display().to_string()))
}

/// Removes the Run value. Succeeds when there was nothing to remove.
pub fn disable() -> Result<(), String> {
    RunKey::open(KEY_SET_VALUE)?.delete()
}

pub fn is_enabled() -> bool {
    registered_command().is_some()
}

/// The quoted executable path followed by [`RUN_ARGS`].
pub fn run_command(exe_path: &str) -> String {
    format!("\"{exe_path}\" {RUN_ARGS}")
}

/// Current Run value, if any.
pub fn registered_command() -> Option<String> {
    RunKey::open(KEY_QUERY_VALUE).ok()?.read()
}

/// Open handle to the HKCU Run key, closed on drop.
struct RunKey(HKEY);

impl RunKey {
    fn open(access: REG_SAM_FLAGS) -> Result<Self, String> {
        let path = wide(RUN_KEY);
        let mut key = HKEY::default();
        // SAFETY: `path` is NUL-terminated and outlives the call; `key`
        // receives the opened handle.
        let status = unsafe {
            RegOpenKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR(path.as_ptr()),
                None,
                access,
                &mut key,
            )
        };
        if status.is_err() {
            return Err(format!("could not open registry key: {status:?}"));
        }
        Ok(Self(key))
    }

    fn write(&self, value: &str) -> Result<(), String> {
        let name = wide(VALUE_NAME);
        let data: Vec<u8> = wide(value).iter().flat_map(|c| c.to_le_bytes()).collect();
        // SAFETY: `name` is NUL-terminated; REG_SZ data includes its NUL.
        let status = unsafe {
            RegSetValueExW(
                self.0,
                PCWSTR(name.as_ptr()),
                None,
                REG_SZ,
                Some(data.as_slice()),
            )
        };
        if status.is_err() {
            return Err(format!("could not write registry value: {status:?}"));
        }
        Ok(())
    }

    fn delete(&self) -> Result<(), String> {
        let name = wide(VALUE_NAME);
        // SAFETY: `name` is NUL-terminated.
        let status = unsafe { RegDeleteValueW(self.0, PCWSTR(name.as_ptr())) };
        if status.is_ok() || status == ERROR_FILE_NOT_FOUND {
            return Ok(());
        }
        Err(format!("could not delete registry value: {status:?}"))
    }

    /// Reads the value as a string: one call for its size, one for the data.
    fn read(&self) -> Option<String> {
        let name = wide(VALUE_NAME);
        let mut size = 0u32;
        // SAFETY: a null data pointer only asks for the size in bytes.
        let status = unsafe {
            RegQueryValueExW(
                self.0,
                PCWSTR(name.as_ptr()),
                None,
                None,
                None,
                Some(&raw mut size),
            )
        };
        if status.is_err() {
            return None;
        }

        let mut buffer = vec![0u16; (size as usize).div_ceil(2)];
        // SAFETY: `size` is the byte length of `buffer`, which bounds the write.
        let status = unsafe {
            RegQueryValueExW(
                self.0,
                PCWSTR(name.as_ptr()),
                None,
                None,
                Some(buffer.as_mut_ptr().cast()),
                Some(&raw mut size),
            )
        };
        if status.is_err() {
            return None;
        }
        buffer.truncate((size as usize / 2).min(buffer.len()));
        Some(decode(&buffer))
    }
}

impl Drop for RunKey {
    fn drop(&mut self) {
        // SAFETY: the handle came from RegOpenKeyExW and is closed once.
        let _ = unsafe { RegCloseKey(self.0) };
    }
}

/// NUL-terminated UTF-16 for the registry APIs.
fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// REG_SZ data back to a string, without its trailing NULs.
fn decode(data: &[u16]) -> String {
    String::from_utf16_lossy(data)
        .trim_end_matches('\0')
        .to_string()
}
