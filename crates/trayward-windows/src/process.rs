use windows::Win32::Foundation::CloseHandle;
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
    QueryFullProcessImageNameW,
};
use windows::core::PWSTR;

/// Checks whether a process with the given PID is still alive.
///
/// Used to tell a live Trayward instance from a stale PID file.
pub fn is_process_alive(pid: u32) -> bool {
    // SAFETY: PROCESS_QUERY_LIMITED_INFORMATION is the least-privilege
    // access right that still confirms the process exists.
    let result = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) };

    match result {
        Ok(handle) => {
            // SAFETY: opened above only to check existence.
            unsafe {
                let _ = CloseHandle(handle);
            }
            true
        }
        Err(_) => false,
    }
}

/// Returns `(name, path)` of a process image, the name without extension.
///
/// `None` when the process cannot be opened, which is common for
/// elevated or protected processes.
pub fn image_info(pid: u32) -> Option<(String, String)> {
    if pid == 0 {
        return None;
    }
    // SAFETY: the handle is closed before returning; the buffer size is
    // passed in and updated by QueryFullProcessImageNameW.
    let path = unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid).ok()?;
        let mut buffer = [0u16; 1024];
        let mut size = buffer.len() as u32;
        let result = QueryFullProcessImageNameW(
            handle,
            PROCESS_NAME_WIN32,
            PWSTR(buffer.as_mut_ptr()),
            &mut size,
        );
        let _ = CloseHandle(handle);
        result.ok()?;
        String::from_utf16_lossy(&buffer[..size as usize])
    };

    let name = trayward_core::matcher::Identity::from_exe_path(&path).name;
    Some((name, path))
}
