use trayward_core::{ActionError, ActionResult, WindowActions, WindowHandle};

use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    GetClassNameW, GetWindowTextLengthW, GetWindowTextW, IsWindow, PostMessageW, SC_CLOSE,
    SW_HIDE, ShowWindowAsync, WM_CLOSE, WM_SYSCOMMAND,
};

/// [`WindowActions`] implemented with posted window messages.
///
/// Every request is asynchronous: `Ok(true)` only means the message was
/// queued. Whether the window reacted is for the caller to verify.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Actions;

impl WindowActions for Win32Actions {
    fn request_close(&self, handle: WindowHandle) -> ActionResult {
        let hwnd = valid_window(handle)?;

        // SAFETY: PostMessageW only queues a message for a live window.
        let posted = unsafe {
            PostMessageW(
                Some(hwnd),
                WM_SYSCOMMAND,
                WPARAM(SC_CLOSE as usize),
                LPARAM(0),
            )
        };
        if posted.is_ok() {
            return Ok(true);
        }

        // Some windows drop SC_CLOSE from their system menu.
        // SAFETY: as above.
        unsafe { PostMessageW(Some(hwnd), WM_CLOSE, WPARAM(0), LPARAM(0)) }
            .map(|()| true)
            .map_err(|e| ActionError::Os {
                request: "close",
                reason: e.to_string(),
            })
    }

    fn request_hide(&self, handle: WindowHandle) -> ActionResult {
        let hwnd = valid_window(handle)?;

        // SAFETY: ShowWindowAsync posts a show-state change and never
        // blocks on the target's message loop.
        let accepted = unsafe { ShowWindowAsync(hwnd, SW_HIDE) }.as_bool();
        Ok(accepted)
    }
}

fn valid_window(handle: WindowHandle) -> Result<HWND, ActionError> {
    if !is_window(handle) {
        return Err(ActionError::InvalidWindow(handle));
    }
    Ok(HWND(handle as *mut _))
}

/// Whether `handle` names an existing window, shown or hidden.
pub fn is_window(handle: WindowHandle) -> bool {
    // SAFETY: IsWindow accepts any value and only reports validity.
    handle != 0 && unsafe { IsWindow(Some(HWND(handle as *mut _))) }.as_bool()
}

/// Reads the window title. Empty when the window has none.
pub fn window_text(hwnd: HWND) -> String {
    // SAFETY: GetWindowTextLengthW and GetWindowTextW read window text
    // into a buffer sized from the reported length.
    unsafe {
        let length = GetWindowTextLengthW(hwnd);
        if length <= 0 {
            return String::new();
        }

        // +1 for the null terminator that Windows requires
        let mut buffer = vec![0u16; (length + 1) as usize];
        let copied = GetWindowTextW(hwnd, &mut buffer);
        String::from_utf16_lossy(&buffer[..copied.max(0) as usize])
    }
}

/// Reads the registered class name of the window.
pub fn class_name(hwnd: HWND) -> String {
    // 256 is the maximum class name length in Win32.
    let mut buffer = [0u16; 256];
    // SAFETY: the buffer length bounds the write.
    let length = unsafe { GetClassNameW(hwnd, &mut buffer) };
    String::from_utf16_lossy(&buffer[..length.max(0) as usize])
}
