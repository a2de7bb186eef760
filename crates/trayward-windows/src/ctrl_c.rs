//! Console control handler using `SetConsoleCtrlHandler`.
//!
//! Ctrl+C, Ctrl+Break and closing the console all cancel the run.

use std::sync::OnceLock;

use trayward_core::CancelToken;
use windows::Win32::System::Console::{
    CTRL_BREAK_EVENT, CTRL_C_EVENT, CTRL_CLOSE_EVENT, SetConsoleCtrlHandler,
};

/// Token cancelled by the handler. Written once by `set_handler`.
static TOKEN: OnceLock<CancelToken> = OnceLock::new();

/// Registers a handler that cancels `token` on the first console signal.
pub fn set_handler(token: CancelToken) -> Result<(), String> {
    TOKEN
        .set(token)
        .map_err(|_| "console handler already registered".to_string())?;
    // SAFETY: `handler` is a valid `extern "system"` callback for the
    // lifetime of the process.
    unsafe { SetConsoleCtrlHandler(Some(handler), true) }
        .map_err(|e| format!("failed to set console handler: {e}"))
}

unsafe extern "system" fn handler(ctrl_type: u32) -> windows::core::BOOL {
    if matches!(ctrl_type, CTRL_C_EVENT | CTRL_BREAK_EVENT | CTRL_CLOSE_EVENT)
        && let Some(token) = TOKEN.get()
    {
        trayward_core::log_info!("console signal {ctrl_type}: cancelling");
        token.cancel();
        return windows::core::BOOL(1);
    }
    windows::core::BOOL(0)
}
