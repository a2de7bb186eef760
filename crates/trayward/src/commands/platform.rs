//! Binds the orchestration core to the host platform.
//!
//! Windows gets the Win32 enumerator and action executor. Elsewhere the
//! null collaborators are used: launching still works, window management
//! finds nothing.

use trayward_core::{CancelToken, CommandLauncher, FileLog, Service};

#[cfg(windows)]
pub fn service() -> Service {
    Service::new(
        Box::new(trayward_windows::Win32Enumerator),
        Box::new(trayward_windows::Win32Actions),
        Box::new(CommandLauncher),
        Box::new(FileLog),
    )
}

#[cfg(not(windows))]
pub fn service() -> Service {
    trayward_core::log_warn!("window management is only available on Windows");
    Service::new(
        Box::new(trayward_core::NullEnumerator),
        Box::new(trayward_core::NullActions),
        Box::new(CommandLauncher),
        Box::new(FileLog),
    )
}

/// Cancels `token` on Ctrl+C.
#[cfg(windows)]
pub fn cancel_on_ctrl_c(token: &CancelToken) {
    if let Err(e) = trayward_windows::ctrl_c::set_handler(token.clone()) {
        trayward_core::log_warn!("{e}");
    }
}

#[cfg(not(windows))]
pub fn cancel_on_ctrl_c(_token: &CancelToken) {}

#[cfg(windows)]
pub fn is_process_alive(pid: u32) -> bool {
    trayward_windows::process::is_process_alive(pid)
}

/// Without a process query, a leftover PID file is treated as stale.
#[cfg(not(windows))]
pub fn is_process_alive(_pid: u32) -> bool {
    false
}
