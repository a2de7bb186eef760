#![cfg(windows)]

/// Logon autostart via the HKCU Run key.
pub mod autostart;

/// Console signal handling.
pub mod ctrl_c;

/// Win32 window enumeration.
pub mod enumerate;

/// Process utilities (alive check, image path).
pub mod process;

/// Close and hide requests against a Win32 `HWND`.
pub mod window;

pub use enumerate::{Win32Enumerator, enumerate_windows};
pub use window::Win32Actions;
