use thiserror::Error;

/// Raw top-level window handle (pointer-sized integer).
///
/// Kept as a plain integer so the core never depends on a platform crate.
/// Zero means "no window".
pub type WindowHandle = usize;

/// A snapshot of one top-level window at one instant.
///
/// Produced fresh by every [`WindowEnumerator::enumerate`] call and never
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedWindowInfo {
    pub handle: WindowHandle,
    pub process_id: u32,
    /// Executable file name without extension (e.g. `notepad`).
    pub process_name: String,
    /// Full path of the owning process image.
    pub process_path: String,
    pub title: String,
    pub class_name: String,
    pub is_visible: bool,
    pub is_minimized: bool,
    pub is_foreground: bool,
    /// Owner window handle, `0` if unowned.
    pub owner_handle: WindowHandle,
    /// Whether the window carries the tool-window extended style.
    pub is_tool_window: bool,
}

/// Error returned when the OS refuses a window action.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("target window 0x{0:X} is not valid")]
    InvalidWindow(WindowHandle),
    #[error("{request} failed: {reason}")]
    Os {
        request: &'static str,
        reason: String,
    },
}

/// Result of an action request.
///
/// `Ok(true)` means the OS accepted the request, not that the window has
/// changed state. `Ok(false)` is a silent rejection.
pub type ActionResult = Result<bool, ActionError>;

/// Snapshots the visible top-level windows and answers live queries about
/// windows the snapshot leaves out.
pub trait WindowEnumerator: Send + Sync {
    fn enumerate(&self) -> Vec<ManagedWindowInfo>;

    /// Whether `handle` still names a window, visible or not.
    fn is_window(&self, handle: WindowHandle) -> bool;

    /// Owner of a live window. `0` when unowned or no longer a window.
    fn owner_of(&self, handle: WindowHandle) -> WindowHandle;
}

/// Applies imperative actions to a window.
pub trait WindowActions: Send + Sync {
    /// Asks the window to close itself (tray-aware apps may hide instead).
    fn request_close(&self, handle: WindowHandle) -> ActionResult;

    /// Forces the window hidden without destroying it.
    fn request_hide(&self, handle: WindowHandle) -> ActionResult;
}

/// Enumerator bound on platforms without window management. Sees nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEnumerator;

impl WindowEnumerator for NullEnumerator {
    fn enumerate(&self) -> Vec<ManagedWindowInfo> {
        Vec::new()
    }

    fn is_window(&self, _handle: WindowHandle) -> bool {
        false
    }

    fn owner_of(&self, _handle: WindowHandle) -> WindowHandle {
        0
    }
}

/// Action executor bound on platforms without window management.
///
/// Rejects every request without an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullActions;

impl WindowActions for NullActions {
    fn request_close(&self, _handle: WindowHandle) -> ActionResult {
        Ok(false)
    }

    fn request_hide(&self, _handle: WindowHandle) -> ActionResult {
        Ok(false)
    }
}

/// Formats a window for log lines.
pub fn describe_window(window: &ManagedWindowInfo) -> String {
    fn or_empty(s: &str) -> &str {
        if s.is_empty() { "<empty>" } else { s }
    }

    format!(
        "hwnd=0x{:X} pid={} process={} title={:?} class={:?} min={} fg={} owner=0x{:X} tool={}",
        window.handle,
        window.process_id,
        or_empty(&window.process_name),
        or_empty(&window.title),
        or_empty(&window.class_name),
        window.is_minimized,
        window.is_foreground,
        window.owner_handle,
        window.is_tool_window,
    )
}
