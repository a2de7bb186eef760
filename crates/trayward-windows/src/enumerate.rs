use trayward_core::{ManagedWindowInfo, WindowEnumerator, WindowHandle};

use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GW_OWNER, GWL_EXSTYLE, GetForegroundWindow, GetWindow,
    GetWindowLongPtrW, GetWindowThreadProcessId, IsIconic, IsWindowVisible, WS_EX_TOOLWINDOW,
};
use windows::core::BOOL;

use crate::process;
use crate::window::{self, class_name, window_text};

/// [`WindowEnumerator`] over the visible top-level windows of the desktop.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Enumerator;

impl WindowEnumerator for Win32Enumerator {
    fn enumerate(&self) -> Vec<ManagedWindowInfo> {
        match enumerate_windows() {
            Ok(windows) => windows,
            Err(e) => {
                trayward_core::log_warn!("window enumeration failed: {e}");
                Vec::new()
            }
        }
    }

    fn is_window(&self, handle: WindowHandle) -> bool {
        window::is_window(handle)
    }

    fn owner_of(&self, handle: WindowHandle) -> WindowHandle {
        if !window::is_window(handle) {
            return 0;
        }
        owner(HWND(handle as *mut _))
    }
}

struct Collector {
    foreground: HWND,
    windows: Vec<ManagedWindowInfo>,
}

/// Snapshots every visible top-level window, in Z-order.
pub fn enumerate_windows() -> windows::core::Result<Vec<ManagedWindowInfo>> {
    let mut collector = Collector {
        // SAFETY: GetForegroundWindow only reads desktop state.
        foreground: unsafe { GetForegroundWindow() },
        windows: Vec::new(),
    };

    // SAFETY: EnumWindows runs synchronously, so the collector outlives
    // every callback that receives a pointer to it.
    unsafe {
        EnumWindows(
            Some(enum_window_callback),
            LPARAM(&mut collector as *mut _ as isize),
        )?;
    }

    Ok(collector.windows)
}

unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the Collector passed by enumerate_windows().
    let collector = unsafe { &mut *(lparam.0 as *mut Collector) };

    // SAFETY: read-only window state query.
    if unsafe { IsWindowVisible(hwnd) }.as_bool() {
        collector
            .windows
            .push(describe(hwnd, hwnd == collector.foreground));
    }

    BOOL(1)
}

fn describe(hwnd: HWND, is_foreground: bool) -> ManagedWindowInfo {
    let mut pid = 0u32;
    // SAFETY: all calls below only read state of a live window handle.
    let (ex_style, is_minimized) = unsafe {
        GetWindowThreadProcessId(hwnd, Some(&mut pid));
        let ex_style = GetWindowLongPtrW(hwnd, GWL_EXSTYLE) as u32;
        (ex_style, IsIconic(hwnd).as_bool())
    };
    let (process_name, process_path) = process::image_info(pid).unwrap_or_default();

    ManagedWindowInfo {
        handle: hwnd.0 as usize,
        process_id: pid,
        process_name,
        process_path,
        title: window_text(hwnd),
        class_name: class_name(hwnd),
        is_visible: true,
        is_minimized,
        is_foreground,
        owner_handle: owner(hwnd),
        is_tool_window: (ex_style & WS_EX_TOOLWINDOW.0) != 0,
    }
}

/// Owner of `hwnd`, `0` when it has none.
fn owner(hwnd: HWND) -> WindowHandle {
    // SAFETY: GetWindow only reads the window's owner link.
    unsafe { GetWindow(hwnd, GW_OWNER) }.map_or(0, |h| h.0 as usize)
}
