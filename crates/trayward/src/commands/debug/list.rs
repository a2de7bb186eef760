use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use trayward_core::{ManagedWindowInfo, WindowEnumerator};

/// Prints the current window snapshot exactly as the matcher sees it.
pub fn execute() {
    let windows = enumerator().enumerate();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("HWND"),
            Cell::new("PID").set_alignment(CellAlignment::Right),
            Cell::new("Process"),
            Cell::new("Title"),
            Cell::new("Class"),
            Cell::new("Flags"),
        ]);

    for window in &windows {
        table.add_row(vec![
            Cell::new(format!("0x{:X}", window.handle)),
            Cell::new(window.process_id).set_alignment(CellAlignment::Right),
            Cell::new(&window.process_name),
            Cell::new(&window.title),
            Cell::new(&window.class_name),
            Cell::new(flags(window)),
        ]);
    }

    println!("{table}");
    println!("\n{} windows found", windows.len());
}

fn flags(window: &ManagedWindowInfo) -> String {
    let mut flags = Vec::new();
    if window.is_foreground {
        flags.push("fg".to_string());
    }
    if window.is_minimized {
        flags.push("min".to_string());
    }
    if window.is_tool_window {
        flags.push("tool".to_string());
    }
    if window.owner_handle != 0 {
        flags.push(format!("owner=0x{:X}", window.owner_handle));
    }
    flags.join(" ")
}

#[cfg(windows)]
fn enumerator() -> impl WindowEnumerator {
    trayward_windows::Win32Enumerator
}

#[cfg(not(windows))]
fn enumerator() -> impl WindowEnumerator {
    trayward_core::NullEnumerator
}
