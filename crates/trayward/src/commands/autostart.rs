/// Manages running Trayward at logon.
///
/// Delegates to [`trayward_windows::autostart`] for registry operations.
#[cfg(windows)]
pub fn enable() {
    match trayward_windows::autostart::enable() {
        Ok(()) => println!("Autostart enabled."),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(windows)]
pub fn disable() {
    match trayward_windows::autostart::disable() {
        Ok(()) => println!("Autostart disabled."),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(windows)]
pub fn status() {
    if !trayward_windows::autostart::is_enabled() {
        println!("Autostart is currently disabled.");
        return;
    }
    println!("Autostart is currently enabled.");
    if let Some(command) = trayward_windows::autostart::registered_command() {
        println!("  {command}");
        let current = std::env::current_exe()
            .map(|exe| trayward_windows::autostart::run_command(&exe.display().to_string()));
        if current.is_ok_and(|c| !c.eq_ignore_ascii_case(&command)) {
            println!("It points at another executable. Run 'trayward autostart enable' to update.");
        }
    }
}

#[cfg(not(windows))]
pub fn enable() {
    unsupported();
}

#[cfg(not(windows))]
pub fn disable() {
    unsupported();
}

#[cfg(not(windows))]
pub fn status() {
    println!("Autostart is only available on Windows.");
}

#[cfg(not(windows))]
fn unsupported() {
    eprintln!("Error: autostart is only available on Windows.");
    std::process::exit(1);
}
