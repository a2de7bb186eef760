pub mod autostart;
pub mod debug;
pub mod init;
pub mod run;
pub mod single;

mod platform;

use trayward_core::config::{self, Config};
use trayward_core::{ManagedAppEntry, log};

/// Loads the configuration and starts file logging from its `[log]` table.
///
/// `verbose` mirrors every log line to stderr.
fn load_config(verbose: bool) -> Config {
    log::set_echo(verbose);
    let config = config::load();
    log::init(&config.log);
    config
}

/// Finds the entry called `name`, or exits with an error listing the
/// configured names.
fn find_app_or_exit<'a>(config: &'a Config, name: &str) -> &'a ManagedAppEntry {
    if let Some(app) = config.find_app(name) {
        return app;
    }
    eprintln!("Error: no app named '{name}' in the configuration.");
    if config.apps.is_empty() {
        eprintln!("Run 'trayward init' and add an [[app]] entry.");
    } else {
        let names: Vec<&str> = config.apps.iter().map(|a| a.name.as_str()).collect();
        eprintln!("Configured apps: {}", names.join(", "));
    }
    std::process::exit(1);
}
