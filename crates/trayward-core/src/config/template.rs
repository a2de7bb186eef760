/// Generates the default `config.toml` contents with explanatory comments.
///
/// This is used by `trayward init` to create a starter config file that
/// users can immediately edit.
pub fn generate_config() -> String {
    r##"# Trayward configuration
# Location: ~/.config/trayward/config.toml

# How long to keep looking for each app's window after launch, in
# seconds (0 to 120). The window list is re-read twice per second.
retry_seconds = 10

[log]
# Enable file logging to ~/.config/trayward/logs/trayward.log.
enabled = true
# Minimum log level: "debug", "info", "warn", or "error".
level = "info"
# Maximum log file size in MB before rotation.
max_file_mb = 5

# One [[app]] table per managed application. Example:
#
# [[app]]
# id = "slack"
# name = "Slack"
# exe_path = 'C:\Users\me\AppData\Local\slack\slack.exe'
# # Double quotes group arguments that contain spaces.
# args = '--startup "C:\My Path\profile"'
# # Launch this app on `trayward run`.
# run_on_startup = true
# # Start with no console and no window (disables auto_hide_on_launch).
# launch_hidden = false
# # Window gate before scoring:
# # "process-name-then-title" | "title-contains" | "class-name" | "any"
# window_match = { strategy = "process-name-then-title" }
# # Close the app's front window to its tray icon once it appears.
# tray = { auto_hide_on_launch = true }
"##
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn template_parses_to_default_config() {
        // Act
        let config: Config = toml::from_str(&generate_config()).unwrap();

        // Assert
        assert_eq!(config, Config::default());
    }

    #[test]
    fn commented_example_entry_parses_when_uncommented() {
        // Arrange
        let uncommented: String = generate_config()
            .lines()
            .skip_while(|l| !l.starts_with("# [[app]]"))
            .filter(|l| !l.starts_with("# #"))
            .map(|l| l.trim_start_matches("# "))
            .collect::<Vec<_>>()
            .join("\n");

        // Act
        let config: Config = toml::from_str(&uncommented).unwrap();

        // Assert
        assert_eq!(config.apps.len(), 1);
        assert_eq!(config.apps[0].name, "Slack");
        assert!(config.apps[0].tray.auto_hide_on_launch);
    }
}
