mod loader;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::log::LogConfig;

pub use loader::{config_dir, config_path, load, load_from, save, save_to, try_load};

/// Upper bound for the per-entry retry budget, in seconds.
pub const MAX_RETRY_SECONDS: u32 = 120;

/// Top-level configuration for Trayward.
///
/// Loaded from `~/.config/trayward/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How long to keep looking for each app's window, in seconds.
    pub retry_seconds: u32,
    /// File logging settings.
    pub log: LogConfig,
    /// Managed applications, in launch order.
    #[serde(rename = "app")]
    pub apps: Vec<ManagedAppEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retry_seconds: 10,
            log: LogConfig::default(),
            apps: Vec::new(),
        }
    }
}

/// One application Trayward launches and manages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagedAppEntry {
    pub id: String,
    /// Display name used in logs and summaries.
    pub name: String,
    /// Path to the executable or script.
    pub exe_path: String,
    /// Raw argument string; double quotes group arguments containing spaces.
    pub args: String,
    /// Whether `trayward run` launches this entry.
    pub run_on_startup: bool,
    /// Launch with no console and no window management.
    pub launch_hidden: bool,
    pub window_match: WindowMatchRule,
    pub tray: TrayBehavior,
}

impl Default for ManagedAppEntry {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: DEFAULT_APP_NAME.into(),
            exe_path: String::new(),
            args: String::new(),
            run_on_startup: true,
            launch_hidden: false,
            window_match: WindowMatchRule::default(),
            tray: TrayBehavior::default(),
        }
    }
}

const DEFAULT_APP_NAME: &str = "New App";

/// How candidate windows are gated before scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowMatchRule {
    pub strategy: MatchStrategy,
}

/// Gating rule applied to a window before confidence scoring.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    /// Accept every window; confidence comes entirely from scoring.
    #[default]
    ProcessNameThenTitle,
    /// Require a non-empty window title.
    TitleContains,
    /// Require a non-empty window class name.
    ClassName,
    /// Accept every window.
    Any,
}

/// What to do with the app's window once it appears.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrayBehavior {
    /// Close (or hide) the front window right after launch.
    pub auto_hide_on_launch: bool,
}

impl ManagedAppEntry {
    /// Whether the window should be tucked away after launch.
    ///
    /// Always `false` for hidden launches: they have no window to manage.
    pub fn wants_auto_hide(&self) -> bool {
        !self.launch_hidden && self.tray.auto_hide_on_launch
    }
}

impl Config {
    /// Clamps values to safe ranges and repairs inconsistent entries.
    ///
    /// Hidden launches never auto-hide, and unnamed entries get a
    /// placeholder name so summaries stay readable.
    pub fn validate(&mut self) {
        self.retry_seconds = self.retry_seconds.min(MAX_RETRY_SECONDS);
        for app in &mut self.apps {
            if app.name.trim().is_empty() {
                app.name = DEFAULT_APP_NAME.into();
            }
            if app.launch_hidden {
                app.tray.auto_hide_on_launch = false;
            }
        }
    }

    /// Entries that `trayward run` should process.
    pub fn startup_apps(&self) -> Vec<ManagedAppEntry> {
        self.apps
            .iter()
            .filter(|app| app.run_on_startup)
            .cloned()
            .collect()
    }

    /// Finds an entry by name or id (case-insensitive).
    pub fn find_app(&self, key: &str) -> Option<&ManagedAppEntry> {
        self.apps
            .iter()
            .find(|app| app.name.eq_ignore_ascii_case(key) || app.id.eq_ignore_ascii_case(key))
    }
}
