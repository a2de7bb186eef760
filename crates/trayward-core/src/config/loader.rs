use std::path::{Path, PathBuf};

use super::Config;

/// Returns the config directory: `~/.config/trayward/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("trayward"))
}

/// Returns the config file path: `~/.config/trayward/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Tries to load and parse `config.toml`.
///
/// Returns `Ok(Config)` on success, or an error string describing
/// what went wrong (IO error, parse error, etc.).
pub fn try_load() -> Result<Config, String> {
    let path = config_path().ok_or("could not determine config path")?;
    Ok(try_load_from(&path)?)
}

fn try_load_from(path: &Path) -> Result<Config, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        missing: e.kind() == std::io::ErrorKind::NotFound,
        message: format!("{}: {e}", path.display()),
    })?;
    let mut config: Config = toml::from_str(&content).map_err(|e| LoadError::Parse {
        content,
        message: format!("{}: {e}", path.display()),
    })?;
    config.validate();
    Ok(config)
}

/// Loads the configuration from disk, falling back to defaults.
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => Config::default(),
    }
}

/// Loads the configuration at `path`, falling back to defaults.
///
/// A missing file silently returns defaults. A file that cannot be
/// parsed is copied aside to `<name>.invalid-<secs>.bak` first so the
/// user's edits are not lost when the defaults are saved later.
pub fn load_from(path: &Path) -> Config {
    match try_load_from(path) {
        Ok(config) => config,
        Err(LoadError::Io { missing: true, .. }) => Config::default(),
        Err(LoadError::Io { message, .. }) => {
            crate::log_warn!("config unreadable: {message}");
            Config::default()
        }
        Err(LoadError::Parse { content, message }) => {
            crate::log_warn!("config invalid, using defaults: {message}");
            if let Err(e) = backup_invalid(path, &content) {
                crate::log_warn!("config backup failed: {e}");
            }
            Config::default()
        }
    }
}

/// Writes `config` to `~/.config/trayward/config.toml`.
pub fn save(config: &Config) -> Result<(), String> {
    let path = config_path().ok_or("could not determine config path")?;
    save_to(&path, config)
}

/// Writes `config` as TOML to `path`, creating parent directories.
pub fn save_to(path: &Path, config: &Config) -> Result<(), String> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| format!("{}: {e}", dir.display()))?;
    }
    let content = toml::to_string_pretty(config).map_err(|e| e.to_string())?;
    std::fs::write(path, content).map_err(|e| format!("{}: {e}", path.display()))
}

enum LoadError {
    Io { missing: bool, message: String },
    Parse { content: String, message: String },
}

impl From<LoadError> for String {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Io { message, .. } | LoadError::Parse { message, .. } => message,
        }
    }
}

fn backup_invalid(path: &Path, content: &str) -> std::io::Result<PathBuf> {
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".invalid-{stamp}.bak"));
    let backup = path.with_file_name(name);
    std::fs::write(&backup, content)?;
    Ok(backup)
}
