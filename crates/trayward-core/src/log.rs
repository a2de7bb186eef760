//! File-based logger with size-based rotation.
//!
//! Logs are written to `~/.config/trayward/logs/trayward.log`. When
//! the file exceeds the configured max size, it is rotated to
//! `trayward.log.1` (one backup kept).

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

use serde::{Deserialize, Serialize};

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();
static ECHO: AtomicBool = AtomicBool::new(false);

const LOG_FILE_NAME: &str = "trayward.log";
const BACKUP_SUFFIX: &str = ".1";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `true`.
    pub enabled: bool,
    /// Minimum log level: "debug", "info", "warn", or "error".
    pub level: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".into(),
            max_file_mb: 5,
        }
    }
}

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Self::Debug,
            "warn" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

struct Logger {
    file: File,
    path: PathBuf,
    min_level: Level,
    max_bytes: u64,
    written: u64,
}

/// Initialises the global logger under the default config directory.
///
/// Does nothing if `config.enabled` is `false`.
pub fn init(config: &LogConfig) {
    if let Some(dir) = crate::config::config_dir() {
        init_in(&dir.join("logs"), config);
    }
}

/// Initialises the global logger writing into `log_dir`.
pub fn init_in(log_dir: &Path, config: &LogConfig) {
    if !config.enabled {
        return;
    }
    let _ = fs::create_dir_all(log_dir);
    let path = log_dir.join(LOG_FILE_NAME);

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(_) => return,
    };
    let written = file.metadata().map(|m| m.len()).unwrap_or(0);

    let logger = Logger {
        file,
        path,
        min_level: Level::parse(&config.level),
        max_bytes: config.max_file_mb * 1024 * 1024,
        written,
    };

    let _ = LOGGER.set(Mutex::new(logger));
}

/// Mirrors every log line to stderr (used by `--verbose`).
pub fn set_echo(enabled: bool) {
    ECHO.store(enabled, Ordering::Relaxed);
}

/// Writes a log line if the level is at or above the configured minimum.
pub fn write(level: Level, args: fmt::Arguments<'_>) {
    let echo = ECHO.load(Ordering::Relaxed);
    let logger = LOGGER.get().and_then(|m| m.lock().ok());
    if logger.is_none() && !echo {
        return;
    }
    if let Some(ref l) = logger
        && level < l.min_level
    {
        return;
    }

    let now = timestamp();
    let line = format!("{now} [{lvl}] {args}\n", lvl = level.as_str());
    if echo {
        eprint!("{line}");
    }
    let Some(mut logger) = logger else {
        return;
    };
    let bytes = line.len() as u64;

    let _ = logger.file.write_all(line.as_bytes());
    logger.written += bytes;

    if logger.max_bytes > 0 && logger.written >= logger.max_bytes {
        logger.rotate();
    }
}

impl Logger {
    fn rotate(&mut self) {
        let mut backup = self.path.clone().into_os_string();
        backup.push(BACKUP_SUFFIX);
        let _ = fs::rename(&self.path, &backup);
        if let Ok(f) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            self.file = f;
        }
        self.written = 0;
    }
}

fn timestamp() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = dur.as_secs();
    let (h, m, s) = (secs / 3600 % 24, secs / 60 % 60, secs % 60);
    format!("{h:02}:{m:02}:{s:02}.{:03}", dur.subsec_millis())
}

/// Severity-levelled sink the orchestration core reports through.
///
/// Fire-and-forget: the core never inspects the outcome of a write.
pub trait LogSink: Send + Sync {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// [`LogSink`] backed by the global file logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileLog;

impl LogSink for FileLog {
    fn info(&self, msg: &str) {
        write(Level::Info, format_args!("{msg}"));
    }

    fn warn(&self, msg: &str) {
        write(Level::Warn, format_args!("{msg}"));
    }

    fn error(&self, msg: &str) {
        write(Level::Error, format_args!("{msg}"));
    }
}

/// Logs at DEBUG level.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Debug, format_args!($($arg)*)) };
}

/// Logs at INFO level.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Info, format_args!($($arg)*)) };
}

/// Logs at WARN level.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Warn, format_args!($($arg)*)) };
}

/// Logs at ERROR level.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Error, format_args!($($arg)*)) };
}
