use std::fs;
use std::path::{Path, PathBuf};

/// A boxed error for PID file operations.
pub type PidResult<T> = Result<T, Box<dyn std::error::Error>>;

const PID_FILE_NAME: &str = "trayward.pid";

/// Returns the Trayward data directory, creating it if needed.
///
/// `%LOCALAPPDATA%\trayward` on Windows, the platform's local data
/// directory elsewhere.
fn data_dir() -> PidResult<PathBuf> {
    let base = match std::env::var_os("LOCALAPPDATA") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::data_local_dir().ok_or("no local data directory")?,
    };
    let dir = base.join("trayward");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Returns the path to the PID file.
pub fn pid_path() -> PidResult<PathBuf> {
    Ok(data_dir()?.join(PID_FILE_NAME))
}

/// Records the current process as the running instance.
pub fn write_pid_file() -> PidResult<()> {
    write_pid_to(&pid_path()?, std::process::id())
}

/// Reads the PID of the last recorded instance, if any.
pub fn read_pid_file() -> PidResult<Option<u32>> {
    read_pid_from(&pid_path()?)
}

/// Removes the PID file. Called when a run finishes.
pub fn remove_pid_file() -> PidResult<()> {
    remove_pid_at(&pid_path()?)
}

fn write_pid_to(path: &Path, pid: u32) -> PidResult<()> {
    fs::write(path, pid.to_string())?;
    Ok(())
}

fn read_pid_from(path: &Path) -> PidResult<Option<u32>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    let pid: u32 = contents
        .trim()
        .parse()
        .map_err(|e| format!("invalid PID file contents: {e}"))?;
    Ok(Some(pid))
}

fn remove_pid_at(path: &Path) -> PidResult<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
