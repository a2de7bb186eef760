//! Process launching for managed entries.
//!
//! Scripts and hidden launches go through a console-less `cmd.exe`;
//! plain executables are spawned directly. When the first attempt fails,
//! one retry goes through the shell's `start` so shell-associated targets
//! still open.

use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

/// `CREATE_NO_WINDOW`: the child gets no console window.
#[cfg_attr(not(windows), allow(dead_code))]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Error returned when neither the direct launch nor the shell fallback
/// could start the process.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start {path}: {source} (shell fallback: {fallback})")]
    SpawnWithFallback {
        path: String,
        #[source]
        source: std::io::Error,
        fallback: std::io::Error,
    },
}

/// Starts managed processes. Returns the new process id.
pub trait Launcher: Send + Sync {
    fn launch(&self, exe_path: &str, args: &str, hidden: bool) -> Result<u32, LaunchError>;
}

/// [`Launcher`] backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandLauncher;

impl Launcher for CommandLauncher {
    fn launch(&self, exe_path: &str, args: &str, hidden: bool) -> Result<u32, LaunchError> {
        start_process(exe_path, args, hidden)
    }
}

/// How a target gets started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchPlan {
    /// Spawn the binary itself with tokenized arguments.
    Direct { program: String, args: Vec<String> },
    /// Run a command line through `cmd.exe`.
    Shell { command_line: String, hidden: bool },
}

impl LaunchPlan {
    /// Chooses the plan for the current platform.
    pub fn for_target(exe_path: &str, args: &str, hidden: bool) -> Self {
        plan(exe_path, args, hidden, cfg!(windows))
    }

    /// The shell `start` fallback, only available where `cmd.exe` exists.
    pub fn shell_fallback(exe_path: &str, args: &str, hidden: bool) -> Option<Self> {
        fallback_plan(exe_path, args, hidden, cfg!(windows))
    }

    fn to_command(&self, working_dir: Option<&Path>) -> Command {
        let mut cmd = match self {
            Self::Direct { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
            Self::Shell {
                command_line,
                hidden,
            } => shell_command(command_line, *hidden),
        };
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

fn plan(exe_path: &str, args: &str, hidden: bool, has_cmd: bool) -> LaunchPlan {
    let path = clean_path(exe_path);
    let args = args.trim();
    if has_cmd && (hidden || is_cmd_script(path)) {
        // /s strips exactly the outer quotes, so quoted sub-arguments survive.
        let inner = if args.is_empty() {
            format!("\"{path}\"")
        } else {
            format!("\"{path}\" {args}")
        };
        return LaunchPlan::Shell {
            command_line: format!("/d /s /c \"{inner}\""),
            hidden,
        };
    }
    LaunchPlan::Direct {
        program: path.to_string(),
        args: parse_args(args),
    }
}

fn fallback_plan(exe_path: &str, args: &str, hidden: bool, has_cmd: bool) -> Option<LaunchPlan> {
    if !has_cmd {
        return None;
    }
    let path = clean_path(exe_path);
    let args = args.trim();
    let mut command_line = format!("/d /c start \"\" \"{path}\"");
    if !args.is_empty() {
        command_line.push(' ');
        command_line.push_str(args);
    }
    Some(LaunchPlan::Shell {
        command_line,
        hidden,
    })
}

#[cfg(windows)]
fn shell_command(command_line: &str, hidden: bool) -> Command {
    use std::os::windows::process::CommandExt;

    let mut cmd = Command::new("cmd.exe");
    cmd.raw_arg(command_line);
    if hidden {
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    cmd
}

#[cfg(not(windows))]
fn shell_command(command_line: &str, _hidden: bool) -> Command {
    let mut cmd = Command::new("cmd.exe");
    cmd.args(parse_args(command_line));
    cmd
}

/// Starts `exe_path` with `args`, retrying once through the shell.
///
/// The working directory is the executable's folder when it exists.
pub fn start_process(exe_path: &str, args: &str, hidden: bool) -> Result<u32, LaunchError> {
    let path = clean_path(exe_path);
    let working_dir = Path::new(path).parent().filter(|d| d.is_dir());

    let direct = LaunchPlan::for_target(exe_path, args, hidden);
    let source = match direct.to_command(working_dir).spawn() {
        Ok(child) => return Ok(child.id()),
        Err(e) => e,
    };
    crate::log_warn!("direct launch failed path={path} err={source}");

    let Some(fallback) = LaunchPlan::shell_fallback(exe_path, args, hidden) else {
        return Err(LaunchError::Spawn {
            path: path.to_string(),
            source,
        });
    };
    match fallback.to_command(working_dir).spawn() {
        Ok(child) => Ok(child.id()),
        Err(fallback) => Err(LaunchError::SpawnWithFallback {
            path: path.to_string(),
            source,
            fallback,
        }),
    }
}

fn clean_path(exe_path: &str) -> &str {
    exe_path.trim().trim_matches('"')
}

/// Whether the target must run under a command interpreter.
pub fn is_cmd_script(exe_path: &str) -> bool {
    let lower = clean_path(exe_path).to_ascii_lowercase();
    lower.ends_with(".bat") || lower.ends_with(".cmd")
}

/// Splits an argument string on whitespace, keeping double-quoted
/// segments together.
///
/// Quotes are removed and whitespace inside them is preserved:
/// `--config "C:\My Path\cfg.json" --verbose` yields three arguments.
pub fn parse_args(s: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    for ch in s.chars() {
        match ch {
            '"' => in_quote = !in_quote,
            ' ' | '\t' if !in_quote => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }
    args
}
