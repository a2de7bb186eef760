use std::fmt;

use serde::{Deserialize, Serialize};

/// Action performed on a managed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// The front window must go away entirely.
    Close,
    /// The window may stay alive as long as it is no longer visible.
    Hide,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Hide => "hide",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable outcome codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Message {
    EmptyExePath,
    InvalidExePath,
    InvalidProcessName,
    ProcessStartFailed,
    StartedHidden,
    StartedOnly,
    AlreadyRunningSkipped,
    AlreadyRunningManagedExisting,
    Managed,
    NoWindowManaged,
    ManagedExisting,
    NoExistingWindowManaged,
    /// The run was cancelled before the entry finished.
    Cancelled,
}

impl Message {
    /// The stable code written to logs.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyExePath => "empty exe path",
            Self::InvalidExePath => "invalid exe path",
            Self::InvalidProcessName => "invalid process name",
            Self::ProcessStartFailed => "process start failed",
            Self::StartedHidden => "started hidden",
            Self::StartedOnly => "started only",
            Self::AlreadyRunningSkipped => "already running skipped",
            Self::AlreadyRunningManagedExisting => "already running managed existing",
            Self::Managed => "managed",
            Self::NoWindowManaged => "no window managed",
            Self::ManagedExisting => "managed existing",
            Self::NoExistingWindowManaged => "no existing window managed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable description for summaries.
    pub fn describe(self) -> &'static str {
        match self {
            Self::EmptyExePath => "empty executable path",
            Self::InvalidExePath => "invalid executable path",
            Self::InvalidProcessName => "invalid process name",
            Self::ProcessStartFailed => "process start failed",
            Self::StartedHidden => "started hidden in background",
            Self::StartedOnly => "started only",
            Self::AlreadyRunningSkipped => "already running, skipped relaunch",
            Self::AlreadyRunningManagedExisting => "already running, managed existing window",
            Self::Managed | Self::ManagedExisting => "front window closed",
            Self::NoWindowManaged | Self::NoExistingWindowManaged => {
                "retry exhausted, no manageable window found"
            }
            Self::Cancelled => "cancelled before completion",
        }
    }

    /// Exhaustion is most often UIPI: an elevated app ignores messages
    /// from a non-elevated Trayward.
    pub fn is_likely_permission_issue(self) -> bool {
        matches!(self, Self::NoWindowManaged | Self::NoExistingWindowManaged)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-entry result of one orchestration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub app_name: String,
    /// Whether something was successfully managed (or deliberately left alone).
    pub managed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionKind>,
    pub message: Message,
}

impl Outcome {
    pub fn failed(app_name: &str, message: Message) -> Self {
        Self {
            app_name: app_name.to_string(),
            managed: false,
            action: None,
            message,
        }
    }

    pub fn done(app_name: &str, message: Message) -> Self {
        Self {
            managed: true,
            ..Self::failed(app_name, message)
        }
    }

    pub fn acted(app_name: &str, action: ActionKind, message: Message) -> Self {
        Self {
            action: Some(action),
            ..Self::done(app_name, message)
        }
    }

    /// One summary line: `<name>: <description>`, with a permission hint
    /// when exhaustion suggests one.
    pub fn summary_line(&self) -> String {
        let mut line = format!("{}: {}", self.app_name, self.message.describe());
        if !self.managed && self.message.is_likely_permission_issue() {
            line.push_str(
                " (possible UIPI permission limitation: try running trayward as administrator)",
            );
        }
        line
    }
}
