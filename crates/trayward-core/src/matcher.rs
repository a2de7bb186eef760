//! Window identity predicates and candidate scoring.
//!
//! Everything here is pure: the same snapshot and the same configured
//! identity always produce the same verdicts and scores, which keeps the
//! orchestration loop deterministic against a noisy window list.
//!
//! Scoring signals:
//!
//! | signal                                          | points |
//! |-------------------------------------------------|-------:|
//! | process id equals the pid launched this run     |  +1000 |
//! | normalized executable path matches              |   +500 |
//! | normalized process name matches                 |   +250 |
//! | title equals expected name / contains it        | +180 / +90 |
//! | class name contains expected name               |    +40 |
//! | shell host (launched run) and title contains it |   +180 |
//! | handle absent from the pre-launch baseline      |   +200 |
//! | non-empty title / non-empty class               | +50 / +10 |
//! | tool window                                     |    -80 |
//! | owned window                                    |    -60 |

use std::collections::HashSet;

use crate::config::MatchStrategy;
use crate::window::{ManagedWindowInfo, WindowHandle};

/// Minimum score before any close/hide request may be sent.
///
/// Equals one exact identity signal (launched pid or executable path), so
/// soft heuristics like title substrings and novelty can never act alone.
pub const ACCEPT_SCORE_THRESHOLD: i32 = 500;

/// Window classes that are runtime plumbing, never user-facing surfaces.
const UNMANAGEABLE_CLASSES: &[&str] = &["pseudoconsolewindow", "tao thread event target"];

/// Processes that commonly host a launched script's window.
const SHELL_HOSTS: &[&str] = &[
    "windowsterminal",
    "wt",
    "cmd",
    "conhost",
    "powershell",
    "pwsh",
];

/// A window paired with its score, valid for one matching round.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub window: ManagedWindowInfo,
    pub score: i32,
}

/// The identity a managed entry is expected to surface as.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Normalized absolute executable path.
    pub path: String,
    /// Executable file name without extension.
    pub name: String,
}

impl Identity {
    /// Derives the expected identity from a configured executable path.
    ///
    /// Both `/` and `\` are treated as separators so Windows paths resolve
    /// the same way on every host.
    pub fn from_exe_path(exe_path: &str) -> Self {
        let trimmed = exe_path.trim_matches(|c: char| c.is_whitespace() || c == '"');
        let file = trimmed.rsplit(['/', '\\']).next().unwrap_or_default();
        let name = match file.rfind('.') {
            Some(dot) => &file[..dot],
            None => file,
        };
        Self {
            path: normalize_path(exe_path),
            name: name.to_string(),
        }
    }
}

/// Trims whitespace and quotes, resolves to an absolute path and strips
/// trailing separators. Empty input yields an empty string.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches(|c: char| c.is_whitespace() || c == '"');
    if trimmed.is_empty() {
        return String::new();
    }
    let full = match std::path::absolute(trimmed) {
        Ok(p) => p.to_string_lossy().into_owned(),
        Err(_) => trimmed.to_string(),
    };
    full.trim_end_matches(['\\', '/']).to_string()
}

/// Lower-cases and drops hyphens, underscores and whitespace, so that
/// `My-App`, `my_app` and `myapp` compare equal.
pub fn normalize_identity(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
        .collect()
}

/// Substring test on normalized identities. Empty operands never match.
pub fn contains_normalized_identity(haystack: &str, needle: &str) -> bool {
    let needle = normalize_identity(needle);
    if needle.is_empty() {
        return false;
    }
    let haystack = normalize_identity(haystack);
    !haystack.is_empty() && haystack.contains(&needle)
}

fn paths_equal(window_path: &str, expected_path: &str) -> bool {
    let normalized = normalize_path(window_path);
    !normalized.is_empty()
        && !expected_path.is_empty()
        && normalized.to_lowercase() == expected_path.to_lowercase()
}

/// Strict identity: same executable path or same process name,
/// both case-insensitive.
pub fn matches_executable(window: &ManagedWindowInfo, expected_path: &str, expected_name: &str) -> bool {
    if paths_equal(&window.process_path, expected_path) {
        return true;
    }
    !expected_name.is_empty() && window.process_name.to_lowercase() == expected_name.to_lowercase()
}

/// Strict identity, or the expected name surfacing inside the process
/// name, title, or class name.
///
/// Catches apps re-hosted under another executable (interpreters,
/// Electron-style shells) whose identity only shows in the title.
pub fn matches_executable_with_identity_fallback(
    window: &ManagedWindowInfo,
    expected_path: &str,
    expected_name: &str,
) -> bool {
    matches_executable(window, expected_path, expected_name)
        || contains_normalized_identity(&window.process_name, expected_name)
        || contains_normalized_identity(&window.title, expected_name)
        || contains_normalized_identity(&window.class_name, expected_name)
}

/// Whether the process is a shell or terminal that may host a script's window.
pub fn is_likely_shell_host(process_name: &str) -> bool {
    let name = process_name.trim().to_lowercase();
    SHELL_HOSTS.contains(&name.as_str())
}

/// Confidence score for ranking candidates. See the module table.
pub fn compute_candidate_score(
    window: &ManagedWindowInfo,
    expected_path: &str,
    expected_name: &str,
    launched_pid: Option<u32>,
    baseline: Option<&HashSet<WindowHandle>>,
) -> i32 {
    let mut score = 0;
    if launched_pid == Some(window.process_id) {
        score += 1000;
    }
    if paths_equal(&window.process_path, expected_path) {
        score += 500;
    }
    let expected_identity = normalize_identity(expected_name);
    if !expected_name.is_empty() && normalize_identity(&window.process_name) == expected_identity {
        score += 250;
    }
    if !expected_name.is_empty() && normalize_identity(&window.title) == expected_identity {
        score += 180;
    } else if contains_normalized_identity(&window.title, expected_name) {
        score += 90;
    }
    if contains_normalized_identity(&window.class_name, expected_name) {
        score += 40;
    }
    if launched_pid.is_some()
        && is_likely_shell_host(&window.process_name)
        && contains_normalized_identity(&window.title, expected_name)
    {
        score += 180;
    }
    if let Some(baseline) = baseline
        && !baseline.contains(&window.handle)
    {
        score += 200;
    }
    if !window.title.is_empty() {
        score += 50;
    }
    if !window.class_name.is_empty() {
        score += 10;
    }
    if window.is_tool_window {
        score -= 80;
    }
    if window.owner_handle != 0 {
        score -= 60;
    }
    score
}

/// Hard denylist: windows that must never be acted on, whatever their score.
pub fn is_unmanageable_window(window: &ManagedWindowInfo) -> bool {
    let class = window.class_name.trim().to_lowercase();
    UNMANAGEABLE_CLASSES.contains(&class.as_str())
}

/// Gate applied before scoring, independent of confidence.
pub fn match_strategy(window: &ManagedWindowInfo, strategy: MatchStrategy) -> bool {
    match strategy {
        MatchStrategy::Any | MatchStrategy::ProcessNameThenTitle => true,
        MatchStrategy::TitleContains => !window.title.is_empty(),
        MatchStrategy::ClassName => !window.class_name.is_empty(),
    }
}

/// Formats the top `top` candidates for a log line.
pub fn summarize_candidates(candidates: &[MatchCandidate], top: usize) -> String {
    if candidates.is_empty() {
        return "none".into();
    }
    candidates
        .iter()
        .take(top.max(1))
        .map(|c| format!("score={} {}", c.score, crate::window::describe_window(&c.window)))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
