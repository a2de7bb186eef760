//! Launch-and-tuck-away orchestration for a single managed entry.
//!
//! The service never caches the window list: every round, and every
//! verification attempt, re-reads it through the enumerator. Baselines and
//! candidate lists are locals of one call, so one service can drive many
//! entries concurrently.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::cancel::{CancelToken, Clock, SystemClock};
use crate::config::{ManagedAppEntry, MatchStrategy};
use crate::launch::Launcher;
use crate::log::LogSink;
use crate::matcher::{
    Identity, is_unmanageable_window, match_strategy, matches_executable_with_identity_fallback,
};
use crate::outcome::{ActionKind, Message, Outcome};
use crate::window::{ManagedWindowInfo, WindowActions, WindowEnumerator, WindowHandle};

mod rounds;
mod target;
mod verify;

pub use rounds::Ranked;
pub use target::{MAX_OWNER_HOPS, OwnerTable};

/// Wait timings for the retry and verification loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Pause between matching rounds.
    pub round_interval: Duration,
    /// Verification budget after a hide-intent request.
    pub hide_verify: VerifyPolicy,
    /// Verification budget after a close request.
    pub close_verify: VerifyPolicy,
}

/// Bounded verification loop: `attempts` checks, `delay` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            round_interval: Duration::from_millis(500),
            // Short: interactive hide flows must stay responsive.
            hide_verify: VerifyPolicy {
                attempts: 4,
                delay: Duration::from_millis(300),
            },
            // Long: tolerate slow shutdown sequences.
            close_verify: VerifyPolicy {
                attempts: 10,
                delay: Duration::from_millis(400),
            },
        }
    }
}

impl Timing {
    /// Number of matching rounds for a retry budget: two per second plus
    /// one, never fewer than one.
    pub fn rounds(retry_seconds: u32) -> u32 {
        retry_seconds.saturating_mul(2).saturating_add(1).max(1)
    }

    fn verify(&self, action: ActionKind) -> VerifyPolicy {
        match action {
            ActionKind::Hide => self.hide_verify,
            ActionKind::Close => self.close_verify,
        }
    }
}

/// What one retry loop is looking for.
#[derive(Debug, Clone, Copy)]
struct Search<'a> {
    identity: &'a Identity,
    launched_pid: Option<u32>,
    baseline: Option<&'a HashSet<WindowHandle>>,
    action: ActionKind,
}

/// Coordinates launching, matching, acting and verifying for managed entries.
pub struct Service {
    enumerator: Box<dyn WindowEnumerator>,
    actions: Box<dyn WindowActions>,
    launcher: Box<dyn Launcher>,
    log: Box<dyn LogSink>,
    clock: Box<dyn Clock>,
    timing: Timing,
}

impl Service {
    pub fn new(
        enumerator: Box<dyn WindowEnumerator>,
        actions: Box<dyn WindowActions>,
        launcher: Box<dyn Launcher>,
        log: Box<dyn LogSink>,
    ) -> Self {
        Self {
            enumerator,
            actions,
            launcher,
            log,
            clock: Box::new(SystemClock),
            timing: Timing::default(),
        }
    }

    /// Replaces the clock used for every wait.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Launches `entry` (unless it is already running) and, when asked to,
    /// closes its front window once it appears.
    pub fn start_and_manage(
        &self,
        entry: &ManagedAppEntry,
        retry_seconds: u32,
        cancel: &CancelToken,
    ) -> Outcome {
        let name = entry.name.as_str();
        let exe_path = entry.exe_path.trim().trim_matches('"');
        if exe_path.is_empty() {
            return Outcome::failed(name, Message::EmptyExePath);
        }
        if !Path::new(exe_path).exists() {
            self.log
                .warn(&format!("skip invalid exe path: {}", entry.exe_path));
            return Outcome::failed(name, Message::InvalidExePath);
        }
        if cancel.is_cancelled() {
            return Outcome::failed(name, Message::Cancelled);
        }

        let identity = Identity::from_exe_path(&entry.exe_path);
        let strategy = entry.window_match.strategy;
        let existing = |w: &ManagedWindowInfo| located_by(w, &identity, strategy);

        if self.has_existing_managed_window(&identity, strategy) {
            self.log.info(&format!("skip start: already running {name}"));
            if entry.wants_auto_hide() {
                let search = Search {
                    identity: &identity,
                    launched_pid: None,
                    baseline: None,
                    action: ActionKind::Hide,
                };
                if self.manage_first_matching_window(cancel, &existing, search, retry_seconds) {
                    return Outcome::acted(
                        name,
                        ActionKind::Hide,
                        Message::AlreadyRunningManagedExisting,
                    );
                }
                if cancel.is_cancelled() {
                    return Outcome::failed(name, Message::Cancelled);
                }
            }
            return Outcome::done(name, Message::AlreadyRunningSkipped);
        }

        let baseline = self.capture_baseline(&existing);
        if cancel.is_cancelled() {
            return Outcome::failed(name, Message::Cancelled);
        }

        let pid = match self
            .launcher
            .launch(&entry.exe_path, &entry.args, entry.launch_hidden)
        {
            Ok(pid) => pid,
            Err(e) => {
                self.log.error(&format!("start failed: {name} err={e}"));
                return Outcome::failed(name, Message::ProcessStartFailed);
            }
        };
        self.log.info(&format!(
            "started: {name} pid={pid} hidden={}",
            entry.launch_hidden
        ));

        if entry.launch_hidden {
            return Outcome::done(name, Message::StartedHidden);
        }
        if !entry.tray.auto_hide_on_launch {
            return Outcome::done(name, Message::StartedOnly);
        }

        let launched =
            |w: &ManagedWindowInfo| (w.process_id == pid || existing(w)) && match_strategy(w, strategy);
        let search = Search {
            identity: &identity,
            launched_pid: Some(pid),
            baseline: Some(&baseline),
            action: ActionKind::Close,
        };
        if self.manage_first_matching_window(cancel, &launched, search, retry_seconds) {
            return Outcome::acted(name, ActionKind::Close, Message::Managed);
        }
        if cancel.is_cancelled() {
            return Outcome::failed(name, Message::Cancelled);
        }
        Outcome::failed(name, Message::NoWindowManaged)
    }

    /// Hides the already-present window of `entry` without launching.
    pub fn hide_existing(
        &self,
        entry: &ManagedAppEntry,
        retry_seconds: u32,
        cancel: &CancelToken,
    ) -> Outcome {
        let name = entry.name.as_str();
        let identity = Identity::from_exe_path(&entry.exe_path);
        if identity.name.is_empty() {
            return Outcome::failed(name, Message::InvalidProcessName);
        }

        let strategy = entry.window_match.strategy;
        let existing = |w: &ManagedWindowInfo| located_by(w, &identity, strategy);
        let search = Search {
            identity: &identity,
            launched_pid: None,
            baseline: None,
            action: ActionKind::Hide,
        };
        if self.manage_first_matching_window(cancel, &existing, search, retry_seconds) {
            return Outcome::acted(name, ActionKind::Hide, Message::ManagedExisting);
        }
        if cancel.is_cancelled() {
            return Outcome::failed(name, Message::Cancelled);
        }
        Outcome::failed(name, Message::NoExistingWindowManaged)
    }

    /// Ranks the current candidates for `entry` without acting on them.
    ///
    /// Launched-pid and baseline signals are absent, exactly as in
    /// [`Service::hide_existing`].
    pub fn preview_candidates(&self, entry: &ManagedAppEntry) -> Vec<Ranked> {
        let identity = Identity::from_exe_path(&entry.exe_path);
        let strategy = entry.window_match.strategy;
        let search = Search {
            identity: &identity,
            launched_pid: None,
            baseline: None,
            action: ActionKind::Hide,
        };
        let windows = self.enumerator.enumerate();
        let predicate = |w: &ManagedWindowInfo| located_by(w, &identity, strategy);
        rounds::rank_candidates(&windows, self.enumerator.as_ref(), &predicate, search)
    }

    fn has_existing_managed_window(&self, identity: &Identity, strategy: MatchStrategy) -> bool {
        self.enumerator
            .enumerate()
            .iter()
            .any(|w| !is_unmanageable_window(w) && located_by(w, identity, strategy))
    }

    fn capture_baseline(
        &self,
        predicate: &dyn Fn(&ManagedWindowInfo) -> bool,
    ) -> HashSet<WindowHandle> {
        self.enumerator
            .enumerate()
            .into_iter()
            .filter(|w| predicate(w))
            .map(|w| w.handle)
            .collect()
    }
}

/// Identity (with fallback) and strategy gate.
fn located_by(window: &ManagedWindowInfo, identity: &Identity, strategy: MatchStrategy) -> bool {
    matches_executable_with_identity_fallback(window, &identity.path, &identity.name)
        && match_strategy(window, strategy)
}

#[cfg(test)]
mod tests;
