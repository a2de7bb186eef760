use std::collections::HashMap;

use super::target::OwnerTable;
use super::{Search, Service};
use crate::cancel::CancelToken;
use crate::matcher::{
    ACCEPT_SCORE_THRESHOLD, MatchCandidate, compute_candidate_score, is_unmanageable_window,
    summarize_candidates,
};
use crate::outcome::ActionKind;
use crate::window::{ManagedWindowInfo, WindowEnumerator, WindowHandle, describe_window};

/// A scored candidate together with the window the action will hit.
#[derive(Debug, Clone)]
pub struct Ranked {
    pub candidate: MatchCandidate,
    /// Root owner of the candidate, or the candidate itself.
    pub target: WindowHandle,
}

/// OS request issued against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Close,
    Hide,
}

impl Request {
    fn as_str(self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Hide => "hide",
        }
    }
}

/// Scores the windows accepted by `predicate`, collapses candidates that
/// share a target and orders them by score, highest first.
///
/// On a score tie the earlier enumerated window wins.
pub(super) fn rank_candidates(
    windows: &[ManagedWindowInfo],
    live: &dyn WindowEnumerator,
    predicate: &dyn Fn(&ManagedWindowInfo) -> bool,
    search: Search<'_>,
) -> Vec<Ranked> {
    let owners = OwnerTable::new(windows, live);
    let mut ranked: Vec<Ranked> = Vec::new();
    let mut slot_by_target: HashMap<WindowHandle, usize> = HashMap::new();

    for window in windows {
        if is_unmanageable_window(window) || !predicate(window) {
            continue;
        }
        let score = compute_candidate_score(
            window,
            &search.identity.path,
            &search.identity.name,
            search.launched_pid,
            search.baseline,
        );
        let target = owners.resolve(window);
        let entry = Ranked {
            candidate: MatchCandidate {
                window: window.clone(),
                score,
            },
            target,
        };
        match slot_by_target.get(&target) {
            Some(&slot) => {
                if score > ranked[slot].candidate.score {
                    ranked[slot] = entry;
                }
            }
            None => {
                slot_by_target.insert(target, ranked.len());
                ranked.push(entry);
            }
        }
    }

    ranked.sort_by(|a, b| b.candidate.score.cmp(&a.candidate.score));
    ranked
}

impl Service {
    /// Runs matching rounds until one candidate is acted on and verified.
    ///
    /// Returns `false` when every round is exhausted or `cancel` fires.
    pub(super) fn manage_first_matching_window(
        &self,
        cancel: &CancelToken,
        predicate: &dyn Fn(&ManagedWindowInfo) -> bool,
        search: Search<'_>,
        retry_seconds: u32,
    ) -> bool {
        let rounds = super::Timing::rounds(retry_seconds);
        for round in 1..=rounds {
            if cancel.is_cancelled() {
                return false;
            }
            let windows = self.enumerator.enumerate();
            let ranked = rank_candidates(&windows, self.enumerator.as_ref(), predicate, search);

            let top: Vec<MatchCandidate> =
                ranked.iter().take(3).map(|r| r.candidate.clone()).collect();
            self.log.info(&format!(
                "match round {round}/{rounds} candidates={} top={}",
                ranked.len(),
                summarize_candidates(&top, 3)
            ));

            for entry in &ranked {
                if cancel.is_cancelled() {
                    return false;
                }
                if self.try_manage_and_verify(cancel, entry, search.action) {
                    return true;
                }
            }

            if round < rounds && !self.clock.sleep(self.timing.round_interval, cancel) {
                return false;
            }
        }
        false
    }

    fn try_manage_and_verify(&self, cancel: &CancelToken, entry: &Ranked, action: ActionKind) -> bool {
        let candidate = &entry.candidate;
        if candidate.score < ACCEPT_SCORE_THRESHOLD {
            self.log.warn(&format!(
                "skip low confidence candidate score={} threshold={ACCEPT_SCORE_THRESHOLD} {}",
                candidate.score,
                describe_window(&candidate.window)
            ));
            return false;
        }

        let requests: &[Request] = match action {
            // Tray apps usually hide themselves on close.
            ActionKind::Hide => &[Request::Close, Request::Hide],
            ActionKind::Close => &[Request::Close],
        };
        requests.iter().any(|&request| {
            !cancel.is_cancelled() && self.apply_and_verify(cancel, entry, action, request)
        })
    }

    fn apply_and_verify(
        &self,
        cancel: &CancelToken,
        entry: &Ranked,
        action: ActionKind,
        request: Request,
    ) -> bool {
        let candidate = &entry.candidate;
        let target = entry.target;
        if target != candidate.window.handle {
            self.log.info(&format!(
                "retarget action from=0x{:X} to=0x{target:X}",
                candidate.window.handle
            ));
        }

        let result = match request {
            Request::Close => self.actions.request_close(target),
            Request::Hide => self.actions.request_hide(target),
        };
        match result {
            Ok(true) => {}
            Ok(false) => {
                self.log.warn(&format!(
                    "action request failed request={} target=0x{target:X}",
                    request.as_str()
                ));
                return false;
            }
            Err(e) => {
                self.log.warn(&format!(
                    "action request failed request={} target=0x{target:X} err={e}",
                    request.as_str()
                ));
                return false;
            }
        }

        self.log.info(&format!(
            "action requested request={} intent={action} score={} target=0x{target:X}",
            request.as_str(),
            candidate.score
        ));

        let applied = self.verify_action_applied(cancel, target, candidate.score, action);
        if applied {
            self.log.info(&format!(
                "action applied intent={action} target=0x{target:X}"
            ));
        } else {
            self.log.warn(&format!(
                "action not applied intent={action} target=0x{target:X}"
            ));
        }
        applied
    }
}
