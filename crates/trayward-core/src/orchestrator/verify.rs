use super::Service;
use crate::cancel::CancelToken;
use crate::outcome::ActionKind;
use crate::window::{ManagedWindowInfo, WindowHandle};

impl Service {
    /// Re-checks `target` until the action on it shows, or the policy for
    /// `action` runs out.
    pub(super) fn verify_action_applied(
        &self,
        cancel: &CancelToken,
        target: WindowHandle,
        score: i32,
        action: ActionKind,
    ) -> bool {
        let policy = self.timing.verify(action);
        for attempt in 1..=policy.attempts {
            if cancel.is_cancelled() {
                return false;
            }
            if self.is_applied(action, target) {
                return true;
            }
            if attempt < policy.attempts && !self.clock.sleep(policy.delay, cancel) {
                return false;
            }
        }
        self.log.warn(&format!(
            "verify timeout intent={action} target=0x{target:X} score={score} attempts={}",
            policy.attempts
        ));
        false
    }

    /// A close holds only once the handle is no longer a window; a window
    /// that hid itself is still alive.
    fn is_applied(&self, action: ActionKind, target: WindowHandle) -> bool {
        match action {
            ActionKind::Close => !self.enumerator.is_window(target),
            ActionKind::Hide => {
                let windows = self.enumerator.enumerate();
                is_hidden(windows.iter().find(|w| w.handle == target))
            }
        }
    }
}

/// Gone from the snapshot, or listed but not visible.
fn is_hidden(current: Option<&ManagedWindowInfo>) -> bool {
    current.is_none_or(|w| !w.is_visible)
}
