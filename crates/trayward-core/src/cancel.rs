//! Cancellation token and the clock the retry loops wait on.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Cloneable cancellation signal shared by a whole orchestration run.
///
/// Once cancelled it stays cancelled; every clone observes the change and
/// every pending [`CancelToken::wait_timeout`] wakes up immediately.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the signal and wakes all waiters.
    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        if let Ok(mut cancelled) = lock.lock() {
            *cancelled = true;
        }
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        let (lock, _) = &*self.inner;
        lock.lock().map(|c| *c).unwrap_or(true)
    }

    /// Sleeps for `delay` unless cancelled first.
    ///
    /// Returns `true` if the full delay elapsed, `false` if the token was
    /// (or already is) cancelled.
    pub fn wait_timeout(&self, delay: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let Ok(mut cancelled) = lock.lock() else {
            return false;
        };
        let deadline = Instant::now() + delay;
        loop {
            if *cancelled {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            cancelled = match cvar.wait_timeout(cancelled, deadline - now) {
                Ok((guard, _)) => guard,
                Err(_) => return false,
            };
        }
    }
}

/// Source of the waits between retry rounds and verification attempts.
///
/// Abstracted so tests can count and skip sleeps.
pub trait Clock: Send + Sync {
    /// Waits for `delay`. Returns `false` if cancelled before it elapsed.
    fn sleep(&self, delay: Duration, cancel: &CancelToken) -> bool;
}

/// Real wall-clock waits on the cancellation token.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, delay: Duration, cancel: &CancelToken) -> bool {
        if delay.is_zero() {
            return !cancel.is_cancelled();
        }
        cancel.wait_timeout(delay)
    }
}
