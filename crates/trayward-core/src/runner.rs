//! Fan-out over every startup entry.

use std::thread;

use crate::cancel::CancelToken;
use crate::config::ManagedAppEntry;
use crate::orchestrator::Service;
use crate::outcome::{Message, Outcome};

/// Processes every entry marked `run_on_startup` on its own thread and
/// returns the outcomes in configuration order.
///
/// Entries that want auto-hide first try to tuck away an already running
/// window; only if none is managed does the regular launch flow run.
pub fn run_managed_apps(
    service: &Service,
    entries: &[ManagedAppEntry],
    retry_seconds: u32,
    cancel: &CancelToken,
) -> Vec<Outcome> {
    let entries: Vec<&ManagedAppEntry> = entries.iter().filter(|e| e.run_on_startup).collect();
    let outcomes: Vec<Outcome> = thread::scope(|scope| {
        let handles: Vec<_> = entries
            .iter()
            .copied()
            .map(|entry| scope.spawn(move || run_entry(service, entry, retry_seconds, cancel)))
            .collect();

        handles
            .into_iter()
            .zip(&entries)
            .map(|(handle, entry)| {
                handle.join().unwrap_or_else(|_| {
                    crate::log_error!("worker panicked: {}", entry.name);
                    Outcome::failed(&entry.name, Message::NoWindowManaged)
                })
            })
            .collect()
    });

    if outcomes.is_empty() {
        crate::log_info!("no managed tasks");
        return outcomes;
    }
    crate::log_info!("managed summary:");
    for outcome in &outcomes {
        crate::log_info!("  {}", outcome.summary_line());
    }
    outcomes
}

fn run_entry(
    service: &Service,
    entry: &ManagedAppEntry,
    retry_seconds: u32,
    cancel: &CancelToken,
) -> Outcome {
    if entry.wants_auto_hide() {
        let existing = service.hide_existing(entry, retry_seconds, cancel);
        if existing.managed || existing.message == Message::Cancelled {
            return existing;
        }
    }
    let outcome = service.start_and_manage(entry, retry_seconds, cancel);
    if !outcome.managed {
        crate::log_warn!("not managed: {} ({})", entry.name, outcome.message);
    }
    outcome
}
