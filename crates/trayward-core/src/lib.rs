pub mod log;

pub mod cancel;
pub mod config;
pub mod launch;
pub mod matcher;
pub mod orchestrator;
pub mod outcome;
pub mod pid;
pub mod runner;
pub mod window;

pub use cancel::{CancelToken, Clock, SystemClock};
pub use config::{Config, ManagedAppEntry, MatchStrategy};
pub use launch::{CommandLauncher, LaunchError, Launcher};
pub use log::{FileLog, LogSink};
pub use matcher::{ACCEPT_SCORE_THRESHOLD, MatchCandidate};
pub use orchestrator::{Ranked, Service, Timing};
pub use outcome::{ActionKind, Message, Outcome};
pub use runner::run_managed_apps;
pub use window::{
    ActionError, ActionResult, ManagedWindowInfo, NullActions, NullEnumerator, WindowActions,
    WindowEnumerator, WindowHandle,
};
