//! One-shot commands acting on a single configured app.

use trayward_core::config::MAX_RETRY_SECONDS;
use trayward_core::{CancelToken, Outcome};

use super::platform;

#[derive(clap::Args)]
pub struct SingleArgs {
    /// App name or id from the configuration
    name: String,
    /// Seconds to keep looking for the window (overrides the config)
    #[arg(long, value_name = "SECONDS")]
    retry_seconds: Option<u32>,
    /// Mirror log lines to stderr
    #[arg(long)]
    verbose: bool,
}

/// Launches the app (unless running) and manages its window.
pub fn launch(args: &SingleArgs) {
    run_one(args, |service, app, retry, cancel| {
        service.start_and_manage(app, retry, cancel)
    });
}

/// Hides the window of the already running app.
pub fn hide(args: &SingleArgs) {
    run_one(args, |service, app, retry, cancel| {
        service.hide_existing(app, retry, cancel)
    });
}

fn run_one(
    args: &SingleArgs,
    act: impl FnOnce(
        &trayward_core::Service,
        &trayward_core::ManagedAppEntry,
        u32,
        &CancelToken,
    ) -> Outcome,
) {
    let config = super::load_config(args.verbose);
    let app = super::find_app_or_exit(&config, &args.name);
    let retry_seconds = args
        .retry_seconds
        .map_or(config.retry_seconds, |s| s.min(MAX_RETRY_SECONDS));

    let cancel = CancelToken::new();
    platform::cancel_on_ctrl_c(&cancel);

    let outcome = act(&platform::service(), app, retry_seconds, &cancel);
    trayward_core::log_info!("{}", outcome.summary_line());
    println!("{}", outcome.summary_line());
    if !outcome.managed {
        std::process::exit(1);
    }
}
