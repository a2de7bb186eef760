use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

use trayward_core::config::MAX_RETRY_SECONDS;
use trayward_core::{CancelToken, Outcome, pid, run_managed_apps};

use super::platform;

#[derive(clap::Args)]
pub struct RunArgs {
    /// Seconds to keep looking for each app's window (overrides the config)
    #[arg(long, value_name = "SECONDS")]
    retry_seconds: Option<u32>,
    /// Print the outcomes as JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Mirror log lines to stderr
    #[arg(long)]
    verbose: bool,
    /// Started at logon: write the log only, print nothing
    #[arg(long)]
    background: bool,
}

pub fn execute(args: &RunArgs) {
    let config = super::load_config(args.verbose);

    if let Ok(Some(pid)) = pid::read_pid_file() {
        if pid != std::process::id() && platform::is_process_alive(pid) {
            eprintln!("Trayward is already running (PID: {pid}).");
            std::process::exit(1);
        }
        let _ = pid::remove_pid_file();
    }
    if let Err(e) = pid::write_pid_file() {
        trayward_core::log_warn!("could not write PID file: {e}");
    }

    let cancel = CancelToken::new();
    platform::cancel_on_ctrl_c(&cancel);

    let retry_seconds = args
        .retry_seconds
        .map_or(config.retry_seconds, |s| s.min(MAX_RETRY_SECONDS));
    trayward_core::log_info!(
        "run started: apps={} retry_seconds={retry_seconds}",
        config.startup_apps().len()
    );

    let outcomes = run_managed_apps(
        &platform::service(),
        &config.apps,
        retry_seconds,
        &cancel,
    );

    if let Err(e) = pid::remove_pid_file() {
        trayward_core::log_warn!("could not remove PID file: {e}");
    }

    // Background runs have no console to write to.
    if args.background {
        return;
    }
    if args.json {
        match serde_json::to_string_pretty(&outcomes) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: could not encode outcomes: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print_summary(&outcomes);
    }
}

fn print_summary(outcomes: &[Outcome]) {
    if outcomes.is_empty() {
        println!("No startup apps configured. Run 'trayward init' to get started.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("App"),
            Cell::new("Managed"),
            Cell::new("Action"),
            Cell::new("Result"),
        ]);

    for outcome in outcomes {
        table.add_row(vec![
            Cell::new(&outcome.app_name),
            Cell::new(if outcome.managed { "yes" } else { "no" }),
            Cell::new(outcome.action.map_or("-", |a| a.as_str())),
            Cell::new(outcome.message.describe()),
        ]);
    }
    println!("{table}");

    if outcomes
        .iter()
        .any(|o| !o.managed && o.message.is_likely_permission_issue())
    {
        println!(
            "\nSome windows could not be managed. Elevated apps ignore requests from a \
             non-elevated Trayward: try running it as administrator."
        );
    }
}
