mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "trayward",
    version,
    about = "Launch your apps at logon and tuck their windows into the tray"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Launch every startup app and manage its window
    Run(commands::run::RunArgs),
    /// Launch one configured app and manage its window
    Launch(commands::single::SingleArgs),
    /// Hide the window of one already running app
    Hide(commands::single::SingleArgs),
    /// Debugging and inspection tools
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
    /// Manage running Trayward at logon
    Autostart {
        #[command(subcommand)]
        command: AutostartCommands,
    },
}

#[derive(Subcommand)]
enum DebugCommands {
    /// List all visible top-level windows
    List,
    /// Show the ranked window candidates for one app, without acting
    Candidates {
        /// App name or id from the configuration
        name: String,
    },
}

#[derive(Subcommand)]
enum AutostartCommands {
    /// Run Trayward when you log on
    Enable,
    /// Stop running Trayward at logon
    Disable,
    /// Show whether autostart is enabled
    Status,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Run(args) => commands::run::execute(&args),
        Commands::Launch(args) => commands::single::launch(&args),
        Commands::Hide(args) => commands::single::hide(&args),
        Commands::Debug { command } => match command {
            DebugCommands::List => commands::debug::list::execute(),
            DebugCommands::Candidates { name } => commands::debug::candidates::execute(&name),
        },
        Commands::Autostart { command } => match command {
            AutostartCommands::Enable => commands::autostart::enable(),
            AutostartCommands::Disable => commands::autostart::disable(),
            AutostartCommands::Status => commands::autostart::status(),
        },
    }
}
