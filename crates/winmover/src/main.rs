mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "winmover",
    version,
    about = "Move, resize and pin application windows across monitors and virtual desktops"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration files
    Init,
    /// Move matching windows to a monitor
    Move(commands::move_window::MoveArgs),
    /// Move matching windows to a virtual desktop
    Desktop(commands::desktop::DesktopArgs),
    /// Pin or unpin matching windows on all virtual desktops
    Pin(commands::pin::PinArgs),
    /// Run an action described by host settings JSON
    Invoke(commands::invoke::InvokeArgs),
    /// Run a stored action from actions.toml
    Run {
        /// Name of the action
        name: String,
    },
    /// Replay a runner bundle once (internal, used by elevated relaunch)
    #[command(hide = true)]
    RunFile {
        /// Path to the bundle
        path: PathBuf,
    },
    /// Debugging and inspection tools
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
}

#[derive(Subcommand)]
enum DebugCommands {
    /// List monitors with their unique keys and work areas
    Monitors {
        /// Label monitors by device name instead of friendly name
        #[arg(long)]
        device_names: bool,
    },
    /// List virtual desktops
    Desktops,
    /// List running application names
    Processes,
    /// List main windows of running processes
    Windows,
    /// Print the bounds of a process's main window
    Rect {
        /// Process name without extension
        #[arg(long)]
        process: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Move(args) => commands::move_window::execute(&args),
        Commands::Desktop(args) => commands::desktop::execute(&args),
        Commands::Pin(args) => commands::pin::execute(&args),
        Commands::Invoke(args) => commands::invoke::execute(&args),
        Commands::Run { name } => commands::run::execute(&name),
        Commands::RunFile { path } => commands::run::execute_file(&path),
        Commands::Debug { command } => match command {
            DebugCommands::Monitors { device_names } => {
                commands::debug::monitors::execute(!device_names)
            }
            DebugCommands::Desktops => commands::debug::desktops::execute(),
            DebugCommands::Processes => commands::debug::processes::execute(),
            DebugCommands::Windows => commands::debug::windows::execute(),
            DebugCommands::Rect { process } => commands::debug::rect::execute(&process),
        },
    }
}
