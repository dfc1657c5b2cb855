mod kill;
mod menu;
mod up;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "devmux",
    about = "Devmux CLI: tmux dev-environment grids with a restart menu"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out the grid, launch every configured command, and attach
    Up(up::UpArgs),

    /// Run the interactive restart menu (started by `up` inside its pane)
    Menu(menu::MenuArgs),

    /// Kill a devmux session
    Kill(kill::KillArgs),
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Up(args) => {
            up::run(args);
        }
        Commands::Menu(args) => {
            menu::run(args);
        }
        Commands::Kill(args) => {
            kill::run(args);
        }
    }
}
