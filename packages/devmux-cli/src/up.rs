use std::path::PathBuf;

use clap::Args;

use devmux_core::config;
use devmux_core::session;
use devmux_core::Tmux;

#[derive(Args)]
pub struct UpArgs {
    /// Config file (defaults to ./devmux.json, then ~/.devmux.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Leave the session detached instead of attaching once the grid is up
    #[arg(long)]
    pub detach: bool,
}

pub fn run(args: UpArgs) {
    if let Err(e) = run_inner(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_inner(args: UpArgs) -> Result<(), String> {
    let path = config::find_config(args.config.as_deref())?;
    log::debug!("using config {}", path.display());
    let config = config::load_config(&path)?;

    let mut layout = config.into_layout();
    let session_name = layout.session.clone();

    if !session::session_exists(&session_name)? {
        session::create_session(&session_name)?;
    }

    let mut tmux = Tmux;
    layout.render(&mut tmux)?;

    let picker_bin = std::env::current_exe()
        .map_err(|e| format!("Failed to locate the devmux binary: {}", e))?;
    layout.launch_menu(&mut tmux, &picker_bin.to_string_lossy())?;

    if !args.detach && !session::inside_tmux() {
        session::attach_session(&session_name)?;
    }

    Ok(())
}
