use clap::Args;

use devmux_core::session;
use devmux_core::DEFAULT_SESSION_NAME;

#[derive(Args)]
pub struct KillArgs {
    /// Session to kill
    #[arg(long, default_value = DEFAULT_SESSION_NAME)]
    pub session: String,
}

pub fn run(args: KillArgs) {
    if let Err(e) = session::kill_session(&args.session) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
