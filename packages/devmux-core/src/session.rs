use std::process::Command;

use crate::executor::execute_tmux_command;

pub fn session_exists(session_name: &str) -> Result<bool, String> {
    let output = Command::new("tmux")
        .args(["has-session", "-t", session_name])
        .output()
        .map_err(|e| format!("Failed to check session: {}", e))?;

    Ok(output.status.success())
}

/// Create a detached session. Its initial pane is the one that seeds the
/// first column of the grid.
pub fn create_session(session_name: &str) -> Result<(), String> {
    execute_tmux_command(&["new-session", "-d", "-s", session_name])?;
    Ok(())
}

pub fn kill_session(session_name: &str) -> Result<(), String> {
    execute_tmux_command(&["kill-session", "-t", session_name])?;
    Ok(())
}

/// Hand the terminal over to an attached tmux client. Blocks until the
/// client detaches or the session dies.
pub fn attach_session(session_name: &str) -> Result<(), String> {
    let status = Command::new("tmux")
        .args(["attach-session", "-t", session_name])
        .status()
        .map_err(|e| format!("Failed to attach session: {}", e))?;

    if !status.success() {
        return Err(format!("tmux attach-session exited with {}", status));
    }

    Ok(())
}

/// True when already running inside a tmux client.
pub fn inside_tmux() -> bool {
    std::env::var_os("TMUX").is_some()
}
