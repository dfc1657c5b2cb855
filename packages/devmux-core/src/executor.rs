use std::process::Command;

/// Split orientation: horizontal splits create a new column, vertical
/// splits create a new row inside a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

pub fn execute_tmux_command(args: &[&str]) -> Result<String, String> {
    log::debug!("tmux {}", args.join(" "));

    let output = Command::new("tmux")
        .args(args)
        .output()
        .map_err(|e| format!("Failed to execute tmux: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "tmux {} failed: {}",
            args.join(" "),
            stderr.trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Command gateway to tmux. Layout rendering and command dispatch only talk
/// to tmux through this trait, so both can be driven against a scripted
/// runner in tests. The derived operations are provided methods; a runner
/// only implements the raw `run`.
pub trait TmuxRunner {
    fn run(&mut self, args: &[&str]) -> Result<String, String>;

    /// Split the target pane and return the new pane's id.
    fn split_window(&mut self, direction: Direction, target: &str) -> Result<String, String> {
        let mut args = vec!["split-window"];
        if direction == Direction::Horizontal {
            args.push("-h");
        }
        args.extend(["-P", "-F", "#{pane_id}", "-t", target]);

        let out = self
            .run(&args)
            .map_err(|e| format!("split-window failed: {}", e))?;
        Ok(out.trim().to_string())
    }

    /// Id of the pane that already exists when the session starts. Used
    /// once, before any split.
    fn first_pane_id(&mut self, session: &str) -> Result<String, String> {
        let out = self.run(&["list-panes", "-t", session, "-F", "#{pane_id}"])?;
        out.lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or_else(|| format!("no panes found in session {}", session))
    }

    /// Current window height in character rows.
    fn window_height(&mut self, session: &str) -> Result<usize, String> {
        let out = self.run(&["display-message", "-p", "-t", session, "#{window_height}"])?;
        let clean = out.trim();
        clean
            .parse()
            .map_err(|_| format!("invalid window height: {}", clean))
    }

    /// Type `text` into the pane and press Enter.
    fn send_text(&mut self, target: &str, text: &str) -> Result<(), String> {
        self.run(&["send-keys", "-t", target, text, "Enter"])?;
        Ok(())
    }

    fn send_interrupt(&mut self, target: &str) -> Result<(), String> {
        self.run(&["send-keys", "-t", target, "C-c"])?;
        Ok(())
    }

    /// Interrupt whatever is running in the pane, then re-send `command`.
    fn run_in_pane(&mut self, command: &str, target: &str) -> Result<(), String> {
        self.send_interrupt(target)?;
        self.send_text(target, command)
    }

    fn resize_pane_height(&mut self, target: &str, rows: usize) -> Result<(), String> {
        self.run(&["resize-pane", "-t", target, "-y", &rows.to_string()])?;
        Ok(())
    }

    /// Give every column equal width, regardless of split order artifacts.
    fn even_out_columns(&mut self, session: &str) -> Result<(), String> {
        self.run(&["select-layout", "-t", session, "even-horizontal"])?;
        Ok(())
    }

    fn select_pane(&mut self, target: &str) -> Result<(), String> {
        self.run(&["select-pane", "-t", target])?;
        Ok(())
    }
}

/// The real gateway: shells out to the tmux binary.
pub struct Tmux;

impl TmuxRunner for Tmux {
    fn run(&mut self, args: &[&str]) -> Result<String, String> {
        execute_tmux_command(args)
    }
}
