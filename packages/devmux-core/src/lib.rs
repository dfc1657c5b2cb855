pub mod config;
pub mod dispatch;
pub mod executor;
pub mod layout;
pub mod session;

pub use dispatch::{dispatch, parse_items, serialize_items, DispatchError, MenuItem, RESTART_ALL_ID};
pub use executor::{execute_tmux_command, Direction, Tmux, TmuxRunner};
pub use layout::{Column, Layout, Row};

/// Default session name for devmux
pub const DEFAULT_SESSION_NAME: &str = "devmux";
