use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dispatch::RESTART_ALL_ID;
use crate::layout::{Column, Layout, Row};
use crate::DEFAULT_SESSION_NAME;

/// Per-project config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "devmux.json";

/// Declarative grid: columns of rows, fixed at startup. This replaces any
/// notion of a built-in layout; the tree always comes from a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_session")]
    pub session: String,
    pub columns: Vec<ColumnConfig>,
}

fn default_session() -> String {
    DEFAULT_SESSION_NAME.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub rows: Vec<RowConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub command: String,
    /// This row hosts the picker instead of a service command.
    #[serde(default)]
    pub menu: bool,
    /// Focus this pane once the grid is laid out.
    #[serde(default)]
    pub focus: bool,
}

/// Locate the config file: explicit path, then ./devmux.json, then
/// ~/.devmux.json.
pub fn find_config(explicit: Option<&Path>) -> Result<PathBuf, String> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(format!("config file not found: {}", path.display()));
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Ok(local);
    }

    let home = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".devmux.json");
    if home.exists() {
        return Ok(home);
    }

    Err(format!(
        "no {} in the current directory and no ~/.devmux.json",
        CONFIG_FILE_NAME
    ))
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let config: Config = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    config.validate()?;
    Ok(config)
}

impl Config {
    /// Fail fast on shapes the renderer or the picker wire format cannot
    /// represent.
    pub fn validate(&self) -> Result<(), String> {
        if self.columns.is_empty() {
            return Err("config has no columns".to_string());
        }

        let mut menu_rows = 0;
        let mut launch_rows = 0;
        let mut seen_ids: Vec<&str> = Vec::new();

        for (c, column) in self.columns.iter().enumerate() {
            if column.rows.is_empty() {
                return Err(format!("column {} has no rows", c));
            }

            for row in &column.rows {
                if row.menu {
                    menu_rows += 1;
                    continue;
                }

                launch_rows += 1;
                if row.id.is_empty() {
                    return Err(format!("row `{}` has no id", row.title));
                }
                if row.id == RESTART_ALL_ID {
                    return Err("row id `0` is reserved for restart-all".to_string());
                }
                if seen_ids.contains(&row.id.as_str()) {
                    return Err(format!("duplicate row id `{}`", row.id));
                }
                for (field, value) in [
                    ("id", &row.id),
                    ("title", &row.title),
                    ("description", &row.description),
                ] {
                    if value.contains(':') || value.contains(',') {
                        return Err(format!(
                            "row {} {} `{}` may not contain `:` or `,`",
                            row.id, field, value
                        ));
                    }
                }
                if row.command.contains(',') {
                    return Err(format!("row {} command may not contain `,`", row.id));
                }

                seen_ids.push(&row.id);
            }
        }

        if menu_rows != 1 {
            return Err(format!(
                "config must have exactly one menu row, found {}",
                menu_rows
            ));
        }
        if launch_rows == 0 {
            return Err("config has no launchable rows".to_string());
        }

        Ok(())
    }

    /// Build the runtime tree. The layout owns the data from here; the
    /// render pass is the only mutation it will ever see.
    pub fn into_layout(self) -> Layout {
        let columns = self
            .columns
            .into_iter()
            .map(|column| Column {
                pane_id: String::new(),
                rows: column
                    .rows
                    .into_iter()
                    .map(|row| Row {
                        id: row.id,
                        title: row.title,
                        description: row.description,
                        command: row.command,
                        is_menu_host: row.menu,
                        wants_focus: row.focus,
                        pane_id: String::new(),
                    })
                    .collect(),
            })
            .collect();

        Layout {
            session: self.session,
            columns,
        }
    }
}
