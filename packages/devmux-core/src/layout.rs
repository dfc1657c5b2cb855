use crate::dispatch::{serialize_items, MenuItem};
use crate::executor::{Direction, TmuxRunner};

/// One terminal pane: a row inside a column.
#[derive(Debug, Clone)]
pub struct Row {
    /// Stable menu id. Empty for the menu host.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Shell line launched into the pane. Empty means no auto-launch.
    pub command: String,
    pub is_menu_host: bool,
    pub wants_focus: bool,
    /// Assigned exactly once, when tmux creates the pane.
    pub pane_id: String,
}

/// An ordered stack of rows. The column's own pane becomes row 0 once the
/// rows are split off.
#[derive(Debug, Clone)]
pub struct Column {
    pub rows: Vec<Row>,
    pub pane_id: String,
}

/// The whole grid for one tmux session. Column order is split order: every
/// horizontal split targets the previous column's already-resolved pane, so
/// the sequence must be walked strictly left to right. The same holds for
/// rows within a column.
#[derive(Debug, Clone)]
pub struct Layout {
    pub session: String,
    pub columns: Vec<Column>,
}

impl Layout {
    /// Materialize the tree as live tmux panes: split the window into
    /// columns, even out their widths, split each column into rows, launch
    /// row commands, and normalize row heights. Any tmux failure aborts the
    /// whole render; there is no partial-layout recovery.
    pub fn render(&mut self, tmux: &mut dyn TmuxRunner) -> Result<(), String> {
        if self.columns.is_empty() {
            return Err("layout has no columns".to_string());
        }

        self.render_columns(tmux)?;
        tmux.even_out_columns(&self.session)?;
        self.render_rows(tmux)?;

        Ok(())
    }

    fn render_columns(&mut self, tmux: &mut dyn TmuxRunner) -> Result<(), String> {
        // The pane that exists at session start seeds the first column.
        self.columns[0].pane_id = tmux.first_pane_id(&self.session)?;
        log::info!("column 0 uses existing pane {}", self.columns[0].pane_id);

        for i in 0..self.columns.len() {
            let has_next_column = i + 1 < self.columns.len();
            if has_next_column {
                let new_pane =
                    tmux.split_window(Direction::Horizontal, &self.columns[i].pane_id)?;
                self.columns[i + 1].pane_id = new_pane;
            }
        }

        Ok(())
    }

    fn render_rows(&mut self, tmux: &mut dyn TmuxRunner) -> Result<(), String> {
        let session = self.session.clone();

        for column in &mut self.columns {
            if column.rows.is_empty() {
                continue;
            }

            // The column pane becomes row 0; no split needed.
            column.rows[0].pane_id = column.pane_id.clone();

            for r in 0..column.rows.len() {
                let has_next_row = r + 1 < column.rows.len();
                if has_next_row {
                    let new_pane =
                        tmux.split_window(Direction::Vertical, &column.rows[r].pane_id)?;
                    column.rows[r + 1].pane_id = new_pane;
                }

                init_row(&column.rows[r], tmux)?;
            }

            resize_rows(&session, column, tmux)?;
        }

        Ok(())
    }

    /// Flattened projection of every non-menu row, in column order. Produced
    /// once after rendering; the picker never discovers new panes.
    pub fn menu_items(&self) -> Vec<MenuItem> {
        let mut items = Vec::new();

        for column in &self.columns {
            for row in &column.rows {
                if row.is_menu_host {
                    continue;
                }
                items.push(MenuItem {
                    id: row.id.clone(),
                    pane_id: row.pane_id.clone(),
                    title: row.title.clone(),
                    description: row.description.clone(),
                    command: row.command.clone(),
                });
            }
        }

        items
    }

    pub fn menu_pane_id(&self) -> Option<&str> {
        self.columns
            .iter()
            .flat_map(|column| column.rows.iter())
            .find(|row| row.is_menu_host)
            .map(|row| row.pane_id.as_str())
    }

    /// Start the picker in the menu pane, handing it the serialized item
    /// list as a single argument. Must run after the full render: the item
    /// list needs every pane id.
    pub fn launch_menu(&self, tmux: &mut dyn TmuxRunner, picker_bin: &str) -> Result<(), String> {
        let pane = self
            .menu_pane_id()
            .ok_or_else(|| "no menu row in layout".to_string())?;

        let items = serialize_items(&self.menu_items());
        let command = format!("{} menu --items '{}'", picker_bin, items);

        log::info!("launching menu in pane {}", pane);
        tmux.send_text(pane, &command)
    }
}

/// First launch into a fresh pane: send the configured command (no
/// interrupt) and focus the pane if asked. The menu host is handled later
/// by `launch_menu`.
fn init_row(row: &Row, tmux: &mut dyn TmuxRunner) -> Result<(), String> {
    if !row.command.is_empty() && !row.is_menu_host {
        log::info!("launching `{}` in pane {}", row.command, row.pane_id);
        tmux.send_text(&row.pane_id, &row.command)?;
    }

    if row.wants_focus {
        tmux.select_pane(&row.pane_id)?;
    }

    Ok(())
}

/// Divide the window height evenly across the column's rows. Integer
/// division; remainder rows simply render slightly taller.
fn resize_rows(session: &str, column: &Column, tmux: &mut dyn TmuxRunner) -> Result<(), String> {
    let height = tmux.window_height(session)?;
    let row_height = height / column.rows.len();

    for row in &column.rows {
        tmux.resize_pane_height(&row.pane_id, row_height)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::testing::ScriptedTmux;

    fn row(id: &str, command: &str) -> Row {
        Row {
            id: id.to_string(),
            title: format!("Row {}", id),
            description: String::new(),
            command: command.to_string(),
            is_menu_host: false,
            wants_focus: false,
            pane_id: String::new(),
        }
    }

    fn menu_row() -> Row {
        Row {
            id: String::new(),
            title: "Menu".to_string(),
            description: String::new(),
            command: String::new(),
            is_menu_host: true,
            wants_focus: false,
            pane_id: String::new(),
        }
    }

    fn column(rows: Vec<Row>) -> Column {
        Column {
            rows,
            pane_id: String::new(),
        }
    }

    fn layout(columns: Vec<Column>) -> Layout {
        Layout {
            session: "devmux".to_string(),
            columns,
        }
    }

    #[test]
    fn three_columns_issue_two_horizontal_splits_in_order() {
        let mut layout = layout(vec![
            column(vec![row("1", "")]),
            column(vec![row("2", "")]),
            column(vec![row("3", "")]),
        ]);
        let mut tmux = ScriptedTmux::new(24);

        layout.render(&mut tmux).unwrap();

        let splits: Vec<&Vec<String>> = tmux
            .calls_to("split-window")
            .into_iter()
            .filter(|call| call.contains(&"-h".to_string()))
            .collect();
        assert_eq!(splits.len(), 2);

        // Each split targets the previous column's resolved pane, and its
        // output becomes the next column's pane.
        assert_eq!(layout.columns[0].pane_id, "%0");
        assert_eq!(splits[0].last().unwrap(), "%0");
        assert_eq!(layout.columns[1].pane_id, "%1");
        assert_eq!(splits[1].last().unwrap(), "%1");
        assert_eq!(layout.columns[2].pane_id, "%2");
    }

    #[test]
    fn columns_are_evened_out_after_the_column_pass() {
        let mut layout = layout(vec![
            column(vec![row("1", "")]),
            column(vec![menu_row()]),
        ]);
        let mut tmux = ScriptedTmux::new(24);

        layout.render(&mut tmux).unwrap();

        let position = tmux
            .calls
            .iter()
            .position(|call| call[0] == "select-layout")
            .unwrap();
        assert_eq!(
            tmux.calls[position],
            vec!["select-layout", "-t", "devmux", "even-horizontal"]
        );

        // After the single horizontal split, before any vertical one.
        let horizontal = tmux
            .calls
            .iter()
            .position(|call| call[0] == "split-window")
            .unwrap();
        assert!(horizontal < position);
    }

    #[test]
    fn rows_split_off_the_column_pane_in_order() {
        let mut layout = layout(vec![column(vec![
            row("1", ""),
            row("2", ""),
            row("3", ""),
        ])]);
        let mut tmux = ScriptedTmux::new(24);

        layout.render(&mut tmux).unwrap();

        let splits = tmux.calls_to("split-window");
        assert_eq!(splits.len(), 2);

        let rows = &layout.columns[0].rows;
        assert_eq!(rows[0].pane_id, layout.columns[0].pane_id);
        assert_eq!(splits[0].last().unwrap(), "%0");
        assert_eq!(rows[1].pane_id, "%1");
        assert_eq!(splits[1].last().unwrap(), "%1");
        assert_eq!(rows[2].pane_id, "%2");
    }

    #[test]
    fn row_heights_stay_within_the_rounding_slack() {
        let mut layout = layout(vec![column(vec![
            row("1", ""),
            row("2", ""),
            row("3", ""),
        ])]);
        let mut tmux = ScriptedTmux::new(32);

        layout.render(&mut tmux).unwrap();

        let resizes = tmux.calls_to("resize-pane");
        assert_eq!(resizes.len(), 3);

        let total: usize = resizes
            .iter()
            .map(|call| call.last().unwrap().parse::<usize>().unwrap())
            .sum();
        // 32 / 3 == 10 per row; the remainder is accepted rounding slack.
        assert!(total <= 32);
        assert!(total >= 32 - (3 - 1));
    }

    #[test]
    fn row_commands_launch_without_an_interrupt() {
        let mut layout = layout(vec![column(vec![row("1", "npm start"), menu_row()])]);
        let mut tmux = ScriptedTmux::new(24);

        layout.render(&mut tmux).unwrap();

        let sends = tmux.calls_to("send-keys");
        assert_eq!(sends.len(), 1);
        assert_eq!(
            sends[0],
            &vec!["send-keys", "-t", "%0", "npm start", "Enter"]
        );
    }

    #[test]
    fn focus_rows_get_selected() {
        let mut focused = row("1", "");
        focused.wants_focus = true;
        let mut layout = layout(vec![column(vec![focused, menu_row()])]);
        let mut tmux = ScriptedTmux::new(24);

        layout.render(&mut tmux).unwrap();

        assert_eq!(
            tmux.calls_to("select-pane")[0],
            &vec!["select-pane", "-t", "%0"]
        );
    }

    #[test]
    fn menu_items_project_every_non_menu_row() {
        let mut layout = layout(vec![
            column(vec![row("1", "npm start"), row("2", "npm run dev")]),
            column(vec![menu_row()]),
        ]);
        let mut tmux = ScriptedTmux::new(24);

        layout.render(&mut tmux).unwrap();
        let items = layout.menu_items();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "1");
        assert_eq!(items[0].pane_id, "%0");
        assert_eq!(items[1].id, "2");
        assert_eq!(items[1].pane_id, "%2");
    }

    #[test]
    fn launch_menu_sends_the_picker_invocation_to_the_menu_pane() {
        let mut layout = layout(vec![
            column(vec![row("1", "npm start")]),
            column(vec![menu_row()]),
        ]);
        let mut tmux = ScriptedTmux::new(24);

        layout.render(&mut tmux).unwrap();
        tmux.calls.clear();
        layout.launch_menu(&mut tmux, "devmux").unwrap();

        let sends = tmux.calls_to("send-keys");
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0][2], "%1");
        assert_eq!(sends[0][3], "devmux menu --items '1:%0:Row 1::npm start'");
    }

    #[test]
    fn an_empty_layout_does_not_render() {
        let mut layout = layout(vec![]);
        let mut tmux = ScriptedTmux::new(24);

        assert!(layout.render(&mut tmux).is_err());
        assert!(tmux.calls.is_empty());
    }
}
