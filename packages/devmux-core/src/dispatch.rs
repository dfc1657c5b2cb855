use thiserror::Error;

use crate::executor::TmuxRunner;

/// Reserved selection id meaning "restart every managed pane".
pub const RESTART_ALL_ID: &str = "0";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// Malformed `--items` entry: the picker was started with a bad
    /// configuration string.
    #[error("invalid menu item `{0}`: expected id:paneId:title:description:command")]
    Parse(String),
    /// The selection is not in the item list. The picker only ever offers
    /// ids from that list, so this means the configuration and the running
    /// picker have diverged.
    #[error("no menu item with id `{0}`")]
    UnknownId(String),
    #[error("{0}")]
    Tmux(String),
}

/// One selectable menu entry: a command and the pane it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub pane_id: String,
    pub title: String,
    pub description: String,
    pub command: String,
}

/// Parse the comma-separated `id:paneId:title:description:command` list the
/// picker receives on its command line. The command field is everything
/// after the fourth colon; commands may not contain commas.
pub fn parse_items(value: &str) -> Result<Vec<MenuItem>, DispatchError> {
    let mut items = Vec::new();

    for entry in value.split(',') {
        let parts: Vec<&str> = entry.splitn(5, ':').collect();
        if parts.len() != 5 {
            return Err(DispatchError::Parse(entry.to_string()));
        }

        items.push(MenuItem {
            id: parts[0].to_string(),
            pane_id: parts[1].to_string(),
            title: parts[2].to_string(),
            description: parts[3].to_string(),
            command: parts[4].to_string(),
        });
    }

    Ok(items)
}

/// Inverse of `parse_items`.
pub fn serialize_items(items: &[MenuItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{}:{}:{}:{}:{}",
                item.id, item.pane_id, item.title, item.description, item.command
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}

pub fn get_by_id<'a>(items: &'a [MenuItem], id: &str) -> Result<&'a MenuItem, DispatchError> {
    items
        .iter()
        .find(|item| item.id == id)
        .ok_or_else(|| DispatchError::UnknownId(id.to_string()))
}

/// Re-send the command selected in the picker. The reserved id restarts
/// every managed pane; each send is independent, with no ordering guarantee
/// between panes.
pub fn dispatch(
    items: &[MenuItem],
    id: &str,
    tmux: &mut dyn TmuxRunner,
) -> Result<(), DispatchError> {
    if id == RESTART_ALL_ID {
        for item in items.iter().filter(|item| item.id != RESTART_ALL_ID) {
            tmux.run_in_pane(&item.command, &item.pane_id)
                .map_err(DispatchError::Tmux)?;
        }
        return Ok(());
    }

    let item = get_by_id(items, id)?;
    tmux.run_in_pane(&item.command, &item.pane_id)
        .map_err(DispatchError::Tmux)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::testing::ScriptedTmux;

    fn item(id: &str, pane_id: &str, title: &str, description: &str, command: &str) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            pane_id: pane_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            command: command.to_string(),
        }
    }

    fn sample_items() -> Vec<MenuItem> {
        vec![
            item("1", "%3", "Backend", "Backend service", "npm start"),
            item("2", "%4", "Frontend", "Frontend service", "npm run dev"),
        ]
    }

    #[test]
    fn serialized_items_round_trip() {
        let items = sample_items();

        let parsed = parse_items(&serialize_items(&items)).unwrap();

        assert_eq!(parsed, items);
    }

    #[test]
    fn command_keeps_everything_after_the_fourth_colon() {
        let parsed = parse_items("1:%3:Backend:Backend service:docker exec -it db psql").unwrap();

        assert_eq!(parsed[0].command, "docker exec -it db psql");
    }

    #[test]
    fn entry_with_too_few_fields_is_rejected() {
        let err = parse_items("1:%3:Backend:npm start").unwrap_err();

        assert_eq!(err, DispatchError::Parse("1:%3:Backend:npm start".to_string()));
    }

    #[test]
    fn one_bad_entry_fails_the_whole_list() {
        assert!(parse_items("1:%3:Backend:Backend service:npm start,oops").is_err());
    }

    #[test]
    fn empty_value_is_rejected() {
        assert!(parse_items("").is_err());
    }

    #[test]
    fn get_by_id_finds_the_matching_item() {
        let items = sample_items();

        assert_eq!(get_by_id(&items, "2").unwrap().pane_id, "%4");
    }

    #[test]
    fn get_by_id_reports_unknown_ids() {
        let err = get_by_id(&sample_items(), "9").unwrap_err();

        assert_eq!(err, DispatchError::UnknownId("9".to_string()));
    }

    #[test]
    fn dispatching_one_id_targets_exactly_one_pane() {
        let items = sample_items();
        let mut tmux = ScriptedTmux::new(24);

        dispatch(&items, "2", &mut tmux).unwrap();

        assert_eq!(tmux.calls[0], vec!["send-keys", "-t", "%4", "C-c"]);
        assert_eq!(
            tmux.calls[1],
            vec!["send-keys", "-t", "%4", "npm run dev", "Enter"]
        );
        assert_eq!(tmux.calls.len(), 2);
    }

    #[test]
    fn dispatching_the_sentinel_restarts_every_pane() {
        let items = sample_items();
        let mut tmux = ScriptedTmux::new(24);

        dispatch(&items, RESTART_ALL_ID, &mut tmux).unwrap();

        let targets: Vec<&String> = tmux
            .calls_to("send-keys")
            .iter()
            .map(|call| &call[2])
            .collect();
        assert!(targets.contains(&&"%3".to_string()));
        assert!(targets.contains(&&"%4".to_string()));
        // One interrupt and one send per pane.
        assert_eq!(tmux.calls.len(), 4);
    }

    #[test]
    fn restart_all_over_an_empty_list_is_a_no_op() {
        let mut tmux = ScriptedTmux::new(24);

        dispatch(&[], RESTART_ALL_ID, &mut tmux).unwrap();

        assert!(tmux.calls.is_empty());
    }

    #[test]
    fn dispatching_an_unknown_id_is_an_error_not_a_no_op() {
        let items = sample_items();
        let mut tmux = ScriptedTmux::new(24);

        let err = dispatch(&items, "7", &mut tmux).unwrap_err();

        assert_eq!(err, DispatchError::UnknownId("7".to_string()));
        assert!(tmux.calls.is_empty());
    }
}
