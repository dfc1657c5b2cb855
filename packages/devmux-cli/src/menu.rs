use std::io;

use clap::Args;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame, Terminal,
};

use devmux_core::dispatch::{self, MenuItem, RESTART_ALL_ID};
use devmux_core::Tmux;

#[derive(Args)]
pub struct MenuArgs {
    /// Comma-separated id:paneId:title:description:command entries
    #[arg(long)]
    pub items: String,
}

pub fn run(args: MenuArgs) {
    if let Err(e) = run_inner(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_inner(args: MenuArgs) -> Result<(), String> {
    // Reject a bad item list before touching the terminal.
    let items = dispatch::parse_items(&args.items).map_err(|e| e.to_string())?;

    let mut terminal =
        setup_terminal().map_err(|e| format!("Failed to set up terminal: {}", e))?;
    let result = menu_loop(&mut terminal, &items);
    restore_terminal(terminal).map_err(|e| format!("Failed to restore terminal: {}", e))?;

    result
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Blocking single-threaded loop: draw, wait for one event, handle it to
/// completion (a dispatch runs synchronously inside the key handler), wait
/// for the next one.
fn menu_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    items: &[MenuItem],
) -> Result<(), String> {
    let mut tmux = Tmux;
    let mut state = ListState::default();
    state.select(Some(0));

    loop {
        terminal
            .draw(|frame| draw_menu(frame, items, &mut state))
            .map_err(|e| format!("Failed to draw menu: {}", e))?;

        match event::read().map_err(|e| format!("Failed to read input: {}", e))? {
            Event::Key(key) => {
                if !handle_key(key, items, &mut state, &mut tmux)? {
                    return Ok(());
                }
            }
            // Resize is handled by the redraw at the top of the loop.
            _ => {}
        }
    }
}

/// Returns false when the picker should exit.
fn handle_key(
    key: KeyEvent,
    items: &[MenuItem],
    state: &mut ListState,
    tmux: &mut Tmux,
) -> Result<bool, String> {
    if key.kind != KeyEventKind::Press {
        return Ok(true);
    }

    let count = items.len() + 1;

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Ok(false);
        }
        KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
        KeyCode::Down | KeyCode::Char('j') => {
            let next = match state.selected() {
                Some(i) if i + 1 < count => i + 1,
                _ => 0,
            };
            state.select(Some(next));
        }
        KeyCode::Up | KeyCode::Char('k') => {
            let next = match state.selected() {
                Some(0) | None => count - 1,
                Some(i) => i - 1,
            };
            state.select(Some(next));
        }
        KeyCode::Enter => {
            if let Some(selected) = state.selected() {
                let id = entry_ids(items)[selected];
                dispatch::dispatch(items, id, tmux).map_err(|e| e.to_string())?;
            }
        }
        KeyCode::Char(c) => {
            // Single-keystroke ids jump the cursor and dispatch immediately.
            if let Some(index) = entry_for_key(items, c) {
                state.select(Some(index));
                let id = entry_ids(items)[index];
                dispatch::dispatch(items, id, tmux).map_err(|e| e.to_string())?;
            }
        }
        _ => {}
    }

    Ok(true)
}

fn draw_menu(frame: &mut Frame, items: &[MenuItem], state: &mut ListState) {
    let entries: Vec<ListItem> = list_entries(items)
        .into_iter()
        .map(|(title, description)| {
            ListItem::new(vec![
                Line::from(title),
                Line::styled(description, Style::default().add_modifier(Modifier::DIM)),
            ])
        })
        .collect();

    let list = List::new(entries)
        .block(Block::default().title("Dev Menu").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, frame.area(), state);
}

/// Selection ids in list order: the restart-all sentinel first, then the
/// configured items.
fn entry_ids(items: &[MenuItem]) -> Vec<&str> {
    let mut ids = vec![RESTART_ALL_ID];
    ids.extend(items.iter().map(|item| item.id.as_str()));
    ids
}

/// List entry index for a direct id-shortcut keystroke.
fn entry_for_key(items: &[MenuItem], key: char) -> Option<usize> {
    entry_ids(items)
        .iter()
        .position(|id| id.len() == 1 && id.starts_with(key))
}

/// (title, description) pairs in list order.
fn list_entries(items: &[MenuItem]) -> Vec<(String, String)> {
    let mut entries = vec![(
        format!("{}. Restart all", RESTART_ALL_ID),
        "Restart all services".to_string(),
    )];

    for item in items {
        entries.push((
            format!("{}. {}", item.id, item.title),
            item.description.clone(),
        ));
    }

    entries
}
