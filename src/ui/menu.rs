//! Launcher menu: a small arrow-key list over the configured tools.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::style::{Modifier, Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::{DefaultTerminal, Frame};

use crate::config::MenuItem;

/// Show the launcher menu. `Ok(None)` means the user backed out.
pub fn menu(items: &[MenuItem]) -> std::io::Result<Option<usize>> {
    let mut terminal = ratatui::try_init()?;
    let result = event_loop(&mut terminal, items);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, items: &[MenuItem]) -> std::io::Result<Option<usize>> {
    let mut cursor = 0usize;
    loop {
        terminal.draw(|frame| draw(frame, items, cursor))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Ok(None),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(None)
                }
                KeyCode::Up | KeyCode::Char('k') => cursor = cursor.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => {
                    if cursor + 1 < items.len() {
                        cursor += 1;
                    }
                }
                KeyCode::Enter => return Ok(Some(cursor)),
                _ => {}
            }
        }
    }
}

fn draw(frame: &mut Frame, items: &[MenuItem], cursor: usize) {
    let rows: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            ListItem::new(vec![
                Line::from(format!("{}. {}", i + 1, item.name)),
                Line::from(format!("   {}", item.description)).dim(),
            ])
        })
        .collect();

    let list = List::new(rows)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" AFxW tool launcher ")
                .title_bottom(" up/k  down/j  Enter: run  q: quit "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(cursor));
    frame.render_stateful_widget(list, frame.area(), &mut state);
}
