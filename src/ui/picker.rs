//! Full-screen incremental fuzzy picker.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::{DefaultTerminal, Frame};

use super::{PickError, Picker};

pub struct FuzzyPicker {
    matcher: Matcher,
}

impl FuzzyPicker {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT.match_paths()),
        }
    }

    /// Indices of `items` matching `query`, best score first. An empty query
    /// keeps the original order.
    fn filter(&mut self, items: &[String], query: &str) -> Vec<usize> {
        if query.is_empty() {
            return (0..items.len()).collect();
        }
        let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);
        let mut buf = Vec::new();
        let mut scored: Vec<(u32, usize)> = items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| {
                let haystack = Utf32Str::new(item, &mut buf);
                pattern
                    .score(haystack, &mut self.matcher)
                    .map(|score| (score, idx))
            })
            .collect();
        // Ties keep the incoming order.
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.into_iter().map(|(_, idx)| idx).collect()
    }

    fn event_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        items: &[String],
    ) -> Result<usize, PickError> {
        let mut query = String::new();
        let mut filtered = self.filter(items, &query);
        let mut cursor = 0usize;

        loop {
            terminal.draw(|frame| draw(frame, items, &filtered, &query, cursor))?;

            if let Event::Key(key) = event::read()? {
                // Windows terminals also deliver key releases.
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Esc => return Err(PickError::Aborted),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Err(PickError::Aborted)
                    }
                    KeyCode::Enter => {
                        if let Some(&idx) = filtered.get(cursor) {
                            return Ok(idx);
                        }
                    }
                    KeyCode::Up => cursor = cursor.saturating_sub(1),
                    KeyCode::Down => {
                        if cursor + 1 < filtered.len() {
                            cursor += 1;
                        }
                    }
                    KeyCode::Backspace => {
                        query.pop();
                        filtered = self.filter(items, &query);
                        cursor = 0;
                    }
                    KeyCode::Char(c) => {
                        query.push(c);
                        filtered = self.filter(items, &query);
                        cursor = 0;
                    }
                    _ => {}
                }
            }
        }
    }
}

impl Default for FuzzyPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Picker for FuzzyPicker {
    fn pick(&mut self, items: &[String]) -> Result<usize, PickError> {
        let mut terminal = ratatui::try_init()?;
        let result = self.event_loop(&mut terminal, items);
        ratatui::restore();
        result
    }
}

fn draw(frame: &mut Frame, items: &[String], filtered: &[usize], query: &str, cursor: usize) {
    let [list_area, input_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).areas(frame.area());

    let rows: Vec<ListItem> = filtered
        .iter()
        .map(|&idx| ListItem::new(items[idx].as_str()))
        .collect();
    let list = List::new(rows)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} / {} ", filtered.len(), items.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(cursor));
    frame.render_stateful_widget(list, list_area, &mut state);

    let input = Paragraph::new(format!("> {query}")).block(Block::default().borders(Borders::ALL));
    frame.render_widget(input, input_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_query_keeps_every_item_in_order() {
        let mut picker = FuzzyPicker::new();
        let items = items(&["C:\\Users\\Test", "C:\\Projects", "C:\\Windows"]);
        assert_eq!(picker.filter(&items, ""), [0, 1, 2]);
    }

    #[test]
    fn query_narrows_to_matching_items() {
        let mut picker = FuzzyPicker::new();
        let items = items(&["C:\\Users\\Test", "C:\\Projects", "C:\\Windows"]);
        let filtered = picker.filter(&items, "proj");
        assert_eq!(filtered, [1]);
    }

    #[test]
    fn query_matching_nothing_is_empty() {
        let mut picker = FuzzyPicker::new();
        let items = items(&["C:\\Users\\Test", "C:\\Projects"]);
        assert!(picker.filter(&items, "zzzzzz").is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let mut picker = FuzzyPicker::new();
        let items = items(&["C:\\Users\\Test", "C:\\Projects"]);
        assert_eq!(picker.filter(&items, "PROJ"), [1]);
    }
}
