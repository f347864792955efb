use crate::library::{Library, WatchlistEntry};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use super::grid::media_line;

pub fn draw_watchlist(
  frame: &mut Frame,
  area: Rect,
  entries: &[WatchlistEntry],
  selected: usize,
  library: &Library,
) {
  let block = Block::default()
    .title(format!(" Watchlist ({}) ", entries.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if entries.is_empty() {
    let paragraph = Paragraph::new("Watchlist is empty. Press 'w' on any title to add it.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = entries.iter().map(|e| media_line(&e.media, library)).collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(selected));

  frame.render_stateful_widget(list, area, &mut state);
}
