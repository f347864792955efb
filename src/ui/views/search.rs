use crate::library::Library;
use crate::tmdb::types::MediaSummary;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use super::grid::media_line;

pub fn draw_search_results(
  frame: &mut Frame,
  area: Rect,
  query: &str,
  items: &[MediaSummary],
  selected: usize,
  loading: bool,
  failed: bool,
  library: &Library,
) {
  let title = if loading {
    format!(" Search \"{}\" (searching...) ", query)
  } else {
    format!(" Search \"{}\" ({}) ", query, items.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if items.is_empty() && !loading {
    let content = if failed {
      "Search failed. Press / to try again."
    } else {
      "No results found."
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let list_items: Vec<ListItem> = items.iter().map(|m| media_line(m, library)).collect();

  let list = List::new(list_items)
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
