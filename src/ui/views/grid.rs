use crate::app::Tab;
use crate::library::Library;
use crate::tmdb::types::MediaSummary;
use crate::ui::renderfns::{rating_color, truncate};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

pub fn draw_grid(
  frame: &mut Frame,
  area: Rect,
  tab: Tab,
  items: &[MediaSummary],
  selected: usize,
  genre_idx: usize,
  page: u32,
  loading: bool,
  library: &Library,
) {
  let genre_name = tab
    .genres()
    .get(genre_idx)
    .map(|g| g.name)
    .unwrap_or("All");

  let title = if loading {
    format!(" {} [{}] (loading...) ", tab.title(), genre_name)
  } else {
    format!(
      " {} [{}] (page {}, {} titles) ",
      tab.title(),
      genre_name,
      page,
      items.len()
    )
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if items.is_empty() && !loading {
    let paragraph = Paragraph::new("Nothing found. Press [ or ] to change genre.")
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

/// One media record as a list row: type, year, rating, title, watchlist mark
pub fn media_line<'a>(media: &'a MediaSummary, library: &Library) -> ListItem<'a> {
  let mut spans = vec![
    Span::styled(
      format!("{:<10}", media.media_type.label()),
      Style::default().fg(Color::Cyan),
    ),
    Span::styled(
      format!("{:<6}", media.year.as_deref().unwrap_or("----")),
      Style::default().fg(Color::DarkGray),
    ),
    Span::styled(
      format!("{:>4.1} ", media.rating),
      Style::default().fg(rating_color(media.rating)),
    ),
    Span::raw(" "),
    Span::raw(truncate(&media.title, 50)),
  ];

  if library.is_in_watchlist(media.id) {
    spans.push(Span::styled(" ★", Style::default().fg(Color::Yellow)));
  }

  ListItem::new(Line::from(spans))
}
