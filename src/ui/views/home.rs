use crate::app::{HomeSection, Section};
use crate::library::ContinueEntry;
use crate::tmdb::types::MediaType;
use crate::ui::renderfns::truncate;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

const ROW_HEIGHT: u16 = 3;
const ITEM_WIDTH: usize = 24;

/// State of one home row's body
enum RowBody<'a> {
  Items(Vec<String>),
  Loading,
  Failed,
  Empty(&'a str),
}

pub fn draw_home(
  frame: &mut Frame,
  area: Rect,
  sections: &[Section],
  continue_row: &[ContinueEntry],
  selected_row: usize,
  selected_col: usize,
) {
  let has_continue = !continue_row.is_empty();
  let row_count = sections.len() + has_continue as usize;

  let mut constraints: Vec<Constraint> = (0..row_count).map(|_| Constraint::Length(ROW_HEIGHT)).collect();
  constraints.push(Constraint::Min(0));
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints(constraints)
    .split(area);

  let mut row = 0;

  if has_continue {
    // Continue entries show the resume position inline
    let labels: Vec<String> = continue_row
      .iter()
      .take(10)
      .map(|e| match e.media.media_type {
        MediaType::Tv => format!("{} S{}E{}", e.media.title, e.season, e.episode),
        MediaType::Movie => e.media.title.clone(),
      })
      .collect();

    draw_row(
      frame,
      chunks[row],
      "Continue Watching",
      RowBody::Items(labels),
      row == selected_row,
      selected_col,
    );
    row += 1;
  }

  for (i, section) in sections.iter().enumerate() {
    let body = if section.loading {
      RowBody::Loading
    } else if section.failed {
      RowBody::Failed
    } else if section.items.is_empty() {
      RowBody::Empty("Nothing here")
    } else {
      RowBody::Items(section.items.iter().map(|m| m.title.clone()).collect())
    };

    draw_row(
      frame,
      chunks[row],
      HomeSection::ALL[i].title(),
      body,
      row == selected_row,
      selected_col,
    );
    row += 1;
  }
}

fn draw_row(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  body: RowBody,
  active: bool,
  selected_col: usize,
) {
  let border = if active { Color::Yellow } else { Color::Blue };
  let block = Block::default()
    .title(format!(" {} ", title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let paragraph = match body {
    RowBody::Loading => Paragraph::new("Loading...")
      .block(block)
      .style(Style::default().fg(Color::DarkGray)),
    RowBody::Failed => Paragraph::new("Failed to load")
      .block(block)
      .style(Style::default().fg(Color::Red)),
    RowBody::Empty(msg) => Paragraph::new(msg)
      .block(block)
      .style(Style::default().fg(Color::DarkGray)),
    RowBody::Items(labels) => {
      // Keep the selection in view by skipping leading items
      let start = if active { selected_col.saturating_sub(2) } else { 0 };

      let mut spans = Vec::new();
      if start > 0 {
        spans.push(Span::styled("… ", Style::default().fg(Color::DarkGray)));
      }
      for (i, label) in labels.iter().enumerate().skip(start) {
        if i > start {
          spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        let style = if active && i == selected_col {
          Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
        } else {
          Style::default()
        };
        spans.push(Span::styled(truncate(label, ITEM_WIDTH), style));
      }
      Paragraph::new(Line::from(spans)).block(block)
    }
  };

  frame.render_widget(paragraph, area);
}
