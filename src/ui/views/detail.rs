use crate::tmdb::types::{MediaDetail, MediaSummary, MediaType};
use crate::ui::renderfns::rating_color;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn draw_detail(
  frame: &mut Frame,
  area: Rect,
  media: &MediaSummary,
  detail: Option<&MediaDetail>,
  loading: bool,
  in_watchlist: bool,
) {
  let block = Block::default()
    .title(format!(" {} ", media.title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let mut lines = Vec::new();

  // Meta line: type, year, rating, watchlist state
  let mut meta = vec![Span::styled(
    media.media_type.label(),
    Style::default().fg(Color::Cyan),
  )];
  if let Some(year) = &media.year {
    meta.push(Span::styled(" · ", Style::default().fg(Color::DarkGray)));
    meta.push(Span::raw(year.clone()));
  }
  if media.rating > 0.0 {
    meta.push(Span::styled(" · ", Style::default().fg(Color::DarkGray)));
    meta.push(Span::styled(
      format!("{:.1}/10", media.rating),
      Style::default().fg(rating_color(media.rating)),
    ));
  }
  if in_watchlist {
    meta.push(Span::styled(" · ", Style::default().fg(Color::DarkGray)));
    meta.push(Span::styled("★ watchlist", Style::default().fg(Color::Yellow)));
  }
  lines.push(Line::from(meta));

  match detail {
    Some(d) => {
      if !d.genres.is_empty() {
        lines.push(Line::from(Span::styled(
          d.genres.join(", "),
          Style::default().fg(Color::DarkGray),
        )));
      }
      if let Some(runtime) = d.runtime {
        lines.push(Line::from(format!("{} min", runtime)));
      }
      if let Some(seasons) = d.number_of_seasons {
        let word = if seasons == 1 { "season" } else { "seasons" };
        lines.push(Line::from(format!("{} {}", seasons, word)));
      }
    }
    None if loading => {
      lines.push(Line::from(Span::styled(
        "Loading details...",
        Style::default().fg(Color::DarkGray),
      )));
    }
    None => {}
  }

  lines.push(Line::default());

  if media.overview.is_empty() {
    lines.push(Line::from(Span::styled(
      "No overview available.",
      Style::default().fg(Color::DarkGray),
    )));
  } else {
    lines.push(Line::from(media.overview.clone()));
  }

  lines.push(Line::default());

  let play_hint = match media.media_type {
    MediaType::Movie => "Enter: play  w: watchlist  q: back",
    MediaType::Tv => "Enter: play (resumes last episode)  w: watchlist  q: back",
  };
  lines.push(Line::from(Span::styled(
    play_hint,
    Style::default().fg(Color::DarkGray),
  )));

  let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
  frame.render_widget(paragraph, area);
}
