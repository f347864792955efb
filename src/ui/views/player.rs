use crate::app::PlayerState;
use crate::player::Source;
use crate::tmdb::types::MediaType;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn draw_player(frame: &mut Frame, area: Rect, player: &PlayerState, sources: &[Source]) {
  let block = Block::default()
    .title(format!(" Now Playing: {} ", player.media.title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow));

  let mut lines = Vec::new();

  // Source selector
  let mut source_spans = vec![Span::styled("Source:  ", Style::default().fg(Color::DarkGray))];
  for (i, source) in sources.iter().enumerate() {
    if i > 0 {
      source_spans.push(Span::raw("  "));
    }
    let style = if i == player.source_idx {
      Style::default()
        .bg(Color::DarkGray)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::DarkGray)
    };
    source_spans.push(Span::styled(format!(" {} ", source.label()), style));
  }
  lines.push(Line::from(source_spans));

  if player.media.media_type == MediaType::Tv {
    lines.push(Line::default());

    // Season selector
    let mut season_spans = vec![Span::styled("Season:  ", Style::default().fg(Color::DarkGray))];
    if player.seasons.is_empty() {
      season_spans.push(Span::raw(format!("Season {}", player.season)));
    } else {
      for (i, season) in player.seasons.iter().enumerate() {
        if i > 0 {
          season_spans.push(Span::raw("  "));
        }
        let style = if season.season_number == player.season {
          Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
        } else {
          Style::default().fg(Color::DarkGray)
        };
        season_spans.push(Span::styled(format!(" {} ", season.name), style));
      }
    }
    lines.push(Line::from(season_spans));

    // Episode line
    let episode_line = if player.loading {
      Line::from(Span::styled(
        "Loading episodes...",
        Style::default().fg(Color::DarkGray),
      ))
    } else {
      let name = player
        .episodes
        .iter()
        .find(|e| e.episode_number == player.episode)
        .map(|e| e.name.as_str())
        .unwrap_or("");
      Line::from(vec![
        Span::styled("Episode: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
          format!("{}/{}", player.episode, player.episodes.len()),
          Style::default().fg(Color::White).bold(),
        ),
        Span::raw(format!("  {}", name)),
      ])
    };
    lines.push(episode_line);
  }

  lines.push(Line::default());

  lines.push(Line::from(vec![
    Span::styled("URL: ", Style::default().fg(Color::DarkGray)),
    Span::styled(
      player.embed_url(sources),
      Style::default().fg(Color::Cyan),
    ),
  ]));

  lines.push(Line::default());
  lines.push(Line::from(Span::styled(
    "h/l: source  s/S: season  j/k: episode  Enter: save position  o: open in browser  q: back",
    Style::default().fg(Color::DarkGray),
  )));

  let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
  frame.render_widget(paragraph, area);
}
