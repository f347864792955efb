mod components;
mod renderfns;
mod views;

use crate::app::{App, Mode, ViewState};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  renderfns::draw_header(frame, chunks[0], app.title(), &app.view_breadcrumb());

  // Draw current view
  if let Some(view) = app.current_view() {
    match view {
      ViewState::Home {
        sections,
        selected_row,
        selected_col,
      } => {
        views::home::draw_home(
          frame,
          chunks[1],
          sections,
          app.library().continue_watching(),
          *selected_row,
          *selected_col,
        );
      }
      ViewState::Grid {
        tab,
        items,
        selected,
        page,
        genre_idx,
        loading,
      } => {
        views::grid::draw_grid(
          frame,
          chunks[1],
          *tab,
          items,
          *selected,
          *genre_idx,
          *page,
          *loading,
          app.library(),
        );
      }
      ViewState::Watchlist { selected } => {
        views::watchlist::draw_watchlist(
          frame,
          chunks[1],
          app.library().watchlist(),
          *selected,
          app.library(),
        );
      }
      ViewState::SearchResults {
        query,
        items,
        selected,
        loading,
        failed,
      } => {
        views::search::draw_search_results(
          frame,
          chunks[1],
          query,
          items,
          *selected,
          *loading,
          *failed,
          app.library(),
        );
      }
      ViewState::Detail {
        media,
        detail,
        loading,
      } => {
        views::detail::draw_detail(
          frame,
          chunks[1],
          media,
          detail.as_ref(),
          *loading,
          app.library().is_in_watchlist(media.id),
        );
      }
      ViewState::Player(player) => {
        views::player::draw_player(frame, chunks[1], player, app.sources());
      }
    }
  }

  // Draw status bar
  draw_status_bar(frame, chunks[2], app);

  // Command palette floats over the content area
  if *app.mode() == Mode::Command {
    components::draw_command_overlay(
      frame,
      chunks[1],
      app.command_input(),
      &app.autocomplete_suggestions(),
      app.selected_suggestion(),
    );
  }
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  // An active toast takes the whole bar
  if let Some(toast) = app.toast() {
    let paragraph =
      Paragraph::new(format!(" {}", toast)).style(Style::default().fg(Color::Green).bold());
    frame.render_widget(paragraph, area);
    return;
  }

  let (content, style) = match app.mode() {
    Mode::Normal => {
      let hint = match app.current_view() {
        Some(ViewState::Player(_)) => {
          " h/l:source  j/k:episode  s/S:season  Enter:save  o:open  q:back"
        }
        Some(ViewState::Grid { .. }) => {
          " :command  /search  j/k:nav  [/]:genre  m:more  w:watchlist  p:play  Enter:details"
        }
        Some(ViewState::Home { .. }) => {
          " :command  /search  j/k:rows  h/l:items  w:watchlist  p:play  Enter:open  q:quit"
        }
        Some(ViewState::Watchlist { .. }) => {
          " :command  /search  j/k:nav  w:remove  p:play  Enter:details"
        }
        _ => " :command  /search  j/k:nav  Enter:select  q:back  Ctrl-C:quit",
      };
      (hint.to_string(), Style::default().fg(Color::DarkGray))
    }
    Mode::Command => {
      let cmd = format!(":{}", app.command_input());
      (cmd, Style::default().fg(Color::Yellow))
    }
    Mode::Search => {
      let search = format!("/{}_", app.search_input());
      (search, Style::default().fg(Color::Cyan))
    }
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}
