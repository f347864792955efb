use ratatui::prelude::Color;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", cut)
  }
}

/// Get the display color for a TMDB vote average
pub fn rating_color(rating: f64) -> Color {
  if rating >= 7.0 {
    Color::Green
  } else if rating >= 5.0 {
    Color::Yellow
  } else if rating > 0.0 {
    Color::Red
  } else {
    Color::DarkGray
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_is_char_safe() {
    assert_eq!(truncate("사랑의 불시착", 6), "사랑의...");
  }

  #[test]
  fn test_rating_color_high() {
    assert_eq!(rating_color(8.4), Color::Green);
    assert_eq!(rating_color(7.0), Color::Green);
  }

  #[test]
  fn test_rating_color_middling() {
    assert_eq!(rating_color(6.2), Color::Yellow);
  }

  #[test]
  fn test_rating_color_low_and_missing() {
    assert_eq!(rating_color(3.1), Color::Red);
    assert_eq!(rating_color(0.0), Color::DarkGray);
  }
}
