use serde::{Deserialize, Serialize};

/// Whether a record is a film or a series. TMDB drives this off which title
/// field is present; search results carry it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
  Movie,
  Tv,
}

impl MediaType {
  /// Path segment used by detail endpoints and embed URLs
  pub fn as_str(&self) -> &'static str {
    match self {
      MediaType::Movie => "movie",
      MediaType::Tv => "tv",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      MediaType::Movie => "Movie",
      MediaType::Tv => "TV Series",
    }
  }
}

/// Summary of a media record for rows, grids and search results.
///
/// Serialized as-is into the library files, so watchlist and
/// continue-watching entries keep the full metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSummary {
  pub id: u64,
  pub title: String,
  pub media_type: MediaType,
  #[serde(default)]
  pub overview: String,
  pub poster_path: Option<String>,
  pub backdrop_path: Option<String>,
  /// TMDB vote average, 0.0 when absent
  #[serde(default)]
  pub rating: f64,
  /// Release year, first four characters of the release date
  pub year: Option<String>,
}

/// Extra detail loaded lazily for the detail and player views
#[derive(Debug, Clone, PartialEq)]
pub struct MediaDetail {
  pub genres: Vec<String>,
  /// Minutes, movies only
  pub runtime: Option<u32>,
  /// Series only
  pub number_of_seasons: Option<u32>,
  pub seasons: Vec<SeasonInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonInfo {
  pub season_number: u32,
  pub name: String,
  pub episode_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeInfo {
  pub episode_number: u32,
  pub name: String,
}
