//! Serde-deserializable types matching TMDB API responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs. The fetch
//! orchestrator returns raw JSON (that is what the cache stores); typed
//! endpoints convert through these structs.

use serde::Deserialize;

use super::types::{EpisodeInfo, MediaDetail, MediaSummary, MediaType, SeasonInfo};

// ============================================================================
// Paged list responses (trending, discover, now_playing, search)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiPage {
  #[serde(default)]
  pub results: Vec<ApiMediaItem>,
  #[serde(default)]
  pub page: u32,
  #[serde(default)]
  pub total_pages: u32,
}

#[derive(Debug, Deserialize)]
pub struct ApiMediaItem {
  pub id: u64,
  /// Movies carry `title`, series carry `name`
  pub title: Option<String>,
  pub name: Option<String>,
  /// Only present on search/multi results ("movie", "tv", "person")
  pub media_type: Option<String>,
  #[serde(default)]
  pub overview: String,
  pub poster_path: Option<String>,
  pub backdrop_path: Option<String>,
  #[serde(default)]
  pub vote_average: f64,
  pub release_date: Option<String>,
  pub first_air_date: Option<String>,
}

impl ApiMediaItem {
  /// Convert to a domain summary. Returns `None` for records that aren't
  /// playable media (e.g. `person` results from search/multi).
  pub fn into_summary(self) -> Option<MediaSummary> {
    let media_type = match self.media_type.as_deref() {
      Some("movie") => MediaType::Movie,
      Some("tv") => MediaType::Tv,
      Some(_) => return None,
      // No explicit type: infer the way the site does, title => movie
      None => {
        if self.title.is_some() {
          MediaType::Movie
        } else {
          MediaType::Tv
        }
      }
    };

    let title = self
      .title
      .or(self.name)
      .unwrap_or_else(|| "Unknown".to_string());

    let year = self
      .release_date
      .or(self.first_air_date)
      .filter(|d| d.len() >= 4)
      .map(|d| d[..4].to_string());

    Some(MediaSummary {
      id: self.id,
      title,
      media_type,
      overview: self.overview,
      poster_path: self.poster_path,
      backdrop_path: self.backdrop_path,
      rating: self.vote_average,
      year,
    })
  }
}

// ============================================================================
// Detail endpoint response (movie/{id}, tv/{id})
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiGenre {
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiSeason {
  #[serde(default)]
  pub season_number: u32,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub episode_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct ApiDetailResponse {
  #[serde(default)]
  pub genres: Vec<ApiGenre>,
  pub runtime: Option<u32>,
  pub number_of_seasons: Option<u32>,
  #[serde(default)]
  pub seasons: Vec<ApiSeason>,
}

impl From<ApiDetailResponse> for MediaDetail {
  fn from(resp: ApiDetailResponse) -> Self {
    MediaDetail {
      genres: resp.genres.into_iter().map(|g| g.name).collect(),
      runtime: resp.runtime,
      number_of_seasons: resp.number_of_seasons,
      // Season 0 is "Specials"; the player only deals in regular seasons
      seasons: resp
        .seasons
        .into_iter()
        .filter(|s| s.season_number > 0)
        .map(|s| SeasonInfo {
          season_number: s.season_number,
          name: s.name,
          episode_count: s.episode_count,
        })
        .collect(),
    }
  }
}

// ============================================================================
// Season episodes response (tv/{id}/season/{n})
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiEpisode {
  #[serde(default)]
  pub episode_number: u32,
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiSeasonResponse {
  #[serde(default)]
  pub episodes: Vec<ApiEpisode>,
}

impl From<ApiSeasonResponse> for Vec<EpisodeInfo> {
  fn from(resp: ApiSeasonResponse) -> Self {
    resp
      .episodes
      .into_iter()
      .map(|e| EpisodeInfo {
        episode_number: e.episode_number,
        name: e.name,
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_movie_item_inferred_from_title() {
    let item: ApiMediaItem = serde_json::from_value(json!({
      "id": 603,
      "title": "The Matrix",
      "overview": "A hacker learns the truth.",
      "vote_average": 8.2,
      "release_date": "1999-03-30"
    }))
    .unwrap();

    let summary = item.into_summary().unwrap();
    assert_eq!(summary.media_type, MediaType::Movie);
    assert_eq!(summary.title, "The Matrix");
    assert_eq!(summary.year.as_deref(), Some("1999"));
  }

  #[test]
  fn test_tv_item_inferred_from_name() {
    let item: ApiMediaItem = serde_json::from_value(json!({
      "id": 94796,
      "name": "Squid Game",
      "first_air_date": "2021-09-17"
    }))
    .unwrap();

    let summary = item.into_summary().unwrap();
    assert_eq!(summary.media_type, MediaType::Tv);
    assert_eq!(summary.year.as_deref(), Some("2021"));
  }

  #[test]
  fn test_person_result_is_dropped() {
    let item: ApiMediaItem = serde_json::from_value(json!({
      "id": 500,
      "name": "Tom Cruise",
      "media_type": "person"
    }))
    .unwrap();

    assert!(item.into_summary().is_none());
  }

  #[test]
  fn test_detail_drops_specials_season() {
    let resp: ApiDetailResponse = serde_json::from_value(json!({
      "genres": [{"id": 18, "name": "Drama"}],
      "number_of_seasons": 2,
      "seasons": [
        {"season_number": 0, "name": "Specials", "episode_count": 3},
        {"season_number": 1, "name": "Season 1", "episode_count": 9},
        {"season_number": 2, "name": "Season 2", "episode_count": 7}
      ]
    }))
    .unwrap();

    let detail = MediaDetail::from(resp);
    assert_eq!(detail.genres, vec!["Drama"]);
    assert_eq!(detail.seasons.len(), 2);
    assert_eq!(detail.seasons[0].season_number, 1);
  }
}
