//! Locally persisted watchlist and continue-watching lists.
//!
//! Each list is a JSON array on disk, most-recently-used first, de-duplicated
//! by media id and capped at a fixed length. Missing or unreadable files load
//! as empty lists.

use chrono::Utc;
use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::tmdb::types::MediaSummary;

/// Hard cap per list; adding beyond it drops the oldest entry.
pub const MAX_ENTRIES: usize = 20;

const WATCHLIST_FILE: &str = "watchlist.json";
const CONTINUE_FILE: &str = "continue.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntry {
  pub media: MediaSummary,
  /// Unix millis at add time
  pub added_at: i64,
}

/// Last-viewed position for resuming playback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinueEntry {
  pub media: MediaSummary,
  pub season: u32,
  pub episode: u32,
  /// Unix millis at last playback
  pub timestamp: i64,
}

/// Watchlist and continue-watching storage.
pub struct Library {
  dir: PathBuf,
  watchlist: Vec<WatchlistEntry>,
  continue_watching: Vec<ContinueEntry>,
}

impl Library {
  /// Open the library at the default data location.
  pub fn open() -> Result<Self> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Self::open_at(data_dir.join("streamvault"))
  }

  /// Open the library at an explicit directory, creating it if needed.
  pub fn open_at(dir: PathBuf) -> Result<Self> {
    std::fs::create_dir_all(&dir)
      .map_err(|e| eyre!("Failed to create library directory {}: {}", dir.display(), e))?;

    let watchlist = load_list(&dir.join(WATCHLIST_FILE));
    let continue_watching = load_list(&dir.join(CONTINUE_FILE));

    Ok(Self {
      dir,
      watchlist,
      continue_watching,
    })
  }

  pub fn watchlist(&self) -> &[WatchlistEntry] {
    &self.watchlist
  }

  pub fn continue_watching(&self) -> &[ContinueEntry] {
    &self.continue_watching
  }

  pub fn is_in_watchlist(&self, id: u64) -> bool {
    self.watchlist.iter().any(|e| e.media.id == id)
  }

  /// Add the record when absent, remove it when present. Returns whether the
  /// record is in the watchlist afterwards.
  pub fn toggle_watchlist(&mut self, media: &MediaSummary) -> Result<bool> {
    let present = self.is_in_watchlist(media.id);

    if present {
      self.watchlist.retain(|e| e.media.id != media.id);
    } else {
      self.watchlist.insert(
        0,
        WatchlistEntry {
          media: media.clone(),
          added_at: Utc::now().timestamp_millis(),
        },
      );
      self.watchlist.truncate(MAX_ENTRIES);
    }

    self.save_watchlist()?;
    Ok(!present)
  }

  /// Upsert a continue-watching entry: an existing entry for the same id is
  /// replaced and moved to the front.
  pub fn record_progress(&mut self, media: &MediaSummary, season: u32, episode: u32) -> Result<()> {
    self.continue_watching.retain(|e| e.media.id != media.id);
    self.continue_watching.insert(
      0,
      ContinueEntry {
        media: media.clone(),
        season,
        episode,
        timestamp: Utc::now().timestamp_millis(),
      },
    );
    self.continue_watching.truncate(MAX_ENTRIES);

    self.save_continue()
  }

  /// Season/episode to resume from, if this record was watched before.
  pub fn resume_point(&self, id: u64) -> Option<(u32, u32)> {
    self
      .continue_watching
      .iter()
      .find(|e| e.media.id == id)
      .map(|e| (e.season, e.episode))
  }

  pub fn clear_continue(&mut self) -> Result<()> {
    self.continue_watching.clear();
    self.save_continue()
  }

  fn save_watchlist(&self) -> Result<()> {
    save_list(&self.dir.join(WATCHLIST_FILE), &self.watchlist)
  }

  fn save_continue(&self) -> Result<()> {
    save_list(&self.dir.join(CONTINUE_FILE), &self.continue_watching)
  }
}

/// A missing or corrupt file is treated as an empty list, never an error.
fn load_list<T: DeserializeOwned>(path: &Path) -> Vec<T> {
  let contents = match std::fs::read_to_string(path) {
    Ok(c) => c,
    Err(_) => return Vec::new(),
  };

  match serde_json::from_str(&contents) {
    Ok(list) => list,
    Err(e) => {
      warn!(path = %path.display(), error = %e, "ignoring unreadable library file");
      Vec::new()
    }
  }
}

fn save_list<T: Serialize>(path: &Path, list: &[T]) -> Result<()> {
  let contents = serde_json::to_string_pretty(list)
    .map_err(|e| eyre!("Failed to serialize library list: {}", e))?;

  std::fs::write(path, contents)
    .map_err(|e| eyre!("Failed to write {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tmdb::types::MediaType;

  fn media(id: u64) -> MediaSummary {
    MediaSummary {
      id,
      title: format!("Title {}", id),
      media_type: MediaType::Tv,
      overview: String::new(),
      poster_path: None,
      backdrop_path: None,
      rating: 7.0,
      year: Some("2024".to_string()),
    }
  }

  fn open_temp() -> (tempfile::TempDir, Library) {
    let dir = tempfile::tempdir().unwrap();
    let library = Library::open_at(dir.path().to_path_buf()).unwrap();
    (dir, library)
  }

  #[test]
  fn test_toggle_adds_then_removes() {
    let (_dir, mut library) = open_temp();

    assert!(library.toggle_watchlist(&media(1)).unwrap());
    assert!(library.is_in_watchlist(1));

    assert!(!library.toggle_watchlist(&media(1)).unwrap());
    assert!(!library.is_in_watchlist(1));
  }

  #[test]
  fn test_record_progress_dedupes_and_moves_to_front() {
    let (_dir, mut library) = open_temp();

    library.record_progress(&media(1), 1, 1).unwrap();
    library.record_progress(&media(2), 1, 1).unwrap();
    library.record_progress(&media(1), 2, 5).unwrap();

    let entries = library.continue_watching();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].media.id, 1);
    assert_eq!((entries[0].season, entries[0].episode), (2, 5));
    assert_eq!(entries[1].media.id, 2);
  }

  #[test]
  fn test_continue_list_never_exceeds_cap() {
    let (_dir, mut library) = open_temp();

    for id in 0..50 {
      library.record_progress(&media(id), 1, 1).unwrap();
    }

    let entries = library.continue_watching();
    assert_eq!(entries.len(), MAX_ENTRIES);
    // Most recent first, oldest dropped
    assert_eq!(entries[0].media.id, 49);
    assert_eq!(entries[MAX_ENTRIES - 1].media.id, 30);
  }

  #[test]
  fn test_watchlist_never_exceeds_cap() {
    let (_dir, mut library) = open_temp();

    for id in 0..30 {
      library.toggle_watchlist(&media(id)).unwrap();
    }

    assert_eq!(library.watchlist().len(), MAX_ENTRIES);
    assert_eq!(library.watchlist()[0].media.id, 29);
  }

  #[test]
  fn test_resume_point() {
    let (_dir, mut library) = open_temp();

    library.record_progress(&media(7), 3, 12).unwrap();
    assert_eq!(library.resume_point(7), Some((3, 12)));
    assert_eq!(library.resume_point(8), None);
  }

  #[test]
  fn test_lists_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
      let mut library = Library::open_at(dir.path().to_path_buf()).unwrap();
      library.toggle_watchlist(&media(1)).unwrap();
      library.record_progress(&media(2), 1, 4).unwrap();
    }

    let library = Library::open_at(dir.path().to_path_buf()).unwrap();
    assert!(library.is_in_watchlist(1));
    assert_eq!(library.resume_point(2), Some((1, 4)));
  }

  #[test]
  fn test_corrupt_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(WATCHLIST_FILE), "{{{ not json").unwrap();

    let library = Library::open_at(dir.path().to_path_buf()).unwrap();
    assert!(library.watchlist().is_empty());
  }

  #[test]
  fn test_clear_continue() {
    let (_dir, mut library) = open_temp();

    library.record_progress(&media(1), 1, 1).unwrap();
    library.clear_continue().unwrap();
    assert!(library.continue_watching().is_empty());
  }
}
