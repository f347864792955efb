use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::app::{HomeSection, Tab};
use crate::tmdb::types::{EpisodeInfo, MediaDetail, MediaSummary, SeasonInfo};

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick for UI refresh and toast expiry
  Tick,
  /// A loader task finished
  Data(DataEvent),
  /// Transient user-visible notification
  Toast(String),
}

/// Results reported by async loader tasks. Each loader sends its own event;
/// a failed loader never affects its siblings.
#[derive(Debug)]
pub enum DataEvent {
  SectionLoaded {
    section: HomeSection,
    items: Vec<MediaSummary>,
  },
  SectionFailed {
    section: HomeSection,
  },
  GridLoaded {
    tab: Tab,
    page: u32,
    items: Vec<MediaSummary>,
  },
  GridFailed {
    tab: Tab,
  },
  SearchLoaded {
    query: String,
    items: Vec<MediaSummary>,
  },
  SearchFailed {
    query: String,
  },
  DetailLoaded {
    id: u64,
    detail: MediaDetail,
  },
  DetailFailed {
    id: u64,
  },
  SeasonsLoaded {
    id: u64,
    seasons: Vec<SeasonInfo>,
  },
  EpisodesLoaded {
    id: u64,
    season: u32,
    episodes: Vec<EpisodeInfo>,
  },
  EpisodesFailed {
    id: u64,
    season: u32,
  },
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  tx: mpsc::UnboundedSender<Event>,
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn terminal event reader
    let input_tx = tx.clone();
    tokio::spawn(async move {
      loop {
        if event::poll(tick_rate).unwrap_or(false) {
          if let Ok(evt) = event::read() {
            if let CrosstermEvent::Key(key) = evt {
              if input_tx.send(Event::Key(key)).is_err() {
                break;
              }
            }
          }
        } else {
          // Tick
          if input_tx.send(Event::Tick).is_err() {
            break;
          }
        }
      }
    });

    Self { tx, rx }
  }

  /// Sender handle for loader tasks
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
