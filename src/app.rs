use crate::commands::{self, Command};
use crate::config::Config;
use crate::event::{DataEvent, Event, EventHandler};
use crate::genres::{Genre, ANIME_GENRES, KDRAMA_GENRES, MOVIE_GENRES};
use crate::library::Library;
use crate::player::{embed_url, Source};
use crate::tmdb::types::{EpisodeInfo, MediaDetail, MediaSummary, MediaType, SeasonInfo};
use crate::tmdb::TmdbClient;
use crate::ui;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::warn;

/// How long a toast stays visible
const TOAST_DURATION: Duration = Duration::from_millis(2500);

/// Items shown per home row
const ROW_LIMIT: usize = 14;

/// Continue-watching entries shown on the home row
const CONTINUE_ROW_LIMIT: usize = 10;

/// Search results kept in the results view
const SEARCH_LIMIT: usize = 10;

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
  Search,
}

/// Root browse tabs, selected via : commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Home,
  Movies,
  Kdrama,
  Anime,
  Watchlist,
}

impl Tab {
  pub fn from_name(name: &str) -> Option<Tab> {
    match name {
      "home" => Some(Tab::Home),
      "movies" => Some(Tab::Movies),
      "kdrama" => Some(Tab::Kdrama),
      "anime" => Some(Tab::Anime),
      "watchlist" => Some(Tab::Watchlist),
      _ => None,
    }
  }

  pub fn title(&self) -> &'static str {
    match self {
      Tab::Home => "Home",
      Tab::Movies => "Movies",
      Tab::Kdrama => "K-Drama",
      Tab::Anime => "Anime",
      Tab::Watchlist => "Watchlist",
    }
  }

  /// Genre filter table for a browse grid
  pub fn genres(&self) -> &'static [Genre] {
    match self {
      Tab::Movies => MOVIE_GENRES,
      Tab::Kdrama => KDRAMA_GENRES,
      Tab::Anime => ANIME_GENRES,
      _ => &[],
    }
  }
}

/// The four content rows on the home tab. Each loads independently; a failed
/// row keeps its placeholder while the others render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeSection {
  Trending,
  Kdramas,
  Anime,
  NewReleases,
}

impl HomeSection {
  pub const ALL: [HomeSection; 4] = [
    HomeSection::Trending,
    HomeSection::Kdramas,
    HomeSection::Anime,
    HomeSection::NewReleases,
  ];

  pub fn title(&self) -> &'static str {
    match self {
      HomeSection::Trending => "Trending Movies",
      HomeSection::Kdramas => "Popular K-Dramas",
      HomeSection::Anime => "Top Anime",
      HomeSection::NewReleases => "New Releases",
    }
  }

  pub fn index(&self) -> usize {
    match self {
      HomeSection::Trending => 0,
      HomeSection::Kdramas => 1,
      HomeSection::Anime => 2,
      HomeSection::NewReleases => 3,
    }
  }
}

/// One home row's load state
#[derive(Debug, Default)]
pub struct Section {
  pub items: Vec<MediaSummary>,
  pub loading: bool,
  pub failed: bool,
}

/// Player view state: the active embed source plus season/episode selection
/// for series.
#[derive(Debug)]
pub struct PlayerState {
  pub media: MediaSummary,
  pub source_idx: usize,
  pub season: u32,
  pub episode: u32,
  pub seasons: Vec<SeasonInfo>,
  pub episodes: Vec<EpisodeInfo>,
  pub loading: bool,
}

impl PlayerState {
  pub fn embed_url(&self, sources: &[Source]) -> String {
    let source = sources.get(self.source_idx).copied().unwrap_or(Source::Vidsrc);
    embed_url(
      source,
      self.media.media_type,
      self.media.id,
      self.season,
      self.episode,
    )
  }
}

/// View state - each variant owns its data
#[derive(Debug)]
pub enum ViewState {
  // Root views (set via : commands)
  Home {
    sections: Vec<Section>,
    selected_row: usize,
    selected_col: usize,
  },
  Grid {
    tab: Tab,
    items: Vec<MediaSummary>,
    selected: usize,
    page: u32,
    genre_idx: usize,
    loading: bool,
  },
  Watchlist {
    selected: usize,
  },

  // Detail views (pushed via Enter)
  SearchResults {
    query: String,
    items: Vec<MediaSummary>,
    selected: usize,
    loading: bool,
    failed: bool,
  },
  Detail {
    media: Box<MediaSummary>,
    detail: Option<MediaDetail>,
    loading: bool,
  },
  Player(Box<PlayerState>),
}

fn home_view() -> ViewState {
  ViewState::Home {
    sections: HomeSection::ALL
      .iter()
      .map(|_| Section {
        loading: true,
        ..Section::default()
      })
      .collect(),
    selected_row: 0,
    selected_col: 0,
  }
}

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<ViewState>,

  /// Current input mode
  mode: Mode,

  /// Command input buffer (after pressing :)
  command_input: String,

  /// Search query input (after pressing /)
  search_input: String,

  /// Selected autocomplete suggestion index
  selected_suggestion: usize,

  /// Application configuration
  config: Config,

  /// TMDB client (cache + retry orchestrator)
  client: TmdbClient,

  /// Watchlist and continue-watching storage
  library: Library,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Receiver side of the client's failure notifier, wired up in run()
  toast_rx: Option<mpsc::UnboundedReceiver<String>>,

  /// Active toast and its expiry
  toast: Option<(String, Instant)>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let (toast_tx, toast_rx) = mpsc::unbounded_channel();
    let client = TmdbClient::new(&config)?.with_notifier(toast_tx);
    let library = Library::open()?;
    let (tx, _rx) = mpsc::unbounded_channel();

    Ok(Self {
      view_stack: vec![home_view()],
      mode: Mode::Normal,
      command_input: String::new(),
      search_input: String::new(),
      selected_suggestion: 0,
      config,
      client,
      library,
      event_tx: tx,
      toast_rx: Some(toast_rx),
      toast: None,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();

    // Forward client failure notifications into the event loop as toasts
    if let Some(mut rx) = self.toast_rx.take() {
      let tx = self.event_tx.clone();
      tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
          if tx.send(Event::Toast(msg)).is_err() {
            break;
          }
        }
      });
    }

    // Initial tab
    let start_tab = self
      .config
      .default_tab
      .as_deref()
      .and_then(Tab::from_name)
      .unwrap_or(Tab::Home);
    self.switch_tab(start_tab);

    // Main loop
    while !self.should_quit {
      // Draw UI
      terminal.draw(|frame| ui::draw(frame, self))?;

      // Handle events
      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {
        // Expire the active toast
        if let Some((_, deadline)) = &self.toast {
          if Instant::now() >= *deadline {
            self.toast = None;
          }
        }
      }
      Event::Data(data) => self.handle_data_event(data),
      Event::Toast(msg) => self.show_toast(msg),
    }
  }

  // ==========================================================================
  // Tabs and loaders
  // ==========================================================================

  fn switch_tab(&mut self, tab: Tab) {
    let root = match tab {
      Tab::Home => home_view(),
      Tab::Movies | Tab::Kdrama | Tab::Anime => ViewState::Grid {
        tab,
        items: Vec::new(),
        selected: 0,
        page: 1,
        genre_idx: 0,
        loading: true,
      },
      Tab::Watchlist => ViewState::Watchlist { selected: 0 },
    };

    self.view_stack.clear();
    self.view_stack.push(root);

    match tab {
      Tab::Home => self.load_home(),
      Tab::Movies | Tab::Kdrama | Tab::Anime => self.load_grid(tab, 0, 1),
      Tab::Watchlist => {}
    }
  }

  /// Load the four home rows concurrently. Each row reports its own result;
  /// one failing never cancels the others.
  fn load_home(&self) {
    let client = self.client.clone();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      let loaders = HomeSection::ALL.map(|section| {
        let client = client.clone();
        let tx = tx.clone();
        async move {
          let result = match section {
            HomeSection::Trending => client.trending_movies().await,
            HomeSection::Kdramas => client.discover_kdramas(None, 1).await,
            HomeSection::Anime => client.discover_anime(None, 1).await,
            HomeSection::NewReleases => client.now_playing().await,
          };

          let event = match result {
            Ok(items) => DataEvent::SectionLoaded { section, items },
            Err(e) => {
              warn!(section = section.title(), error = %e, "home row failed");
              DataEvent::SectionFailed { section }
            }
          };
          let _ = tx.send(Event::Data(event));
        }
      });

      futures::future::join_all(loaders).await;
    });
  }

  fn load_grid(&self, tab: Tab, genre_idx: usize, page: u32) {
    let client = self.client.clone();
    let tx = self.event_tx.clone();
    let genre = tab
      .genres()
      .get(genre_idx)
      .map(|g| g.id)
      .filter(|id| !id.is_empty());

    tokio::spawn(async move {
      let result = match tab {
        Tab::Movies => client.discover_movies(genre, page).await,
        Tab::Kdrama => client.discover_kdramas(genre, page).await,
        Tab::Anime => client.discover_anime(genre, page).await,
        _ => return,
      };

      let event = match result {
        Ok(items) => DataEvent::GridLoaded { tab, page, items },
        Err(e) => {
          warn!(tab = tab.title(), page, error = %e, "grid load failed");
          DataEvent::GridFailed { tab }
        }
      };
      let _ = tx.send(Event::Data(event));
    });
  }

  fn start_search(&mut self) {
    let query = self.search_input.trim().to_string();
    if query.is_empty() {
      return;
    }

    self.view_stack.push(ViewState::SearchResults {
      query: query.clone(),
      items: Vec::new(),
      selected: 0,
      loading: true,
      failed: false,
    });

    let client = self.client.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      let event = match client.search_multi(&query).await {
        Ok(mut items) => {
          // Only keep results that have artwork, like the site does
          items.retain(|i| i.poster_path.is_some() || i.backdrop_path.is_some());
          items.truncate(SEARCH_LIMIT);
          DataEvent::SearchLoaded { query, items }
        }
        Err(e) => {
          warn!(error = %e, "search failed");
          DataEvent::SearchFailed { query }
        }
      };
      let _ = tx.send(Event::Data(event));
    });
  }

  fn open_detail(&mut self, media: MediaSummary) {
    let id = media.id;
    let media_type = media.media_type;

    self.view_stack.push(ViewState::Detail {
      media: Box::new(media),
      detail: None,
      loading: true,
    });

    let client = self.client.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      let event = match client.detail(media_type, id).await {
        Ok(detail) => DataEvent::DetailLoaded { id, detail },
        // Detail enrichment is best-effort; the summary is already shown
        Err(_) => DataEvent::DetailFailed { id },
      };
      let _ = tx.send(Event::Data(event));
    });
  }

  fn open_player(&mut self, media: MediaSummary) {
    let is_series = media.media_type == MediaType::Tv;
    let (season, episode) = if is_series {
      self.library.resume_point(media.id).unwrap_or((1, 1))
    } else {
      (1, 1)
    };

    if let Err(e) = self.library.record_progress(&media, season, episode) {
      self.show_toast(format!("Failed to save progress: {}", e));
    }

    self.view_stack.push(ViewState::Player(Box::new(PlayerState {
      media: media.clone(),
      source_idx: 0,
      season,
      episode,
      seasons: Vec::new(),
      episodes: Vec::new(),
      loading: is_series,
    })));

    if is_series {
      self.load_seasons(media.clone());
      self.load_episodes(media.id, season);
    }
  }

  fn load_seasons(&self, media: MediaSummary) {
    let client = self.client.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      let seasons = match client.detail(MediaType::Tv, media.id).await {
        Ok(detail) => detail.seasons,
        // Same fallback as the site: pretend there's a single season
        Err(_) => vec![SeasonInfo {
          season_number: 1,
          name: "Season 1".to_string(),
          episode_count: 12,
        }],
      };
      let _ = tx.send(Event::Data(DataEvent::SeasonsLoaded {
        id: media.id,
        seasons,
      }));
    });
  }

  fn load_episodes(&self, tv_id: u64, season: u32) {
    let client = self.client.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      let event = match client.season_episodes(tv_id, season).await {
        Ok(episodes) => DataEvent::EpisodesLoaded {
          id: tv_id,
          season,
          episodes,
        },
        Err(_) => DataEvent::EpisodesFailed { id: tv_id, season },
      };
      let _ = tx.send(Event::Data(event));
    });
  }

  // ==========================================================================
  // Data events
  // ==========================================================================

  fn handle_data_event(&mut self, event: DataEvent) {
    match event {
      DataEvent::SectionLoaded { section, mut items } => {
        items.truncate(ROW_LIMIT);
        if let Some(ViewState::Home { sections, .. }) = self.view_stack.first_mut() {
          if let Some(s) = sections.get_mut(section.index()) {
            s.items = items;
            s.loading = false;
            s.failed = false;
          }
        }
      }
      DataEvent::SectionFailed { section } => {
        if let Some(ViewState::Home { sections, .. }) = self.view_stack.first_mut() {
          if let Some(s) = sections.get_mut(section.index()) {
            s.loading = false;
            s.failed = true;
          }
        }
      }
      DataEvent::GridLoaded {
        tab,
        page,
        items: new_items,
      } => {
        if let Some(ViewState::Grid {
          tab: current_tab,
          items,
          page: current_page,
          loading,
          ..
        }) = self.view_stack.first_mut()
        {
          if *current_tab == tab {
            if page <= 1 {
              *items = new_items;
            } else {
              items.extend(new_items);
            }
            *current_page = page;
            *loading = false;
          }
        }
      }
      DataEvent::GridFailed { tab } => {
        if let Some(ViewState::Grid {
          tab: current_tab,
          loading,
          ..
        }) = self.view_stack.first_mut()
        {
          if *current_tab == tab {
            *loading = false;
          }
        }
      }
      DataEvent::SearchLoaded { query, items } => {
        if let Some(ViewState::SearchResults {
          query: current,
          items: list,
          loading,
          ..
        }) = self.view_stack.last_mut()
        {
          if *current == query {
            *list = items;
            *loading = false;
          }
        }
      }
      DataEvent::SearchFailed { query } => {
        if let Some(ViewState::SearchResults {
          query: current,
          loading,
          failed,
          ..
        }) = self.view_stack.last_mut()
        {
          if *current == query {
            *loading = false;
            *failed = true;
          }
        }
      }
      DataEvent::DetailLoaded { id, detail } => {
        if let Some(ViewState::Detail {
          media,
          detail: slot,
          loading,
        }) = self.view_stack.last_mut()
        {
          if media.id == id {
            *slot = Some(detail);
            *loading = false;
          }
        }
      }
      DataEvent::DetailFailed { id } => {
        if let Some(ViewState::Detail { media, loading, .. }) = self.view_stack.last_mut() {
          if media.id == id {
            *loading = false;
          }
        }
      }
      DataEvent::SeasonsLoaded { id, seasons } => {
        if let Some(ViewState::Player(player)) = self.view_stack.last_mut() {
          if player.media.id == id {
            player.seasons = seasons;
          }
        }
      }
      DataEvent::EpisodesLoaded {
        id,
        season,
        episodes,
      } => {
        if let Some(ViewState::Player(player)) = self.view_stack.last_mut() {
          if player.media.id == id && player.season == season {
            player.episodes = episodes;
            player.loading = false;
            let count = player.episodes.len() as u32;
            if count > 0 && player.episode > count {
              player.episode = 1;
            }
          }
        }
      }
      DataEvent::EpisodesFailed { id, season } => {
        if let Some(ViewState::Player(player)) = self.view_stack.last_mut() {
          if player.media.id == id && player.season == season {
            // Episode listing unavailable; offer a plain 1..12 range
            player.episodes = (1..=12)
              .map(|n| EpisodeInfo {
                episode_number: n,
                name: format!("Episode {}", n),
              })
              .collect();
            player.loading = false;
          }
        }
      }
    }
  }

  // ==========================================================================
  // Key handling
  // ==========================================================================

  fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Command => self.handle_command_mode_key(key),
      Mode::Search => self.handle_search_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    match key.code {
      // Quit
      KeyCode::Char('q') => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }
      KeyCode::Esc => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        }
      }

      // Mode switches
      KeyCode::Char(':') => {
        self.mode = Mode::Command;
        self.command_input.clear();
      }
      KeyCode::Char('/') => {
        self.mode = Mode::Search;
        self.search_input.clear();
      }

      _ => self.handle_view_key(key),
    }
  }

  /// Keys routed to the current view
  fn handle_view_key(&mut self, key: crossterm::event::KeyEvent) {
    let is_player = matches!(self.view_stack.last(), Some(ViewState::Player(_)));
    if is_player {
      self.handle_player_key(key);
      return;
    }

    match key.code {
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1, 0),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1, 0),
      KeyCode::Left | KeyCode::Char('h') => self.move_selection(0, -1),
      KeyCode::Right | KeyCode::Char('l') => self.move_selection(0, 1),
      KeyCode::Enter => self.enter_selected(),
      KeyCode::Char('w') => self.toggle_selected_watchlist(),
      KeyCode::Char('p') => {
        if let Some(media) = self.selected_media() {
          self.open_player(media);
        }
      }
      // Grid only: load more / cycle genre
      KeyCode::Char('m') => self.grid_load_more(),
      KeyCode::Char(']') => self.grid_cycle_genre(1),
      KeyCode::Char('[') => self.grid_cycle_genre(-1),
      _ => {}
    }
  }

  fn handle_player_key(&mut self, key: crossterm::event::KeyEvent) {
    let source_count = self.config.sources.len().max(1);

    let Some(ViewState::Player(player)) = self.view_stack.last_mut() else {
      return;
    };

    match key.code {
      KeyCode::Left | KeyCode::Char('h') => {
        player.source_idx = (player.source_idx + source_count - 1) % source_count;
      }
      KeyCode::Right | KeyCode::Char('l') => {
        player.source_idx = (player.source_idx + 1) % source_count;
      }
      KeyCode::Down | KeyCode::Char('j') => {
        let count = player.episodes.len() as u32;
        if count > 0 {
          player.episode = player.episode % count + 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        let count = player.episodes.len() as u32;
        if count > 0 {
          player.episode = if player.episode <= 1 {
            count
          } else {
            player.episode - 1
          };
        }
      }
      KeyCode::Char('s') => self.player_cycle_season(1),
      KeyCode::Char('S') => self.player_cycle_season(-1),
      KeyCode::Enter => self.player_load_episode(),
      KeyCode::Char('o') => self.player_open_browser(),
      _ => {}
    }
  }

  fn player_cycle_season(&mut self, delta: i32) {
    let mut reload = None;

    if let Some(ViewState::Player(player)) = self.view_stack.last_mut() {
      let count = player.seasons.len();
      if count == 0 || player.media.media_type != MediaType::Tv {
        return;
      }

      let current = player
        .seasons
        .iter()
        .position(|s| s.season_number == player.season)
        .unwrap_or(0);
      let next = (current as i32 + delta).rem_euclid(count as i32) as usize;
      let season = player.seasons[next].season_number;

      if season != player.season {
        player.season = season;
        player.episode = 1;
        player.episodes.clear();
        player.loading = true;
        reload = Some((player.media.id, season));
      }
    }

    if let Some((id, season)) = reload {
      self.load_episodes(id, season);
    }
  }

  /// The "load episode" action: persist the resume point and confirm.
  fn player_load_episode(&mut self) {
    let Some(ViewState::Player(player)) = self.view_stack.last() else {
      return;
    };

    let media = player.media.clone();
    let (season, episode) = (player.season, player.episode);

    let message = match media.media_type {
      MediaType::Tv => format!("Playing {} S{} E{}", media.title, season, episode),
      MediaType::Movie => format!("Playing {}", media.title),
    };

    if let Err(e) = self.library.record_progress(&media, season, episode) {
      self.show_toast(format!("Failed to save progress: {}", e));
    } else {
      self.show_toast(message);
    }
  }

  fn player_open_browser(&mut self) {
    self.player_load_episode();

    let Some(ViewState::Player(player)) = self.view_stack.last() else {
      return;
    };
    let url = player.embed_url(&self.config.sources);

    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(not(target_os = "macos"))]
    let opener = "xdg-open";

    tokio::spawn(async move {
      if let Err(e) = tokio::process::Command::new(opener).arg(&url).status().await {
        warn!(error = %e, url = %url, "failed to launch browser");
      }
    });
  }

  fn grid_load_more(&mut self) {
    let mut load = None;

    if let Some(ViewState::Grid {
      tab,
      page,
      genre_idx,
      loading,
      ..
    }) = self.view_stack.first_mut()
    {
      if !*loading {
        *loading = true;
        load = Some((*tab, *genre_idx, *page + 1));
      }
    }

    if let Some((tab, genre_idx, page)) = load {
      self.load_grid(tab, genre_idx, page);
    }
  }

  fn grid_cycle_genre(&mut self, delta: i32) {
    let mut load = None;

    if let Some(ViewState::Grid {
      tab,
      items,
      selected,
      page,
      genre_idx,
      loading,
    }) = self.view_stack.first_mut()
    {
      let genres = tab.genres();
      if genres.is_empty() {
        return;
      }

      *genre_idx = (*genre_idx as i32 + delta).rem_euclid(genres.len() as i32) as usize;
      items.clear();
      *selected = 0;
      *page = 1;
      *loading = true;
      load = Some((*tab, *genre_idx));
    }

    if let Some((tab, genre_idx)) = load {
      self.load_grid(tab, genre_idx, 1);
    }
  }

  fn move_selection(&mut self, row_delta: i32, col_delta: i32) {
    let continue_len = self.library.continue_watching().len().min(CONTINUE_ROW_LIMIT);

    match self.view_stack.last_mut() {
      Some(ViewState::Home {
        sections,
        selected_row,
        selected_col,
      }) => {
        let has_continue = continue_len > 0;
        let row_count = sections.len() + has_continue as usize;
        if row_count == 0 {
          return;
        }

        *selected_row =
          (*selected_row as i32 + row_delta).rem_euclid(row_count as i32) as usize;

        let row_len = if has_continue && *selected_row == 0 {
          continue_len
        } else {
          sections[*selected_row - has_continue as usize].items.len()
        };

        if row_len > 0 {
          let col = (*selected_col).min(row_len - 1);
          *selected_col = (col as i32 + col_delta).rem_euclid(row_len as i32) as usize;
        } else {
          *selected_col = 0;
        }
      }
      Some(ViewState::Grid {
        items, selected, ..
      }) => {
        let len = items.len();
        if len > 0 {
          let delta = row_delta + col_delta;
          *selected = (*selected as i32 + delta).rem_euclid(len as i32) as usize;
        }
      }
      Some(ViewState::Watchlist { selected }) => {
        let len = self.library.watchlist().len();
        if len > 0 {
          let delta = row_delta + col_delta;
          *selected = (*selected as i32 + delta).rem_euclid(len as i32) as usize;
        }
      }
      Some(ViewState::SearchResults {
        items, selected, ..
      }) => {
        let len = items.len();
        if len > 0 {
          let delta = row_delta + col_delta;
          *selected = (*selected as i32 + delta).rem_euclid(len as i32) as usize;
        }
      }
      _ => {}
    }
  }

  /// The media record under the cursor, if any
  fn selected_media(&self) -> Option<MediaSummary> {
    match self.view_stack.last()? {
      ViewState::Home {
        sections,
        selected_row,
        selected_col,
      } => {
        let continue_len = self.library.continue_watching().len().min(CONTINUE_ROW_LIMIT);
        let has_continue = continue_len > 0;
        if has_continue && *selected_row == 0 {
          self
            .library
            .continue_watching()
            .get(*selected_col)
            .map(|e| e.media.clone())
        } else {
          sections
            .get(selected_row - has_continue as usize)?
            .items
            .get(*selected_col)
            .cloned()
        }
      }
      ViewState::Grid {
        items, selected, ..
      } => items.get(*selected).cloned(),
      ViewState::Watchlist { selected } => self
        .library
        .watchlist()
        .get(*selected)
        .map(|e| e.media.clone()),
      ViewState::SearchResults {
        items, selected, ..
      } => items.get(*selected).cloned(),
      ViewState::Detail { media, .. } => Some(media.as_ref().clone()),
      ViewState::Player(player) => Some(player.media.clone()),
    }
  }

  fn enter_selected(&mut self) {
    // Continue-watching entries resume playback directly; everything else
    // opens the detail view first.
    let resume = matches!(
      self.view_stack.last(),
      Some(ViewState::Home { selected_row: 0, .. })
    ) && !self.library.continue_watching().is_empty();

    let from_detail = matches!(self.view_stack.last(), Some(ViewState::Detail { .. }));

    if let Some(media) = self.selected_media() {
      if resume || from_detail {
        self.open_player(media);
      } else {
        self.open_detail(media);
      }
    }
  }

  fn toggle_selected_watchlist(&mut self) {
    let Some(media) = self.selected_media() else {
      return;
    };

    match self.library.toggle_watchlist(&media) {
      Ok(true) => self.show_toast("Added to watchlist!"),
      Ok(false) => {
        self.show_toast("Removed from watchlist");
        // Keep the cursor in range after removal
        if let Some(ViewState::Watchlist { selected }) = self.view_stack.last_mut() {
          let len = self.library.watchlist().len();
          if *selected >= len {
            *selected = len.saturating_sub(1);
          }
        }
      }
      Err(e) => self.show_toast(format!("Failed to update watchlist: {}", e)),
    }
  }

  // ==========================================================================
  // Command and search modes
  // ==========================================================================

  fn handle_command_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      KeyCode::Enter => {
        self.execute_command();
        self.mode = Mode::Normal;
        self.selected_suggestion = 0;
      }
      KeyCode::Tab | KeyCode::Down => {
        // Navigate autocomplete suggestions
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = (self.selected_suggestion + 1) % suggestions.len();
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        // Navigate autocomplete suggestions backwards
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = if self.selected_suggestion == 0 {
            suggestions.len() - 1
          } else {
            self.selected_suggestion - 1
          };
        }
      }
      KeyCode::Backspace => {
        self.command_input.pop();
        self.selected_suggestion = 0; // Reset selection on input change
      }
      KeyCode::Char(c) => {
        self.command_input.push(c);
        self.selected_suggestion = 0; // Reset selection on input change
      }
      _ => {}
    }
  }

  fn handle_search_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.search_input.clear();
      }
      KeyCode::Enter => {
        self.mode = Mode::Normal;
        self.start_search();
      }
      KeyCode::Backspace => {
        self.search_input.pop();
      }
      KeyCode::Char(c) => {
        self.search_input.push(c);
      }
      _ => {}
    }
  }

  fn execute_command(&mut self) {
    // Get the command to execute - either from selected suggestion or direct input
    let suggestions = commands::get_suggestions(&self.command_input);
    let cmd = if !suggestions.is_empty() && self.selected_suggestion < suggestions.len() {
      suggestions[self.selected_suggestion].name.to_string()
    } else {
      self.command_input.trim().to_lowercase()
    };

    if let Some(tab) = Tab::from_name(&cmd) {
      self.switch_tab(tab);
    } else {
      match cmd.as_str() {
        "clear-continue" => {
          match self.library.clear_continue() {
            Ok(()) => self.show_toast("Continue watching cleared"),
            Err(e) => self.show_toast(format!("Failed to clear: {}", e)),
          }
        }
        "quit" => {
          self.should_quit = true;
        }
        _ => {
          // Unknown command
        }
      }
    }
    self.command_input.clear();
  }

  fn show_toast(&mut self, message: impl Into<String>) {
    self.toast = Some((message.into(), Instant::now() + TOAST_DURATION));
  }

  // ==========================================================================
  // Accessors for UI rendering
  // ==========================================================================

  pub fn current_view(&self) -> Option<&ViewState> {
    self.view_stack.last()
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn command_input(&self) -> &str {
    &self.command_input
  }

  pub fn search_input(&self) -> &str {
    &self.search_input
  }

  pub fn title(&self) -> &str {
    self.config.title.as_deref().unwrap_or("StreamVault")
  }

  pub fn sources(&self) -> &[Source] {
    &self.config.sources
  }

  pub fn library(&self) -> &Library {
    &self.library
  }

  pub fn toast(&self) -> Option<&str> {
    self.toast.as_ref().map(|(msg, _)| msg.as_str())
  }

  pub fn view_breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }

  pub fn autocomplete_suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(&self.command_input)
  }

  pub fn selected_suggestion(&self) -> usize {
    self.selected_suggestion
  }
}

impl ViewState {
  /// Get the label for this view in the breadcrumb
  fn breadcrumb_label(&self) -> String {
    match self {
      ViewState::Home { .. } => "Home".to_string(),
      ViewState::Grid { tab, genre_idx, .. } => {
        match tab.genres().get(*genre_idx) {
          Some(genre) if !genre.id.is_empty() => format!("{} [{}]", tab.title(), genre.name),
          _ => tab.title().to_string(),
        }
      }
      ViewState::Watchlist { .. } => "Watchlist".to_string(),
      ViewState::SearchResults { query, .. } => format!("Search \"{}\"", query),
      ViewState::Detail { media, .. } => media.title.clone(),
      ViewState::Player(player) => format!("Playing: {}", player.media.title),
    }
  }
}
