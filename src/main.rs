mod app;
mod cache;
mod commands;
mod config;
mod event;
mod genres;
mod library;
mod player;
mod tmdb;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "streamvault")]
#[command(about = "A terminal UI for discovering movies, K-dramas and anime")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/streamvault/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Tab to open on startup (home, movies, kdrama, anime, watchlist)
  #[arg(short, long)]
  tab: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Log to a file; stdout belongs to the TUI
  let _log_guard = init_tracing()?;

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Override start tab if specified on command line
  let config = if let Some(tab) = args.tab {
    config::Config {
      default_tab: Some(tab),
      ..config
    }
  } else {
    config
  };

  // Initialize and run the app
  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}

fn init_tracing() -> Result<tracing_appender::non_blocking::WorkerGuard> {
  let log_dir = config::Config::data_dir()?;
  std::fs::create_dir_all(&log_dir)?;

  let appender = tracing_appender::rolling::daily(log_dir, "streamvault.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_writer(writer)
    .with_ansi(false)
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  Ok(guard)
}
