use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::player::Source;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub tmdb: TmdbConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub retry: RetryConfig,
  /// Tab to open on startup (home, movies, kdrama, anime, watchlist)
  pub default_tab: Option<String>,
  /// Custom title for the header (defaults to "StreamVault")
  pub title: Option<String>,
  /// Embed sources in priority order; the first one is preselected
  #[serde(default = "default_sources")]
  pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbConfig {
  #[serde(default = "default_base_url")]
  pub base_url: String,
  #[serde(default = "default_image_base")]
  pub image_base: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CacheConfig {
  /// LRU capacity of the response cache
  #[serde(default = "default_max_entries")]
  pub max_entries: usize,
  /// Freshness window for cached responses
  #[serde(default = "default_ttl_secs")]
  pub ttl_secs: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RetryConfig {
  /// Total attempt count per request (not "extra" retries)
  #[serde(default = "default_attempts")]
  pub attempts: u32,
  /// Backoff base in milliseconds; waits grow linearly per attempt
  #[serde(default = "default_delay_ms")]
  pub delay_ms: u64,
}

fn default_base_url() -> String {
  "https://api.themoviedb.org/3".to_string()
}

fn default_image_base() -> String {
  "https://image.tmdb.org/t/p/".to_string()
}

fn default_max_entries() -> usize {
  256
}

fn default_ttl_secs() -> u64 {
  300
}

fn default_attempts() -> u32 {
  3
}

fn default_delay_ms() -> u64 {
  1000
}

fn default_sources() -> Vec<Source> {
  Source::ALL.to_vec()
}

impl Default for Config {
  fn default() -> Self {
    Self {
      tmdb: TmdbConfig::default(),
      cache: CacheConfig::default(),
      retry: RetryConfig::default(),
      default_tab: None,
      title: None,
      sources: default_sources(),
    }
  }
}

impl Default for TmdbConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      image_base: default_image_base(),
    }
  }
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      max_entries: default_max_entries(),
      ttl_secs: default_ttl_secs(),
    }
  }
}

impl Default for RetryConfig {
  fn default() -> Self {
    Self {
      attempts: default_attempts(),
      delay_ms: default_delay_ms(),
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./streamvault.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/streamvault/config.yaml
  ///
  /// Unlike the API key, a config file is optional; every setting has a
  /// default.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("streamvault.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("streamvault").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Get the TMDB API key from environment variables.
  ///
  /// Checks SV_TMDB_KEY first, then TMDB_API_KEY as fallback.
  pub fn get_api_key() -> Result<String> {
    std::env::var("SV_TMDB_KEY")
      .or_else(|_| std::env::var("TMDB_API_KEY"))
      .map_err(|_| {
        eyre!(
          "TMDB API key not found. Set SV_TMDB_KEY or TMDB_API_KEY environment variable.\n\
           Get a free key at https://www.themoviedb.org/settings/api"
        )
      })
  }

  /// Directory for logs and library files.
  pub fn data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("streamvault"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_config_uses_defaults() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
    assert_eq!(config.cache.max_entries, 256);
    assert_eq!(config.cache.ttl_secs, 300);
    assert_eq!(config.retry.attempts, 3);
    assert_eq!(config.retry.delay_ms, 1000);
    assert_eq!(config.sources, Source::ALL.to_vec());
  }

  #[test]
  fn test_partial_config_overrides() {
    let yaml = "
cache:
  max_entries: 64
retry:
  attempts: 5
sources: [2embed, vidsrc]
default_tab: movies
";
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.cache.max_entries, 64);
    assert_eq!(config.cache.ttl_secs, 300);
    assert_eq!(config.retry.attempts, 5);
    assert_eq!(config.sources, vec![Source::TwoEmbed, Source::Vidsrc]);
    assert_eq!(config.default_tab.as_deref(), Some("movies"));
  }
}
