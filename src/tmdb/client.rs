//! TMDB API client with cache-backed retry.
//!
//! All page loaders go through [`TmdbClient::fetch_json`], which composes the
//! TTL cache with a bounded retry loop: cache hit short-circuits with no
//! network call, a miss runs up to `retries` sequential attempts with linear
//! backoff between them, and only a successful response is ever cached.

use color_eyre::{eyre::eyre, Result};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use url::Url;

use crate::cache::TtlCache;
use crate::config::Config;

use super::api_types::{ApiDetailResponse, ApiPage, ApiSeasonResponse};
use super::types::{EpisodeInfo, MediaDetail, MediaSummary, MediaType};

/// Per-call knobs for the fetch orchestrator.
#[derive(Debug, Clone)]
pub struct FetchOptions {
  /// Total attempt count, not "extra retries": `retries = 3` means at most
  /// three network calls.
  pub retries: u32,
  /// Backoff base; the wait before attempt k+1 is `retry_delay * k`
  pub retry_delay: Duration,
  /// Consult and populate the cache under this key when set
  pub cache_key: Option<String>,
  /// TTL for the cache write; zero means the result is not cached
  pub cache_duration: Duration,
  /// Surface a toast through the notifier when every attempt fails
  pub show_error: bool,
}

impl Default for FetchOptions {
  fn default() -> Self {
    Self {
      retries: 3,
      retry_delay: Duration::from_millis(1000),
      cache_key: None,
      cache_duration: Duration::ZERO,
      show_error: true,
    }
  }
}

impl FetchOptions {
  pub fn cached(key: impl Into<String>, ttl: Duration) -> Self {
    Self {
      cache_key: Some(key.into()),
      cache_duration: ttl,
      ..Self::default()
    }
  }

  pub fn with_retries(mut self, retries: u32) -> Self {
    self.retries = retries;
    self
  }

  pub fn with_retry_delay(mut self, delay: Duration) -> Self {
    self.retry_delay = delay;
    self
  }

  /// Don't toast on failure; the caller renders its own error state
  pub fn silent(mut self) -> Self {
    self.show_error = false;
    self
  }
}

/// TMDB API client. Cheap to clone; the cache is shared across clones.
#[derive(Clone)]
pub struct TmdbClient {
  http: reqwest::Client,
  base_url: String,
  api_key: String,
  cache: Arc<Mutex<TtlCache>>,
  /// Default TTL for cached endpoints (config `cache.ttl_secs`)
  cache_ttl: Duration,
  retries: u32,
  retry_delay: Duration,
  toast_tx: Option<mpsc::UnboundedSender<String>>,
}

impl TmdbClient {
  pub fn new(config: &Config) -> Result<Self> {
    let api_key = Config::get_api_key()?;

    let http = reqwest::Client::builder()
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url: config.tmdb.base_url.trim_end_matches('/').to_string(),
      api_key,
      cache: Arc::new(Mutex::new(TtlCache::new(config.cache.max_entries))),
      cache_ttl: Duration::from_secs(config.cache.ttl_secs),
      retries: config.retry.attempts.max(1),
      retry_delay: Duration::from_millis(config.retry.delay_ms),
      toast_tx: None,
    })
  }

  /// Attach a channel for user-visible failure notifications.
  pub fn with_notifier(mut self, tx: mpsc::UnboundedSender<String>) -> Self {
    self.toast_tx = Some(tx);
    self
  }

  /// Options seeded with the configured retry policy.
  fn options(&self) -> FetchOptions {
    FetchOptions::default()
      .with_retries(self.retries)
      .with_retry_delay(self.retry_delay)
  }

  /// Options seeded with the configured retry policy and cache TTL.
  fn cached_options(&self, key: impl Into<String>) -> FetchOptions {
    let mut opts = self.options();
    opts.cache_key = Some(key.into());
    opts.cache_duration = self.cache_ttl;
    opts
  }

  /// Fetch a JSON payload from a TMDB path, going through the cache and the
  /// retry loop. Attempts are strictly sequential; a non-2xx status, a
  /// transport failure and a malformed body all count as a failed attempt.
  pub async fn fetch_json(
    &self,
    path: &str,
    params: &[(&str, &str)],
    opts: &FetchOptions,
  ) -> Result<Value> {
    if let Some(key) = &opts.cache_key {
      if let Some(payload) = self.cache.lock().get(key) {
        debug!(key = %key, "cache hit");
        return Ok(payload);
      }
    }

    let url = self.build_url(path, params)?;
    let retries = opts.retries.max(1);
    let mut last_err = None;

    for attempt in 1..=retries {
      match self.try_fetch(url.clone()).await {
        Ok(payload) => {
          if let Some(key) = &opts.cache_key {
            if opts.cache_duration > Duration::ZERO {
              self
                .cache
                .lock()
                .set(key.clone(), payload.clone(), opts.cache_duration);
            }
          }
          return Ok(payload);
        }
        Err(e) => {
          warn!(path = %path, attempt, retries, error = %e, "request attempt failed");
          last_err = Some(e);
          if attempt < retries {
            tokio::time::sleep(opts.retry_delay * attempt).await;
          }
        }
      }
    }

    let err = last_err.unwrap_or_else(|| eyre!("request failed: {}", path));
    if opts.show_error {
      self.notify(format!("Failed to load {}", path));
    }
    Err(err)
  }

  async fn try_fetch(&self, url: Url) -> Result<Value> {
    let res = self
      .http
      .get(url)
      .send()
      .await
      .map_err(|e| eyre!("Request failed: {}", e))?;

    let status = res.status();
    if !status.is_success() {
      return Err(eyre!("TMDB {}", status.as_u16()));
    }

    res
      .json::<Value>()
      .await
      .map_err(|e| eyre!("Failed to parse response: {}", e))
  }

  /// Build the request URL; the API key rides along as a query parameter on
  /// every call, per the TMDB contract.
  fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
    let full = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
    let mut url = Url::parse(&full).map_err(|e| eyre!("Invalid URL {}: {}", full, e))?;

    {
      let mut pairs = url.query_pairs_mut();
      pairs.append_pair("api_key", &self.api_key);
      for (k, v) in params {
        pairs.append_pair(k, v);
      }
    }

    Ok(url)
  }

  fn notify(&self, message: String) {
    if let Some(tx) = &self.toast_tx {
      let _ = tx.send(message);
    }
  }

  // ==========================================================================
  // Typed endpoints
  // ==========================================================================

  /// Trending movies of the week (home hero row)
  pub async fn trending_movies(&self) -> Result<Vec<MediaSummary>> {
    let payload = self
      .fetch_json(
        "trending/movie/week",
        &[],
        &self.cached_options("trending:movie:week"),
      )
      .await?;
    page_to_summaries(payload)
  }

  /// Movies currently in theaters (home "new releases" row)
  pub async fn now_playing(&self) -> Result<Vec<MediaSummary>> {
    let payload = self
      .fetch_json(
        "movie/now_playing",
        &[],
        &self.cached_options("movie:now_playing"),
      )
      .await?;
    page_to_summaries(payload)
  }

  /// Discover movies by popularity, optionally narrowed to a genre
  pub async fn discover_movies(&self, genre: Option<&str>, page: u32) -> Result<Vec<MediaSummary>> {
    let page_param = page.to_string();
    let mut params: Vec<(&str, &str)> =
      vec![("sort_by", "popularity.desc"), ("page", &page_param)];
    if let Some(g) = genre {
      params.push(("with_genres", g));
    }

    let key = format!("discover:movie:{}:{}", genre.unwrap_or(""), page);
    let payload = self
      .fetch_json("discover/movie", &params, &self.cached_options(key))
      .await?;
    page_to_summaries(payload)
  }

  /// Discover Korean series by popularity, optionally narrowed to a genre
  pub async fn discover_kdramas(&self, genre: Option<&str>, page: u32) -> Result<Vec<MediaSummary>> {
    let page_param = page.to_string();
    let mut params: Vec<(&str, &str)> = vec![
      ("with_origin_country", "KR"),
      ("sort_by", "popularity.desc"),
      ("page", &page_param),
      ("language", "en-US"),
    ];
    if let Some(g) = genre {
      params.push(("with_genres", g));
    }

    let key = format!("discover:kdrama:{}:{}", genre.unwrap_or(""), page);
    let payload = self
      .fetch_json("discover/tv", &params, &self.cached_options(key))
      .await?;
    page_to_summaries(payload)
  }

  /// Discover Japanese animation by popularity. A selected genre combines
  /// with the animation genre rather than replacing it.
  pub async fn discover_anime(&self, genre: Option<&str>, page: u32) -> Result<Vec<MediaSummary>> {
    let genres = match genre {
      Some(g) if g != "16" => format!("16,{}", g),
      _ => "16".to_string(),
    };
    let page_param = page.to_string();
    let params: Vec<(&str, &str)> = vec![
      ("with_genres", &genres),
      ("with_origin_country", "JP"),
      ("sort_by", "popularity.desc"),
      ("page", &page_param),
    ];

    let key = format!("discover:anime:{}:{}", genres, page);
    let payload = self
      .fetch_json("discover/tv", &params, &self.cached_options(key))
      .await?;
    page_to_summaries(payload)
  }

  /// Multi search across movies and series. Never cached; person results are
  /// dropped. The caller renders its own failure state, so no toast.
  pub async fn search_multi(&self, query: &str) -> Result<Vec<MediaSummary>> {
    let params: Vec<(&str, &str)> = vec![("query", query), ("include_adult", "false")];
    let payload = self
      .fetch_json("search/multi", &params, &self.options().silent())
      .await?;
    page_to_summaries(payload)
  }

  /// Full detail for a movie or series. Failure here only degrades the
  /// detail view's meta line, so no toast.
  pub async fn detail(&self, media_type: MediaType, id: u64) -> Result<MediaDetail> {
    let key = format!("detail:{}:{}", media_type.as_str(), id);
    let payload = self
      .fetch_json(
        &format!("{}/{}", media_type.as_str(), id),
        &[],
        &self.cached_options(key).silent(),
      )
      .await?;

    let detail: ApiDetailResponse = serde_json::from_value(payload)
      .map_err(|e| eyre!("Failed to parse detail response: {}", e))?;
    Ok(detail.into())
  }

  /// Episode listing for one season of a series
  pub async fn season_episodes(&self, tv_id: u64, season: u32) -> Result<Vec<EpisodeInfo>> {
    let key = format!("episodes:{}:{}", tv_id, season);
    let payload = self
      .fetch_json(
        &format!("tv/{}/season/{}", tv_id, season),
        &[],
        &self.cached_options(key).silent(),
      )
      .await?;

    let resp: ApiSeasonResponse = serde_json::from_value(payload)
      .map_err(|e| eyre!("Failed to parse season response: {}", e))?;
    Ok(resp.into())
  }
}

fn page_to_summaries(payload: Value) -> Result<Vec<MediaSummary>> {
  let page: ApiPage = serde_json::from_value(payload)
    .map_err(|e| eyre!("Failed to parse list response: {}", e))?;

  Ok(
    page
      .results
      .into_iter()
      .filter_map(|item| item.into_summary())
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use tokio::time::Instant;
  use wiremock::matchers::{method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn test_client(server_url: &str) -> TmdbClient {
    TmdbClient {
      http: reqwest::Client::new(),
      base_url: server_url.trim_end_matches('/').to_string(),
      api_key: "test-key".to_string(),
      cache: Arc::new(Mutex::new(TtlCache::default())),
      cache_ttl: Duration::from_secs(300),
      retries: 3,
      retry_delay: Duration::from_millis(1),
      toast_tx: None,
    }
  }

  fn fast_opts() -> FetchOptions {
    FetchOptions::default().with_retry_delay(Duration::from_millis(1))
  }

  #[tokio::test]
  async fn test_api_key_is_appended_to_every_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/trending/movie/week"))
      .and(query_param("api_key", "test-key"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
      .expect(1)
      .mount(&server)
      .await;

    let client = test_client(&server.uri());
    let items = client.trending_movies().await.unwrap();
    assert!(items.is_empty());
  }

  #[tokio::test]
  async fn test_retry_bound_exactly_n_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/discover/movie"))
      .respond_with(ResponseTemplate::new(500))
      .expect(3)
      .mount(&server)
      .await;

    let client = test_client(&server.uri());
    let result = client
      .fetch_json("discover/movie", &[("page", "1")], &fast_opts())
      .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("500"));
  }

  #[tokio::test]
  async fn test_retry_recovers_after_transient_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/movie/now_playing"))
      .respond_with(ResponseTemplate::new(503))
      .up_to_n_times(1)
      .expect(1)
      .mount(&server)
      .await;
    Mock::given(method("GET"))
      .and(path("/movie/now_playing"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
      .expect(1)
      .mount(&server)
      .await;

    let client = test_client(&server.uri());
    let payload = client
      .fetch_json("movie/now_playing", &[], &fast_opts())
      .await
      .unwrap();
    assert_eq!(payload, json!({"ok": true}));
  }

  #[tokio::test]
  async fn test_malformed_body_counts_as_failed_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/search/multi"))
      .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
      .expect(2)
      .mount(&server)
      .await;

    let client = test_client(&server.uri());
    let result = client
      .fetch_json("search/multi", &[], &fast_opts().with_retries(2))
      .await;
    assert!(result.is_err());
  }

  #[tokio::test(start_paused = true)]
  async fn test_backoff_is_linear_in_attempt_number() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/discover/tv"))
      .respond_with(ResponseTemplate::new(500))
      .expect(3)
      .mount(&server)
      .await;

    let client = test_client(&server.uri());
    let opts = FetchOptions::default().with_retry_delay(Duration::from_millis(1000));

    let started = Instant::now();
    let result = client.fetch_json("discover/tv", &[], &opts).await;
    assert!(result.is_err());

    // Waits of 1000ms and 2000ms between the three attempts
    assert!(started.elapsed() >= Duration::from_millis(3000));
  }

  #[tokio::test]
  async fn test_cache_short_circuit_two_calls_one_network_hit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/discover/movie"))
      .respond_with(
        ResponseTemplate::new(200).set_body_json(json!({"results": [], "page": 1})),
      )
      .expect(1)
      .mount(&server)
      .await;

    let client = test_client(&server.uri());
    let opts = FetchOptions::cached("m1", Duration::from_millis(300_000))
      .with_retry_delay(Duration::from_millis(1));

    let first = client
      .fetch_json("discover/movie", &[("page", "1")], &opts)
      .await
      .unwrap();
    let second = client
      .fetch_json("discover/movie", &[("page", "1")], &opts)
      .await
      .unwrap();
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn test_warm_cache_performs_zero_network_calls() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would 404 and fail the fetch

    let client = test_client(&server.uri());
    client.cache.lock().set(
      "warm".to_string(),
      json!({"cached": true}),
      Duration::from_secs(300),
    );

    let opts = FetchOptions::cached("warm", Duration::from_secs(300));
    let payload = client
      .fetch_json("discover/movie", &[], &opts)
      .await
      .unwrap();
    assert_eq!(payload, json!({"cached": true}));
  }

  #[tokio::test]
  async fn test_failed_calls_never_populate_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/discover/movie"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let client = test_client(&server.uri());
    let opts = FetchOptions::cached("k1", Duration::from_secs(300))
      .with_retries(2)
      .with_retry_delay(Duration::from_millis(1));

    let result = client.fetch_json("discover/movie", &[], &opts).await;
    assert!(result.is_err());
    assert!(client.cache.lock().get("k1").is_none());
  }

  #[tokio::test]
  async fn test_uncached_options_skip_the_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/search/multi"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
      .expect(2)
      .mount(&server)
      .await;

    let client = test_client(&server.uri());
    client.fetch_json("search/multi", &[], &fast_opts()).await.unwrap();
    client.fetch_json("search/multi", &[], &fast_opts()).await.unwrap();
    assert!(client.cache.lock().is_empty());
  }

  #[tokio::test]
  async fn test_failure_toast_goes_through_notifier() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/trending/movie/week"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = test_client(&server.uri()).with_notifier(tx);

    let result = client
      .fetch_json(
        "trending/movie/week",
        &[],
        &fast_opts().with_retries(2),
      )
      .await;
    assert!(result.is_err());

    let toast = rx.recv().await.unwrap();
    assert!(toast.contains("trending/movie/week"));
  }

  #[tokio::test]
  async fn test_silent_failure_sends_no_toast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/search/multi"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = test_client(&server.uri()).with_notifier(tx);

    let result = client.search_multi("dune").await;
    assert!(result.is_err());
    assert!(rx.try_recv().is_err());
  }

  #[tokio::test]
  async fn test_search_drops_person_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/search/multi"))
      .and(query_param("query", "tom"))
      .and(query_param("include_adult", "false"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "results": [
          {"id": 1, "title": "Tom's Movie", "media_type": "movie"},
          {"id": 2, "name": "Tom Cruise", "media_type": "person"},
          {"id": 3, "name": "Tom's Show", "media_type": "tv"}
        ]
      })))
      .mount(&server)
      .await;

    let client = test_client(&server.uri());
    let items = client.search_multi("tom").await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].media_type, MediaType::Movie);
    assert_eq!(items[1].media_type, MediaType::Tv);
  }
}
