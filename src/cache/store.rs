//! TTL cache storage backing the fetch orchestrator.

use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Default capacity when the config doesn't override it.
pub const DEFAULT_MAX_ENTRIES: usize = 256;

struct CacheEntry {
  payload: Value,
  stored_at: Instant,
  ttl: Duration,
  /// Last lookup or insert, used for LRU eviction on overflow.
  last_used: Instant,
}

impl CacheEntry {
  fn is_expired(&self, now: Instant) -> bool {
    now.duration_since(self.stored_at) > self.ttl
  }
}

/// In-memory key/value cache with per-entry TTL.
///
/// Eviction is lazy: an expired entry is removed the next time it is looked
/// up, never by a background sweep. The cache is small and process-local, so
/// a timer sweep would buy nothing.
///
/// Capacity is bounded; inserting into a full cache drops the
/// least-recently-used entry.
pub struct TtlCache {
  entries: HashMap<String, CacheEntry>,
  max_entries: usize,
}

impl TtlCache {
  pub fn new(max_entries: usize) -> Self {
    Self {
      entries: HashMap::new(),
      max_entries: max_entries.max(1),
    }
  }

  /// Look up a payload. Returns the stored value only while it is fresh;
  /// an expired entry is removed and the lookup reports a miss.
  pub fn get(&mut self, key: &str) -> Option<Value> {
    let now = Instant::now();

    let expired = match self.entries.get(key) {
      Some(entry) => entry.is_expired(now),
      None => return None,
    };

    if expired {
      self.entries.remove(key);
      return None;
    }

    let entry = self.entries.get_mut(key)?;
    entry.last_used = now;
    Some(entry.payload.clone())
  }

  /// Store or overwrite a payload with `stored_at = now`.
  pub fn set(&mut self, key: String, payload: Value, ttl: Duration) {
    let now = Instant::now();

    if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
      self.evict_lru();
    }

    self.entries.insert(
      key,
      CacheEntry {
        payload,
        stored_at: now,
        ttl,
        last_used: now,
      },
    );
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Drop the entry with the oldest `last_used`. Linear scan; the cache is
  /// capped at a few hundred entries.
  fn evict_lru(&mut self) {
    let oldest = self
      .entries
      .iter()
      .min_by_key(|(_, entry)| entry.last_used)
      .map(|(key, _)| key.clone());

    if let Some(key) = oldest {
      self.entries.remove(&key);
    }
  }
}

impl Default for TtlCache {
  fn default() -> Self {
    Self::new(DEFAULT_MAX_ENTRIES)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[tokio::test(start_paused = true)]
  async fn test_get_within_ttl_returns_payload() {
    let mut cache = TtlCache::default();
    cache.set("k".into(), json!({"page": 1}), Duration::from_secs(300));

    tokio::time::advance(Duration::from_secs(299)).await;
    assert_eq!(cache.get("k"), Some(json!({"page": 1})));
  }

  #[tokio::test(start_paused = true)]
  async fn test_get_after_ttl_removes_entry() {
    let mut cache = TtlCache::default();
    cache.set("k".into(), json!([1, 2, 3]), Duration::from_secs(60));

    tokio::time::advance(Duration::from_secs(61)).await;
    assert_eq!(cache.get("k"), None);
    // Expired entries are gone, not just hidden
    assert!(cache.is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn test_set_overwrites_and_refreshes() {
    let mut cache = TtlCache::default();
    cache.set("k".into(), json!("old"), Duration::from_secs(10));

    tokio::time::advance(Duration::from_secs(8)).await;
    cache.set("k".into(), json!("new"), Duration::from_secs(10));

    tokio::time::advance(Duration::from_secs(8)).await;
    assert_eq!(cache.get("k"), Some(json!("new")));
  }

  #[tokio::test(start_paused = true)]
  async fn test_zero_ttl_expires_immediately() {
    let mut cache = TtlCache::default();
    cache.set("k".into(), json!(42), Duration::ZERO);

    tokio::time::advance(Duration::from_millis(1)).await;
    assert_eq!(cache.get("k"), None);
  }

  #[tokio::test(start_paused = true)]
  async fn test_overflow_evicts_least_recently_used() {
    let mut cache = TtlCache::new(2);
    cache.set("a".into(), json!("a"), Duration::from_secs(60));
    tokio::time::advance(Duration::from_secs(1)).await;
    cache.set("b".into(), json!("b"), Duration::from_secs(60));
    tokio::time::advance(Duration::from_secs(1)).await;

    // Touch "a" so "b" becomes the LRU entry
    assert!(cache.get("a").is_some());
    tokio::time::advance(Duration::from_secs(1)).await;

    cache.set("c".into(), json!("c"), Duration::from_secs(60));
    assert_eq!(cache.len(), 2);
    assert!(cache.get("a").is_some());
    assert!(cache.get("b").is_none());
    assert!(cache.get("c").is_some());
  }

  #[tokio::test(start_paused = true)]
  async fn test_overwrite_does_not_evict() {
    let mut cache = TtlCache::new(2);
    cache.set("a".into(), json!(1), Duration::from_secs(60));
    cache.set("b".into(), json!(2), Duration::from_secs(60));
    cache.set("a".into(), json!(3), Duration::from_secs(60));

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("a"), Some(json!(3)));
    assert_eq!(cache.get("b"), Some(json!(2)));
  }
}
