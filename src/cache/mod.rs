//! In-memory caching layer for API responses.
//!
//! This module provides a small TTL cache that:
//! - Maps a request key to a JSON payload with a per-entry freshness window
//! - Evicts lazily, on lookup, once an entry has outlived its TTL
//! - Bounds total size, dropping the least-recently-used entry on overflow

mod store;

pub use store::TtlCache;
