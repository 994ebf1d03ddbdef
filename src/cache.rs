//! Clue response cache.
//!
//! [`ClueCache`] deduplicates identical clue-generation requests for the
//! lifetime of a TTL (default one hour). Only `/clues` is cache-eligible:
//! `/facts` is generated fresh on every call and `/chat` is a passthrough.
//! That asymmetry is part of the endpoint contract.
//!
//! Entries are keyed on the exact (normalized name, secondary identifier,
//! language) triple — no partial or fuzzy matching. Expiry is lazy: moka
//! guarantees a read after the TTL has elapsed misses, and an insert to an
//! existing key overwrites the value and restamps its expiry.
//!
//! The cache is bounded by both TTL and a maximum entry count, so sustained
//! unique traffic cannot grow it without limit in a long-running process.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::telemetry;
use crate::types::{GenerationRequest, Language};

/// Configuration for the clue cache.
///
/// ```rust
/// # use skvader::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(1_000)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Deterministic identity of one cacheable clue request.
///
/// Two logically identical requests must always produce the same key, so
/// the animal name is normalized (trimmed, lowercased) and a missing
/// secondary identifier collapses to the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    animal: String,
    scientific: String,
    language: Language,
}

impl CacheKey {
    pub fn new(request: &GenerationRequest) -> Self {
        Self {
            animal: request.animal_name.trim().to_lowercase(),
            scientific: request
                .scientific_name
                .as_deref()
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_default(),
            language: request.language,
        }
    }
}

/// In-memory TTL cache for generated clue sets.
pub struct ClueCache {
    cache: Cache<CacheKey, Arc<Vec<String>>>,
}

impl ClueCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { cache }
    }

    /// Look up cached clues for a request.
    ///
    /// Returns `None` on miss or after the TTL has elapsed. Emits cache
    /// hit/miss metrics.
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<Vec<String>>> {
        match self.cache.get(key).await {
            Some(clues) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(clues)
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Insert clues, overwriting any entry for the same key and restamping
    /// its expiry.
    pub async fn insert(&self, key: CacheKey, clues: Vec<String>) -> Arc<Vec<String>> {
        let clues = Arc::new(clues);
        self.cache.insert(key, Arc::clone(&clues)).await;
        clues
    }
}

impl Default for ClueCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
