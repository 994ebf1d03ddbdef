//! Per-client sliding-window rate limiting.
//!
//! [`RateLimiter`] maintains one bucket of admission timestamps per client
//! identifier and admits a request only while the trailing window holds
//! fewer than the configured maximum. It runs ahead of validation for every
//! route, so an over-limit caller never reaches the validator, the cache or
//! the provider.
//!
//! Buckets are pruned lazily on access, which bounds each bucket at the
//! per-window maximum. [`RateLimiter::evict_idle`] sweeps away buckets
//! whose newest timestamp has left the window; the server runs that sweep
//! on an interval of one window length, so the map stays bounded by the
//! set of recently active clients.
//!
//! Time is read through [`tokio::time::Instant`], which follows the paused
//! test clock — tests drive the window with `tokio::time::advance` instead
//! of sleeping.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::telemetry;
use crate::{Result, SkvaderError};

/// Default trailing window length: one minute.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Default maximum admitted requests per window.
pub const DEFAULT_MAX_REQUESTS: usize = 10;

/// Sliding-window rate limiter keyed by client identifier.
pub struct RateLimiter {
    window: Duration,
    max_requests: usize,
    buckets: RwLock<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    /// Create a limiter with the given window length and per-window maximum.
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            buckets: RwLock::new(HashMap::new()),
        }
    }

    /// Window length this limiter was configured with.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Check whether a request from `client` is admitted right now.
    ///
    /// Admission appends the current timestamp to the client's bucket;
    /// rejection leaves the bucket unchanged apart from pruning expired
    /// entries. A client with no bucket starts from an empty window.
    pub async fn check(&self, client: &str) -> Result<()> {
        let now = Instant::now();
        let mut buckets = self.buckets.write().await;

        let bucket = buckets.entry(client.to_string()).or_default();
        Self::prune(bucket, now, self.window);

        if bucket.len() >= self.max_requests {
            metrics::counter!(telemetry::RATE_LIMITED_TOTAL).increment(1);
            return Err(SkvaderError::RateLimitExceeded);
        }

        bucket.push_back(now);
        Ok(())
    }

    /// Remove buckets whose newest timestamp has left the window.
    ///
    /// Returns the number of buckets dropped.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut buckets = self.buckets.write().await;
        let before = buckets.len();
        buckets.retain(|_, bucket| {
            bucket
                .back()
                .is_some_and(|newest| now.duration_since(*newest) < self.window)
        });
        before - buckets.len()
    }

    /// Number of clients currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.buckets.read().await.len()
    }

    fn prune(bucket: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(oldest) = bucket.front() {
            if now.duration_since(*oldest) >= window {
                bucket.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_MAX_REQUESTS)
    }
}
