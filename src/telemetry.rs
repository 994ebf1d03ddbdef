//! Telemetry metric name constants.
//!
//! Centralised metric names for skvader operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `skvader_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `endpoint` — route handling the request ("chat", "clues", "facts")
//! - `status` — outcome: "ok" or "error"

/// Total requests admitted past the rate limiter.
///
/// Labels: `endpoint`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "skvader_requests_total";

/// Total requests rejected by the rate limiter.
pub const RATE_LIMITED_TOTAL: &str = "skvader_rate_limited_total";

/// Total clue cache hits.
pub const CACHE_HITS_TOTAL: &str = "skvader_cache_hits_total";

/// Total clue cache misses.
pub const CACHE_MISSES_TOTAL: &str = "skvader_cache_misses_total";

/// Total failed provider calls (transport, API, or response shape).
///
/// Labels: `endpoint`.
pub const PROVIDER_FAILURES_TOTAL: &str = "skvader_provider_failures_total";
