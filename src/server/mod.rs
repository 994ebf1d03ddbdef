//! HTTP server mode.
//!
//! [`config`] loads the daemon configuration (TOML file plus environment
//! overrides); [`http`] is the axum transport that fronts the
//! [`Gateway`](crate::gateway::Gateway) with rate limiting, validation and
//! CORS.

pub mod config;
pub mod http;

pub use config::{Config, Secrets};
pub use http::{router, serve};
