//! Configuration loading for skvaderd.
//!
//! Configuration is loaded from TOML files with the following resolution
//! order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.skvader/config.toml` (user)
//! 3. `/etc/skvader/config.toml` (system)
//!
//! Unlike the config file, which is optional (built-in defaults apply when
//! none exists), the provider API key is mandatory and comes exclusively
//! from the environment. Environment overrides applied after file loading:
//!
//! - `PORT` — listening port
//! - `CORS_ORIGIN` — comma-separated allowed origins; unset means allow-all
//!   (acceptable only for non-production use)
//! - `OPENAI_API_KEY` — provider API key (required)

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;

use crate::{Result, SkvaderError};

/// Daemon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3000).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:3000".to_string()
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. Empty means allow-all.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Rate limiter knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Trailing window length in milliseconds (default: 60 000).
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    /// Maximum admitted requests per window (default: 10).
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_requests: default_max_requests(),
        }
    }
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_max_requests() -> usize {
    10
}

/// Clue cache knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Entry time-to-live in milliseconds (default: 3 600 000 / 1 hour).
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,
    /// Maximum number of cached entries (default: 10 000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> crate::cache::CacheConfig {
        crate::cache::CacheConfig::new()
            .max_entries(self.max_entries)
            .ttl(Duration::from_millis(self.ttl_ms))
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_ms: default_ttl_ms(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl_ms() -> u64 {
    3_600_000
}

fn default_max_entries() -> u64 {
    10_000
}

/// Completion Provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Model identifier (default: gpt-4o-mini).
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL override for OpenAI-compatible gateways.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Config {
    /// Load configuration from the standard locations and apply environment
    /// overrides. Built-in defaults are used when no config file exists, so
    /// the daemon can run from the environment alone.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit_path)? {
            Some(path) => {
                let content = fs::read_to_string(&path).map_err(|e| {
                    SkvaderError::Configuration(format!("Failed to read config file {path:?}: {e}"))
                })?;
                toml::from_str(&content).map_err(|e| {
                    SkvaderError::Configuration(format!(
                        "Failed to parse config file {path:?}: {e}"
                    ))
                })?
            }
            None => Config::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(SkvaderError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".skvader").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/skvader/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Apply `PORT` and `CORS_ORIGIN` overrides.
    fn apply_env(&mut self) -> Result<()> {
        if let Ok(port) = env::var("PORT") {
            let port: u16 = port.parse().map_err(|_| {
                SkvaderError::Configuration(format!("Invalid PORT value: {port}"))
            })?;
            let host = self
                .server
                .address
                .parse::<SocketAddr>()
                .map(|addr| addr.ip().to_string())
                .unwrap_or_else(|_| "0.0.0.0".to_string());
            self.server.address = format!("{host}:{port}");
        }

        if let Ok(origins) = env::var("CORS_ORIGIN") {
            self.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(())
    }
}

/// Secrets (provider API key). Environment-only; never read from the
/// config file.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub api_key: String,
}

impl Secrets {
    /// Load the provider API key from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            SkvaderError::Configuration(
                "OPENAI_API_KEY is not set; the relay cannot reach its provider".to_string(),
            )
        })?;
        if api_key.trim().is_empty() {
            return Err(SkvaderError::Configuration(
                "OPENAI_API_KEY is empty".to_string(),
            ));
        }
        Ok(Self { api_key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.address, "0.0.0.0:3000");
        assert_eq!(config.rate_limit.window_ms, 60_000);
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.cache.ttl_ms, 3_600_000);
        assert_eq!(config.cache.max_entries, 10_000);
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert!(config.cors.allowed_origins.is_empty());
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [server]
            address = "127.0.0.1:8080"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.address, "127.0.0.1:8080");
        // Defaults preserved
        assert_eq!(config.rate_limit.max_requests, 10);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "0.0.0.0:3000"

            [cors]
            allowed_origins = ["https://game.example.se"]

            [rate_limit]
            window_ms = 30000
            max_requests = 5

            [cache]
            ttl_ms = 600000
            max_entries = 500

            [provider]
            model = "gpt-4o"
            base_url = "https://llm.internal.example"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cors.allowed_origins, ["https://game.example.se"]);
        assert_eq!(config.rate_limit.window(), Duration::from_secs(30));
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.cache.max_entries, 500);
        assert_eq!(config.provider.model, "gpt-4o");
        assert_eq!(
            config.provider.base_url.as_deref(),
            Some("https://llm.internal.example")
        );
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn cache_settings_convert_to_cache_config() {
        let settings = CacheSettings {
            ttl_ms: 1_000,
            max_entries: 7,
        };
        let config = settings.to_cache_config();
        assert_eq!(config.ttl, Duration::from_secs(1));
        assert_eq!(config.max_entries, 7);
    }
}
