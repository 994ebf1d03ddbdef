//! skvaderd — skvader daemon.
//!
//! Serves the [`Gateway`](skvader::Gateway) over HTTP for the guessing-game
//! client.

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use skvader::gateway::Gateway;
use skvader::limiter::RateLimiter;
use skvader::provider::OpenAiClient;
use skvader::server::config::{Config, Secrets};
use skvader::server::http;

/// Skvader daemon — clue-relay gateway for a wildlife guessing game.
#[derive(Parser)]
#[command(name = "skvaderd")]
#[command(version = skvader::PKG_VERSION)]
#[command(about = "Skvader clue-relay daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    // Load configuration and the provider key
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::from_env()?;

    let client = match config.provider.base_url.as_deref() {
        Some(base_url) => OpenAiClient::with_base_url(secrets.api_key, base_url),
        None => OpenAiClient::new(secrets.api_key),
    };

    let gateway = Gateway::builder()
        .provider(Arc::new(client))
        .model(config.provider.model.clone())
        .cache(config.cache.to_cache_config())
        .build()?;

    let limiter = RateLimiter::new(
        config.rate_limit.window(),
        config.rate_limit.max_requests,
    );

    info!(version = skvader::version_string(), "skvaderd starting");

    http::serve(&config, Arc::new(gateway), Arc::new(limiter)).await?;

    Ok(())
}
