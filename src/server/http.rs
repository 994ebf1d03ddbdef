//! Axum transport for the relay.
//!
//! Route table:
//!
//! | Method & path | Handler |
//! |---|---|
//! | `GET /health` | liveness probe |
//! | `POST /chat` | generic passthrough |
//! | `POST /clues` | cached clue generation |
//! | `POST /facts` | uncached fact generation |
//!
//! The rate-limit middleware runs ahead of validation on every route; an
//! over-limit caller gets `429 {"error":"Rate limit exceeded"}` and never
//! reaches a handler. Server-side failures surface as a 500 with a generic
//! per-endpoint message — diagnosis detail stays in the logs.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Json, Request, State};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::gateway::Gateway;
use crate::limiter::RateLimiter;
use crate::server::config::{Config, CorsConfig};
use crate::telemetry;
use crate::types::{
    ErrorReply, HealthReply, validate_chat, validate_generation,
};
use crate::{Result, SkvaderError};

/// Generic 500 body for `/chat`.
const CHAT_FAILURE: &str = "OpenAI call failed";
/// Generic 500 body for `/clues`.
const CLUES_FAILURE: &str = "Failed to generate clues";
/// Generic 500 body for `/facts`.
const FACTS_FAILURE: &str = "Failed to generate facts";

#[derive(Clone)]
struct AppState {
    gateway: Arc<Gateway>,
    limiter: Arc<RateLimiter>,
}

/// Build the application router.
pub fn router(gateway: Arc<Gateway>, limiter: Arc<RateLimiter>, cors: &CorsConfig) -> Router {
    let state = AppState { gateway, limiter };

    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .route("/clues", post(clues_handler))
        .route("/facts", post(facts_handler))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
///
/// Spawns the idle-bucket sweep next to the listener: one pass per window
/// length, so rate-limit state stays bounded by recently active clients.
pub async fn serve(
    config: &Config,
    gateway: Arc<Gateway>,
    limiter: Arc<RateLimiter>,
) -> Result<()> {
    let app = router(gateway, Arc::clone(&limiter), &config.cors);

    let addr: SocketAddr = config.server.address.parse().map_err(|e| {
        SkvaderError::Configuration(format!("Invalid address {}: {e}", config.server.address))
    })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| SkvaderError::Configuration(format!("Failed to bind {addr}: {e}")))?;

    tokio::spawn({
        let limiter = Arc::clone(&limiter);
        async move {
            let period = limiter.window().max(std::time::Duration::from_secs(1));
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                let evicted = limiter.evict_idle().await;
                if evicted > 0 {
                    debug!(evicted, "evicted idle rate-limit buckets");
                }
            }
        }
    });

    info!(%addr, "skvader listening");
    info!("  GET  /health - Health check");
    info!("  POST /chat   - Generic chat endpoint");
    info!("  POST /clues  - Animal clue generation");
    info!("  POST /facts  - Animal fact generation");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| SkvaderError::Http(e.to_string()))
}

/// Admission control ahead of every route.
async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let client = client_identifier(&request);
    match state.limiter.check(&client).await {
        Ok(()) => next.run(request).await,
        Err(_) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorReply::new("Rate limit exceeded")),
        )
            .into_response(),
    }
}

/// Best-effort client identifier for rate limiting.
///
/// First entry of `x-forwarded-for`, else the transport peer address, else
/// the sentinel "unknown". Not an authenticated identity.
fn client_identifier(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty());

    if let Some(first) = forwarded {
        return first.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let methods = [Method::GET, Method::POST];

    if config.allowed_origins.is_empty() {
        warn!("CORS_ORIGIN not set; allowing all origins (non-production only)");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any)
}

async fn health_handler() -> Json<HealthReply> {
    Json(HealthReply::ok())
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Option<Json<serde_json::Value>>,
) -> Response {
    let result = match validate_chat(unwrap_body(payload)) {
        Ok(messages) => state.gateway.chat(messages).await,
        Err(err) => Err(err),
    };
    respond("chat", CHAT_FAILURE, result)
}

async fn clues_handler(
    State(state): State<AppState>,
    payload: Option<Json<serde_json::Value>>,
) -> Response {
    let result = match validate_generation(unwrap_body(payload)) {
        Ok(request) => state.gateway.clues(&request).await,
        Err(err) => Err(err),
    };
    respond("clues", CLUES_FAILURE, result)
}

async fn facts_handler(
    State(state): State<AppState>,
    payload: Option<Json<serde_json::Value>>,
) -> Response {
    let result = match validate_generation(unwrap_body(payload)) {
        Ok(request) => state.gateway.facts(&request).await,
        Err(err) => Err(err),
    };
    respond("facts", FACTS_FAILURE, result)
}

/// A missing or unparseable body validates the same way as an empty one.
fn unwrap_body(payload: Option<Json<serde_json::Value>>) -> serde_json::Value {
    payload
        .map(|Json(value)| value)
        .unwrap_or(serde_json::Value::Null)
}

/// Map an operation result onto the wire contract.
fn respond<T: Serialize>(
    endpoint: &'static str,
    failure_message: &'static str,
    result: Result<T>,
) -> Response {
    match result {
        Ok(body) => {
            metrics::counter!(telemetry::REQUESTS_TOTAL, "endpoint" => endpoint, "status" => "ok")
                .increment(1);
            Json(body).into_response()
        }
        Err(err) => {
            metrics::counter!(
                telemetry::REQUESTS_TOTAL,
                "endpoint" => endpoint,
                "status" => "error"
            )
            .increment(1);
            match err {
                SkvaderError::Validation(code) => {
                    (StatusCode::BAD_REQUEST, Json(ErrorReply::new(code))).into_response()
                }
                SkvaderError::RateLimitExceeded => (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ErrorReply::new("Rate limit exceeded")),
                )
                    .into_response(),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorReply::new(failure_message)),
                )
                    .into_response(),
            }
        }
    }
}
