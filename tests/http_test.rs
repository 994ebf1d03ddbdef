//! Tests for the HTTP surface: status mapping, rate limiting ahead of
//! validation, and the end-to-end clue scenario.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use skvader::gateway::Gateway;
use skvader::limiter::RateLimiter;
use skvader::provider::{CompletionProvider, CompletionRequest};
use skvader::server::config::CorsConfig;
use skvader::server::http::router;
use skvader::{Result, SkvaderError};

/// Provider stub returning one canned body, counting invocations.
struct StubProvider {
    calls: AtomicUsize,
    reply: std::result::Result<String, u16>,
}

impl StubProvider {
    fn ok(content: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply: Ok(content.to_string()),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply: Err(status),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(content) => Ok(content.clone()),
            Err(status) => Err(SkvaderError::Provider {
                status: *status,
                message: "stubbed failure".to_string(),
            }),
        }
    }
}

fn app(provider: Arc<StubProvider>) -> Router {
    app_with_limit(provider, 100)
}

fn app_with_limit(provider: Arc<StubProvider>, max_requests: usize) -> Router {
    let gateway = Gateway::builder()
        .provider(provider)
        .build()
        .expect("provider is set");
    let limiter = RateLimiter::new(Duration::from_secs(60), max_requests);
    router(
        Arc::new(gateway),
        Arc::new(limiter),
        &CorsConfig::default(),
    )
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-forwarded-for", "203.0.113.9")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =========================================================================
// Health
// =========================================================================

#[tokio::test]
async fn health_reports_ok() {
    let app = app(StubProvider::ok(""));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "OK"}));
}

// =========================================================================
// Validation failures
// =========================================================================

#[tokio::test]
async fn clues_without_animal_name_is_400_and_skips_the_provider() {
    let provider = StubProvider::ok(r#"{"clues":["a","b","c","d","e"]}"#);
    let app = app(Arc::clone(&provider));

    for body in [json!({}), json!({"animalName": ""})] {
        let response = app.clone().oneshot(post("/clues", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "animalName required"})
        );
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn chat_without_messages_is_400() {
    let provider = StubProvider::ok("hello");
    let app = app(Arc::clone(&provider));

    let response = app
        .oneshot(post("/chat", json!({"message": "wrong field"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "messages required"})
    );
    assert_eq!(provider.calls(), 0);
}

// =========================================================================
// Rate limiting
// =========================================================================

#[tokio::test]
async fn over_limit_client_gets_429_on_every_route() {
    let app = app_with_limit(StubProvider::ok(""), 3);

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(post("/clues", json!({"animalName": "lo"})))
            .await
            .unwrap();
        assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    // Rate limiting applies ahead of validation, health checks included.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-forwarded-for", "203.0.113.9")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Rate limit exceeded"})
    );
}

#[tokio::test]
async fn rate_limit_buckets_are_per_client() {
    let app = app_with_limit(StubProvider::ok(""), 1);

    let first = app
        .clone()
        .oneshot(post("/clues", json!({"animalName": "lo"})))
        .await
        .unwrap();
    assert_ne!(first.status(), StatusCode::TOO_MANY_REQUESTS);

    let mut other = post("/clues", json!({"animalName": "lo"}));
    other
        .headers_mut()
        .insert("x-forwarded-for", "198.51.100.3".parse().unwrap());
    let response = app.clone().oneshot(other).await.unwrap();
    assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

// =========================================================================
// Generation failures
// =========================================================================

#[tokio::test]
async fn provider_failure_is_a_generic_500() {
    let app = app(StubProvider::failing(502));

    let response = app
        .oneshot(post("/clues", json!({"animalName": "lo"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Failed to generate clues"})
    );
}

#[tokio::test]
async fn unparseable_provider_output_is_a_generic_500() {
    let app = app(StubProvider::ok("not json at all"));

    let response = app
        .oneshot(post("/facts", json!({"animalName": "lo"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Failed to generate facts"})
    );
}

// =========================================================================
// End-to-end clue scenario
// =========================================================================

#[tokio::test]
async fn clue_roundtrip_caches_the_second_call() {
    let provider = StubProvider::ok(r#"{"clues":["a","b","c","d","e"]}"#);
    let app = app(Arc::clone(&provider));

    let body = json!({"animalName": "lo", "isEnglish": false});

    let first = app.clone().oneshot(post("/clues", body.clone())).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(
        body_json(first).await,
        json!({"clues": ["a", "b", "c", "d", "e"]})
    );

    let second = app.clone().oneshot(post("/clues", body)).await.unwrap();
    assert_eq!(
        body_json(second).await,
        json!({"clues": ["a", "b", "c", "d", "e"]})
    );
    assert_eq!(provider.calls(), 1, "second call must be served from cache");
}

#[tokio::test]
async fn facts_roundtrip_never_caches() {
    let provider = StubProvider::ok(r#"{"facts":["f1","f2","f3"]}"#);
    let app = app(Arc::clone(&provider));

    let body = json!({"animalName": "lo"});
    for _ in 0..2 {
        let response = app.clone().oneshot(post("/facts", body.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"facts": ["f1", "f2", "f3"]})
        );
    }
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn chat_returns_raw_text() {
    let provider = StubProvider::ok("Hej!");
    let app = app(Arc::clone(&provider));

    let response = app
        .oneshot(post(
            "/chat",
            json!({"messages": [{"role": "user", "content": "hej"}]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"text": "Hej!"}));
}
