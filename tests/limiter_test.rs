//! Tests for [`RateLimiter`] — per-client sliding-window admission.

use std::time::Duration;

use skvader::RateLimiter;

const WINDOW: Duration = Duration::from_secs(60);

// =========================================================================
// Window semantics
// =========================================================================

#[tokio::test(start_paused = true)]
async fn max_plus_one_requests_rejects_exactly_the_last() {
    let limiter = RateLimiter::new(WINDOW, 10);

    let mut outcomes = Vec::new();
    for _ in 0..11 {
        outcomes.push(limiter.check("198.51.100.7").await.is_ok());
    }

    assert_eq!(outcomes.iter().filter(|ok| !**ok).count(), 1);
    assert!(!outcomes[10], "only the 11th request should be rejected");
}

#[tokio::test(start_paused = true)]
async fn waiting_past_the_window_resets_admission() {
    let limiter = RateLimiter::new(WINDOW, 10);

    for _ in 0..10 {
        limiter.check("198.51.100.7").await.unwrap();
    }
    assert!(limiter.check("198.51.100.7").await.is_err());

    tokio::time::advance(WINDOW + Duration::from_millis(1)).await;
    assert!(limiter.check("198.51.100.7").await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn window_slides_rather_than_resets() {
    let limiter = RateLimiter::new(WINDOW, 2);

    limiter.check("a").await.unwrap();
    tokio::time::advance(Duration::from_secs(40)).await;
    limiter.check("a").await.unwrap();
    assert!(limiter.check("a").await.is_err());

    // First admission leaves the window at t=60s; the second is still in.
    tokio::time::advance(Duration::from_secs(21)).await;
    assert!(limiter.check("a").await.is_ok());
    assert!(limiter.check("a").await.is_err());
}

// =========================================================================
// Bucket lifecycle
// =========================================================================

#[tokio::test(start_paused = true)]
async fn unknown_client_starts_from_an_empty_window() {
    let limiter = RateLimiter::new(WINDOW, 1);
    assert!(limiter.check("never-seen-before").await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn idle_buckets_are_swept() {
    let limiter = RateLimiter::new(WINDOW, 10);

    limiter.check("one").await.unwrap();
    limiter.check("two").await.unwrap();
    assert_eq!(limiter.tracked_clients().await, 2);

    tokio::time::advance(WINDOW + Duration::from_secs(1)).await;
    assert_eq!(limiter.evict_idle().await, 2);
    assert_eq!(limiter.tracked_clients().await, 0);
}
