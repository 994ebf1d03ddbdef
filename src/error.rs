//! Skvader error types

/// Skvader error types
#[derive(Debug, thiserror::Error)]
pub enum SkvaderError {
    // Admission errors
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Request payload failed shape validation.
    ///
    /// The message is a short machine-checkable code (e.g. `"animalName
    /// required"`) and is returned to the caller verbatim in a 400 body.
    #[error("{0}")]
    Validation(&'static str),

    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("authentication with provider failed")]
    AuthenticationFailed,

    /// Provider replied, but the content is not the JSON shape we asked for
    /// (unparseable, missing field, or wrong element count).
    #[error("unexpected response shape: {0}")]
    ResponseShape(String),

    #[error("empty response from provider")]
    EmptyResponse,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for skvader operations
pub type Result<T> = std::result::Result<T, SkvaderError>;
