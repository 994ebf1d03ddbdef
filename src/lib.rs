//! Skvader - clue-relay gateway for a wildlife guessing game
//!
//! This crate is a small HTTP relay that forwards structured prompts to an
//! OpenAI-compatible chat-completions API and reshapes the replies into
//! fixed JSON contracts for a guessing-game client. It owns request
//! validation, per-client rate limiting, short-lived clue caching and
//! prompt construction; it does not manage users, persist game state or
//! implement game logic.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use skvader::gateway::Gateway;
//! use skvader::provider::OpenAiClient;
//! use skvader::types::{GenerationRequest, Language};
//!
//! #[tokio::main]
//! async fn main() -> skvader::Result<()> {
//!     let gateway = Gateway::builder()
//!         .provider(Arc::new(OpenAiClient::new("sk-your-key")))
//!         .build()?;
//!
//!     let reply = gateway
//!         .clues(&GenerationRequest {
//!             animal_name: "lo".into(),
//!             scientific_name: Some("Lynx lynx".into()),
//!             description: None,
//!             language: Language::Swedish,
//!         })
//!         .await?;
//!
//!     for clue in &reply.clues {
//!         println!("{clue}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod gateway;
pub mod limiter;
pub mod prompt;
pub mod provider;
pub mod server;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use error::{Result, SkvaderError};
pub use gateway::{Gateway, GatewayBuilder};
pub use limiter::RateLimiter;
pub use provider::{CompletionProvider, CompletionRequest, OpenAiClient};
pub use version::{PKG_VERSION, version_string};
