//! Outbound response bodies.

use serde::{Deserialize, Serialize};

/// `GET /health` body.
#[derive(Debug, Serialize)]
pub struct HealthReply {
    pub status: &'static str,
}

impl HealthReply {
    pub fn ok() -> Self {
        Self { status: "OK" }
    }
}

/// `POST /chat` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
}

/// `POST /clues` success body — exactly five clues, hardest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CluesReply {
    pub clues: Vec<String>,
}

/// `POST /facts` success body — three to five facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactsReply {
    pub facts: Vec<String>,
}

/// Error body for every failure status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReply {
    pub error: String,
}

impl ErrorReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
