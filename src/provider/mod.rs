//! Completion Provider seam.
//!
//! Everything this system knows about text generation lives behind
//! [`CompletionProvider`]: an opaque, possibly-failing, possibly-slow
//! collaborator that takes role-tagged messages and returns generated text.
//! The production implementation is [`OpenAiClient`]; tests substitute
//! stubs to control provider output and count invocations.

mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;

use crate::Result;
use crate::types::Message;

/// One request to the Completion Provider.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Provider model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Ordered conversation to complete.
    pub messages: Vec<Message>,
    /// Constrain output to parseable JSON (`response_format: json_object`).
    pub json_output: bool,
    /// Maximum output size in tokens, if capped.
    pub max_tokens: Option<u32>,
}

/// The external large-language-model API this system delegates all text
/// generation to.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion and return the generated text.
    ///
    /// When `json_output` was requested the text is expected (but not
    /// guaranteed) to be parseable JSON — the caller owns shape checking.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
