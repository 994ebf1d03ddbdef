//! Generation orchestration.
//!
//! [`Gateway`] composes the clue cache and the Completion Provider into the
//! three endpoint behaviors. Per request the flow is: consult the cache
//! (clues only), build the deterministic instruction set, call the
//! provider with a strict-JSON directive, parse out the expected field, and
//! cache the result (clues only). The rate limiter and validator run in the
//! HTTP layer before any of this.
//!
//! Failure semantics: a provider or parse failure is logged with the
//! endpoint and a truncated input, surfaces as a generic 500, is never
//! retried, and never writes to the cache.

mod builder;

pub use builder::GatewayBuilder;

use std::sync::Arc;

use serde::Deserialize;
use tracing::error;

use crate::cache::{CacheKey, ClueCache};
use crate::provider::{CompletionProvider, CompletionRequest};
use crate::telemetry;
use crate::types::{ChatReply, CluesReply, FactsReply, GenerationRequest, Message};
use crate::{Result, SkvaderError, prompt};

/// Orchestrates validation output, the clue cache and the Completion
/// Provider into endpoint responses.
pub struct Gateway {
    provider: Arc<dyn CompletionProvider>,
    cache: ClueCache,
    model: String,
}

impl Gateway {
    /// Start building a gateway.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    pub(crate) fn new(provider: Arc<dyn CompletionProvider>, cache: ClueCache, model: String) -> Self {
        Self {
            provider,
            cache,
            model,
        }
    }

    /// Generic chat passthrough: messages go to the provider verbatim and
    /// the raw reply text comes back. Never cached.
    pub async fn chat(&self, messages: Vec<Message>) -> Result<ChatReply> {
        let input = messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();

        let text = self
            .complete("chat", &input, CompletionRequest {
                model: self.model.clone(),
                temperature: prompt::CHAT_TEMPERATURE,
                messages,
                json_output: false,
                max_tokens: None,
            })
            .await?;

        Ok(ChatReply { text })
    }

    /// Generate five clues, hardest to easiest, without naming the animal.
    ///
    /// Cache-checked by (subject, secondary identifier, language); two
    /// identical requests within the TTL cost one provider call.
    pub async fn clues(&self, request: &GenerationRequest) -> Result<CluesReply> {
        let key = CacheKey::new(request);
        if let Some(clues) = self.cache.get(&key).await {
            return Ok(CluesReply {
                clues: clues.to_vec(),
            });
        }

        let content = self
            .complete("clues", &request.animal_name, CompletionRequest {
                model: self.model.clone(),
                temperature: prompt::CLUES_TEMPERATURE,
                messages: prompt::clue_messages(request),
                json_output: true,
                max_tokens: Some(prompt::CLUES_MAX_TOKENS),
            })
            .await?;

        let clues = self.parse_clues(&request.animal_name, &content)?;
        let clues = self.cache.insert(key, clues).await;

        Ok(CluesReply {
            clues: clues.to_vec(),
        })
    }

    /// Generate three to five facts about the animal, name allowed.
    /// Generated fresh on every call — never cached.
    pub async fn facts(&self, request: &GenerationRequest) -> Result<FactsReply> {
        let content = self
            .complete("facts", &request.animal_name, CompletionRequest {
                model: self.model.clone(),
                temperature: prompt::FACTS_TEMPERATURE,
                messages: prompt::fact_messages(request),
                json_output: true,
                max_tokens: Some(prompt::FACTS_MAX_TOKENS),
            })
            .await?;

        let facts = self.parse_facts(&request.animal_name, &content)?;
        Ok(FactsReply { facts })
    }

    /// Call the provider, logging and counting failures per endpoint.
    async fn complete(
        &self,
        endpoint: &'static str,
        input: &str,
        request: CompletionRequest,
    ) -> Result<String> {
        match self.provider.complete(request).await {
            Ok(content) => Ok(content),
            Err(err) => {
                metrics::counter!(telemetry::PROVIDER_FAILURES_TOTAL, "endpoint" => endpoint)
                    .increment(1);
                error!(endpoint, input = truncate(input), %err, "provider call failed");
                Err(err)
            }
        }
    }

    fn parse_clues(&self, input: &str, content: &str) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct CluesPayload {
            clues: Vec<String>,
        }

        let err = match serde_json::from_str::<CluesPayload>(content) {
            Ok(payload) if payload.clues.len() == 5 => return Ok(payload.clues),
            Ok(payload) => SkvaderError::ResponseShape(format!(
                "expected 5 clues, got {}",
                payload.clues.len()
            )),
            Err(err) => SkvaderError::ResponseShape(format!("clues: {err}")),
        };

        metrics::counter!(telemetry::PROVIDER_FAILURES_TOTAL, "endpoint" => "clues").increment(1);
        error!(endpoint = "clues", input = truncate(input), %err, "unusable provider output");
        Err(err)
    }

    fn parse_facts(&self, input: &str, content: &str) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct FactsPayload {
            facts: Vec<String>,
        }

        let err = match serde_json::from_str::<FactsPayload>(content) {
            Ok(payload) if (3..=5).contains(&payload.facts.len()) => return Ok(payload.facts),
            Ok(payload) => SkvaderError::ResponseShape(format!(
                "expected 3-5 facts, got {}",
                payload.facts.len()
            )),
            Err(err) => SkvaderError::ResponseShape(format!("facts: {err}")),
        };

        metrics::counter!(telemetry::PROVIDER_FAILURES_TOTAL, "endpoint" => "facts").increment(1);
        error!(endpoint = "facts", input = truncate(input), %err, "unusable provider output");
        Err(err)
    }
}

/// Shorten log context so a long payload cannot flood the log.
fn truncate(input: &str) -> String {
    const MAX: usize = 80;
    if input.chars().count() <= MAX {
        input.to_string()
    } else {
        let head: String = input.chars().take(MAX).collect();
        format!("{head}…")
    }
}
