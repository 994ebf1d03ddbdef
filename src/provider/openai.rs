//! OpenAI-compatible chat-completions client.
//!
//! Speaks the `POST /v1/chat/completions` wire format, which several hosted
//! APIs implement. Only the non-streaming subset this relay needs is
//! modelled.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CompletionProvider, CompletionRequest};
use crate::types::Message;
use crate::{Result, SkvaderError};

/// Default base URL for the OpenAI API.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Client for an OpenAI-compatible chat-completions API.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenAiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock,
    /// or for OpenAI-compatible gateways).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into(),
        }
    }

    /// Check response status and map to the appropriate error.
    fn handle_response_errors(&self, response: &reqwest::Response) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        match status.as_u16() {
            401 => Err(SkvaderError::AuthenticationFailed),
            code => Err(SkvaderError::Provider {
                status: code,
                message: format!("chat completions request failed: {status}"),
            }),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response_format = request
            .json_output
            .then_some(ResponseFormat { kind: "json_object" });

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&ChatCompletionRequest {
                model: &request.model,
                temperature: request.temperature,
                messages: &request.messages,
                response_format,
                max_tokens: request.max_tokens,
            })
            .send()
            .await
            .map_err(|e| SkvaderError::Http(e.to_string()))?;

        self.handle_response_errors(&response)?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| SkvaderError::Http(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(SkvaderError::EmptyResponse)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
