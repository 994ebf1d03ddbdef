//! Builder for [`Gateway`].

use std::sync::Arc;

use super::Gateway;
use crate::cache::{CacheConfig, ClueCache};
use crate::provider::CompletionProvider;
use crate::{Result, SkvaderError};

/// Default provider model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Builder for [`Gateway`].
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use skvader::gateway::Gateway;
/// # use skvader::provider::OpenAiClient;
/// let gateway = Gateway::builder()
///     .provider(Arc::new(OpenAiClient::new("sk-your-key")))
///     .model("gpt-4o-mini")
///     .build()
///     .unwrap();
/// ```
pub struct GatewayBuilder {
    provider: Option<Arc<dyn CompletionProvider>>,
    model: String,
    cache: CacheConfig,
}

impl GatewayBuilder {
    pub(crate) fn new() -> Self {
        Self {
            provider: None,
            model: DEFAULT_MODEL.to_string(),
            cache: CacheConfig::default(),
        }
    }

    /// Set the Completion Provider.
    pub fn provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the provider model identifier (default: `gpt-4o-mini`).
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Configure the clue cache.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Build the gateway. Fails if no provider was configured.
    pub fn build(self) -> Result<Gateway> {
        let provider = self.provider.ok_or_else(|| {
            SkvaderError::Configuration("no completion provider configured".to_string())
        })?;
        Ok(Gateway::new(provider, ClueCache::new(&self.cache), self.model))
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
