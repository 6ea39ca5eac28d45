mod openrouter;

pub use openrouter::OpenRouterClient;

use crate::error::{GameError, GameResult};
use async_trait::async_trait;

/// Model used when no override is configured.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b:nitro";

/// Fixed sampling temperature for all content generation.
pub const TEMPERATURE: f32 = 1.0;

/// The remote text generator backing all content supply.
///
/// One synchronous-shaped async request per batch: system and user prompt in,
/// free-form text out. Implementations may fail on network, auth or rate
/// limits; callers decide what a failure means for their buffer.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> GameResult<String>;

    /// Name of this generator backend.
    fn name(&self) -> &str;
}

/// Configuration for the generator client.
///
/// An explicit object handed to the client at construction, so two sessions
/// with different credentials or models can coexist. No ambient global.
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    /// Bearer credential for the chat-completions endpoint.
    pub api_key: Option<String>,
    /// Model override; `None` falls back to [`DEFAULT_MODEL`].
    pub model: Option<String>,
    /// Endpoint override, mainly for tests.
    pub base_url: Option<String>,
}

impl GeneratorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENROUTER_API_KEY").ok().and_then(|key| {
            let trimmed = key.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });

        let model = std::env::var("OPENROUTER_MODEL").ok().and_then(|model| {
            let trimmed = model.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });

        Self {
            api_key,
            model,
            base_url: None,
        }
    }

    /// The model this configuration resolves to.
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Build an OpenRouter client. Fails when no credential is configured.
    pub fn build_client(&self) -> GameResult<OpenRouterClient> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GameError::Auth("no API key configured".to_string()))?;

        let client = match &self.base_url {
            Some(base_url) => OpenRouterClient::with_base_url(
                api_key.to_string(),
                self.model().to_string(),
                base_url.clone(),
            ),
            None => OpenRouterClient::new(api_key.to_string(), self.model().to_string()),
        };
        Ok(client)
    }
}
