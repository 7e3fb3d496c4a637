mod client;
pub mod prompt_builder;
pub(crate) mod types;

pub use prompt_builder::GeminiPromptBuilder;

use std::time::Duration;

use crate::error::Result;
use crate::traits::Agent;

use client::GeminiClient;

/// Upper bound on a single `generateContent` call unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// =============================================================================
// Gemini Agent
// =============================================================================

/// A model name plus the HTTP client that talks to it. The client is built
/// once and shared by every prompt sent through this agent.
#[derive(Clone)]
pub struct Gemini {
    model: String,
    timeout: Duration,
    client: GeminiClient,
}

impl Gemini {
    pub fn new(api_key: &str, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            model: model.into(),
            timeout,
            client: GeminiClient::new(api_key, timeout)?,
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn client(&self) -> &GeminiClient {
        &self.client
    }
}

// =============================================================================
// Agent Implementation
// =============================================================================

impl Agent for Gemini {
    type PromptBuilder = GeminiPromptBuilder;

    fn prompt(&self, input: impl Into<String>) -> GeminiPromptBuilder {
        GeminiPromptBuilder::new(self.clone(), input.into())
    }
}
