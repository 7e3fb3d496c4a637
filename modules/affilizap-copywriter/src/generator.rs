use std::sync::OnceLock;
use std::time::Duration;

use affilizap_common::Config;
use ai_client::{AiError, Agent, Gemini, PromptBuilder};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::GenerationError;
use crate::request::CopyRequest;

/// The remote model call. One invocation per attempt, no retries.
#[async_trait]
pub trait CopyGenerator: Send + Sync {
    /// Send the request and return the model's raw text reply.
    async fn invoke(&self, request: &CopyRequest) -> Result<String, GenerationError>;
}

/// Gemini-backed generator. The agent is created on first use and kept for
/// the life of the generator.
pub struct GeminiGenerator {
    api_key: Option<String>,
    model: String,
    timeout: Duration,
    base_url: Option<String>,
    agent: OnceLock<Gemini>,
}

impl GeminiGenerator {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
            timeout: ai_client::gemini::DEFAULT_TIMEOUT,
            base_url: None,
            agent: OnceLock::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.gemini_api_key.clone(), config.gemini_model.clone())
            .with_timeout(config.request_timeout)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    fn agent(&self) -> Result<&Gemini, GenerationError> {
        if let Some(agent) = self.agent.get() {
            return Ok(agent);
        }

        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::Config("API key is missing. Set API_KEY or GEMINI_API_KEY.".to_string())
            })?;

        debug!(model = %self.model, timeout_secs = self.timeout.as_secs(), "Creating Gemini agent");
        let agent = Gemini::new(api_key, self.model.clone(), self.timeout)?;
        let agent = match &self.base_url {
            Some(url) => agent.with_base_url(url),
            None => agent,
        };

        // A concurrent first call may have won the race; keep whichever landed.
        Ok(self.agent.get_or_init(|| agent))
    }
}

#[async_trait]
impl CopyGenerator for GeminiGenerator {
    async fn invoke(&self, request: &CopyRequest) -> Result<String, GenerationError> {
        let agent = self.agent()?;

        let mut prompt = agent
            .prompt(request.prompt.clone())
            .preamble(request.instructions.clone())
            .response_schema(request.schema.clone());
        for image in &request.images {
            prompt = prompt.image(image.clone());
        }

        match prompt.send().await {
            Ok(text) => Ok(text),
            // A reply with no text is treated like an empty array.
            Err(AiError::EmptyResponse(reason)) => {
                warn!(reason = %reason, "Gemini returned no text");
                Ok(String::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}
