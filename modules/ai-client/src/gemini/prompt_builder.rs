use async_trait::async_trait;
use tracing::debug;

use crate::error::{AiError, Result};
use crate::image::InlineImage;
use crate::traits::PromptBuilder;

use super::types::*;
use super::Gemini;

pub struct GeminiPromptBuilder {
    agent: Gemini,
    input: String,
    preamble: Option<String>,
    images: Vec<InlineImage>,
    response_schema: Option<serde_json::Value>,
}

impl GeminiPromptBuilder {
    pub(crate) fn new(agent: Gemini, input: String) -> Self {
        Self {
            agent,
            input,
            preamble: None,
            images: Vec::new(),
            response_schema: None,
        }
    }

    /// Ask for a JSON reply matching `schema`; the reply is still returned as text.
    pub fn response_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    fn into_request(self) -> (Gemini, GenerateContentRequest) {
        let mut parts = Vec::with_capacity(self.images.len() + 1);
        if !self.input.is_empty() {
            parts.push(Part::text(self.input));
        }
        parts.extend(self.images.iter().map(Part::image));

        let mut request = GenerateContentRequest::new(vec![Content::user(parts)]);

        if let Some(preamble) = self.preamble {
            request = request.system_instruction(preamble);
        }
        if let Some(schema) = self.response_schema {
            request = request.json_schema(schema);
        }

        (self.agent, request)
    }
}

#[async_trait]
impl PromptBuilder for GeminiPromptBuilder {
    fn preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    fn image(mut self, image: InlineImage) -> Self {
        self.images.push(image);
        self
    }

    async fn send(self) -> Result<String> {
        let (agent, request) = self.into_request();
        let response = agent.client().generate(agent.model(), &request).await?;

        if let Some(reason) = response.block_reason() {
            return Err(AiError::EmptyResponse(format!("prompt blocked: {reason}")));
        }

        let text = response
            .text()
            .ok_or_else(|| AiError::EmptyResponse("no text in Gemini response".to_string()))?;
        debug!(chars = text.len(), "Gemini reply received");
        Ok(text)
    }
}
