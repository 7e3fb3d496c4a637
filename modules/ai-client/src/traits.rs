use async_trait::async_trait;

use crate::error::Result;
use crate::image::InlineImage;

// =============================================================================
// Agent Trait
// =============================================================================

pub trait Agent: Clone + Send + Sync {
    type PromptBuilder: PromptBuilder;

    fn prompt(&self, input: impl Into<String>) -> Self::PromptBuilder;
}

// =============================================================================
// PromptBuilder Trait
// =============================================================================

#[async_trait]
pub trait PromptBuilder: Send + Sized {
    fn preamble(self, preamble: impl Into<String>) -> Self;
    /// Attach an image as a separate inline part after the text input.
    fn image(self, image: InlineImage) -> Self;
    async fn send(self) -> Result<String>;
}
