use affilizap_common::GeneratedCopy;
use chrono::Utc;
use tracing::{info, warn};

use crate::error::GenerationError;
use crate::generator::CopyGenerator;
use crate::input::GenerationInput;
use crate::normalizer::{error_copies, normalize_at};
use crate::progress::ProgressTicker;
use crate::request::build_request;

/// Result of one attempt. Both arms carry renderable entities.
#[derive(Debug)]
pub enum GenerationOutcome {
    Success(Vec<GeneratedCopy>),
    Failure {
        copies: Vec<GeneratedCopy>,
        error: GenerationError,
    },
}

impl GenerationOutcome {
    pub fn copies(&self) -> &[GeneratedCopy] {
        match self {
            GenerationOutcome::Success(copies) => copies,
            GenerationOutcome::Failure { copies, .. } => copies,
        }
    }

    pub fn into_copies(self) -> Vec<GeneratedCopy> {
        match self {
            GenerationOutcome::Success(copies) => copies,
            GenerationOutcome::Failure { copies, .. } => copies,
        }
    }

    /// Entries worth keeping in history.
    pub fn successes(&self) -> Vec<GeneratedCopy> {
        self.copies().iter().filter(|c| !c.is_error).cloned().collect()
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, GenerationOutcome::Failure { .. })
    }

    pub fn error(&self) -> Option<&GenerationError> {
        match self {
            GenerationOutcome::Success(_) => None,
            GenerationOutcome::Failure { error, .. } => Some(error),
        }
    }
}

/// Runs a generation attempt end to end: build, invoke, normalize.
///
/// Never fails. Every error is turned into degraded entries.
pub struct Copywriter<G> {
    generator: G,
}

impl<G: CopyGenerator> Copywriter<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub async fn generate(&self, input: &GenerationInput) -> GenerationOutcome {
        let links = input.links();
        let images = input.images();
        info!(links = links.len(), images = images.len(), "Generating copy");

        let request = build_request(links, images);
        let result = match self.generator.invoke(&request).await {
            Ok(raw) => normalize_at(&raw, links, images, Utc::now().timestamp_millis()),
            Err(e) => Err(e),
        };

        match result {
            Ok(copies) => {
                info!(copies = copies.len(), "Copy generated");
                GenerationOutcome::Success(copies)
            }
            Err(error) => {
                warn!(error = %error, "Generation failed, returning degraded entries");
                GenerationOutcome::Failure {
                    copies: error_copies(links, images, Utc::now().timestamp_millis()),
                    error,
                }
            }
        }
    }

    /// Same as `generate`, completing the ticker once the attempt settles.
    pub async fn generate_tracked(
        &self,
        input: &GenerationInput,
        ticker: ProgressTicker,
    ) -> GenerationOutcome {
        let outcome = self.generate(input).await;
        ticker.finish();
        outcome
    }
}
