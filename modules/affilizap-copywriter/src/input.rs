use ai_client::InlineImage;
use tracing::warn;

use crate::error::InputError;

pub const MAX_LINKS: usize = 5;
pub const MAX_IMAGES: usize = 5;

/// Links and screenshots for one generation attempt.
#[derive(Debug, Clone)]
pub struct GenerationInput {
    links: Vec<String>,
    images: Vec<InlineImage>,
}

impl GenerationInput {
    /// Trim links and drop blank ones. Images past the upload limit are dropped.
    pub fn new(
        links: impl IntoIterator<Item = String>,
        mut images: Vec<InlineImage>,
    ) -> Result<Self, InputError> {
        let links: Vec<String> = links
            .into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        if links.is_empty() && images.is_empty() {
            return Err(InputError::Empty);
        }

        if links.len() > MAX_LINKS {
            return Err(InputError::TooManyLinks {
                count: links.len(),
                max: MAX_LINKS,
            });
        }

        if images.len() > MAX_IMAGES {
            warn!(
                supplied = images.len(),
                kept = MAX_IMAGES,
                "Dropping images past the upload limit"
            );
            images.truncate(MAX_IMAGES);
        }

        Ok(Self { links, images })
    }

    /// One link per line of free text.
    pub fn from_text(text: &str, images: Vec<InlineImage>) -> Result<Self, InputError> {
        Self::new(text.lines().map(str::to_string), images)
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    pub fn images(&self) -> &[InlineImage] {
        &self.images
    }
}
