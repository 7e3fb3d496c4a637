use std::sync::LazyLock;

use base64::Engine;
use regex::Regex;

use crate::error::{AiError, Result};

/// MIME type assumed for payloads that arrive without a data-URL header.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

static DATA_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:([^;,]+)?((?:;[^;,]+)*),").expect("valid data URL regex"));

/// An image sent inline with a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Decode a `data:<mime>;base64,<payload>` URL, or a bare base64 payload.
    pub fn from_encoded(encoded: &str) -> Result<Self> {
        let encoded = encoded.trim();

        let (mime_type, payload) = match DATA_URL.captures(encoded) {
            Some(caps) => {
                let header_len = caps.get(0).map(|m| m.end()).unwrap_or(0);
                let mime = caps
                    .get(1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());
                (mime, &encoded[header_len..])
            }
            None => (DEFAULT_IMAGE_MIME.to_string(), encoded),
        };

        let data = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| AiError::Parse(format!("invalid base64 image payload: {e}")))?;

        Ok(Self { mime_type, data })
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}
