use affilizap_common::Category;
use ai_client::{InlineImage, StructuredOutput};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::prompt::{user_prompt, SYSTEM_INSTRUCTION};

/// Shape of one record the model must return.
///
/// Only used to derive the response schema: replies are parsed leniently
/// by the normalizer because the model does not always honour it.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedCopy {
    /// O link final usado na oferta.
    pub original_link: String,
    /// O texto promocional completo.
    pub text: String,
    pub category: Category,
    /// URL direta da imagem do produto (formato jpg/png) se encontrada.
    pub product_image_url: Option<String>,
}

/// Everything sent to the model for one attempt.
#[derive(Debug, Clone)]
pub struct CopyRequest {
    pub instructions: String,
    pub prompt: String,
    pub images: Vec<InlineImage>,
    pub schema: serde_json::Value,
}

/// Assemble the single request for a batch of links and screenshots.
///
/// Input caps are enforced by `GenerationInput`, not here.
pub fn build_request(links: &[String], images: &[InlineImage]) -> CopyRequest {
    CopyRequest {
        instructions: SYSTEM_INSTRUCTION.to_string(),
        prompt: user_prompt(links),
        images: images.to_vec(),
        schema: Vec::<ExtractedCopy>::gemini_schema(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_contract() {
        let request = build_request(&["https://amzn.to/abc123".to_string()], &[]);
        let schema = &request.schema;
        assert_eq!(schema["type"], "ARRAY");

        let item = &schema["items"];
        assert_eq!(item["type"], "OBJECT");

        let mut required: Vec<&str> = item["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        required.sort();
        assert_eq!(required, vec!["category", "originalLink", "text"]);

        let category = &item["properties"]["category"];
        assert_eq!(
            category["enum"],
            serde_json::json!(["TECH", "HOME", "BEAUTY", "FASHION", "FOOD", "VIRAL", "OTHER"])
        );
        assert_eq!(item["properties"]["productImageUrl"]["nullable"], true);
    }

    #[test]
    fn test_images_are_attached_in_order() {
        let images = vec![
            InlineImage::new("image/png", vec![1]),
            InlineImage::new("image/jpeg", vec![2]),
        ];
        let request = build_request(&[], &images);
        assert_eq!(request.images, images);
        assert!(request.prompt.contains("Nenhum link colado"));
        assert_eq!(request.instructions, SYSTEM_INSTRUCTION);
    }
}
