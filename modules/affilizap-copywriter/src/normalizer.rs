use affilizap_common::{classify, Category, GeneratedCopy};
use ai_client::{strip_code_blocks, InlineImage};
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::GenerationError;

/// Shown when the model replied but produced nothing usable.
pub const FALLBACK_MESSAGE: &str = "IA analisou o pedido mas não conseguiu estruturar a copy. \
Por favor, tente enviar um print mais claro ou cole o link do produto.";

/// Shown on every degraded entry of a failed attempt.
pub const RETRY_MESSAGE: &str =
    "Erro ao gerar copy. Tente novamente ou verifique se o link é válido.";

/// A model reply after cleanup.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReply {
    Records(Vec<Value>),
    /// Well-formed but empty, or not an array at all.
    Gap,
}

impl ParsedReply {
    /// Strip fences and parse. Malformed JSON is a hard failure.
    pub fn parse(raw: &str) -> Result<Self, GenerationError> {
        let cleaned = strip_code_blocks(raw);
        if cleaned.is_empty() {
            return Ok(ParsedReply::Gap);
        }

        let value: Value = serde_json::from_str(cleaned)
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        match value {
            Value::Array(records) if !records.is_empty() => Ok(ParsedReply::Records(records)),
            _ => Ok(ParsedReply::Gap),
        }
    }
}

/// Turn a raw model reply into result entities stamped with the current time.
pub fn normalize(
    raw: &str,
    links: &[String],
    images: &[InlineImage],
) -> Result<Vec<GeneratedCopy>, GenerationError> {
    normalize_at(raw, links, images, Utc::now().timestamp_millis())
}

pub fn normalize_at(
    raw: &str,
    links: &[String],
    images: &[InlineImage],
    now_ms: i64,
) -> Result<Vec<GeneratedCopy>, GenerationError> {
    let records = match ParsedReply::parse(raw)? {
        ParsedReply::Records(records) => records,
        ParsedReply::Gap => {
            warn!(links = links.len(), images = images.len(), "Model returned no records, using fallback");
            vec![fallback_record(links)]
        }
    };

    let data_urls: Vec<String> = images.iter().map(InlineImage::to_data_url).collect();
    let total = records.len();
    debug!(records = total, "Normalizing model reply");

    Ok(records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let original_link = string_field(record, "originalLink")
                .or_else(|| links.get(i).cloned())
                .unwrap_or_default();
            let category = record
                .get("category")
                .and_then(Value::as_str)
                .map(Category::from)
                .unwrap_or_default();

            GeneratedCopy {
                id: format!("gen-{now_ms}-{i}"),
                platform: classify(&original_link),
                original_link,
                text: string_field(record, "text").unwrap_or_default(),
                category,
                image_url: assign_image(&data_urls, i, total),
                product_image_url: string_field(record, "productImageUrl"),
                timestamp: now_ms,
                is_error: false,
            }
        })
        .collect())
}

/// One degraded entry per input link, or a single one when only images were sent.
pub fn error_copies(links: &[String], images: &[InlineImage], now_ms: i64) -> Vec<GeneratedCopy> {
    let image_url = if links.len() <= 1 {
        images.first().map(InlineImage::to_data_url)
    } else {
        None
    };

    let count = links.len().max(1);
    (0..count)
        .map(|i| {
            let original_link = links.get(i).cloned().unwrap_or_default();
            GeneratedCopy {
                id: format!("err-{now_ms}-{i}"),
                platform: classify(&original_link),
                original_link,
                text: RETRY_MESSAGE.to_string(),
                category: Category::Other,
                image_url: image_url.clone(),
                product_image_url: None,
                timestamp: now_ms,
                is_error: true,
            }
        })
        .collect()
}

fn fallback_record(links: &[String]) -> Value {
    serde_json::json!({
        "originalLink": links.first().cloned().unwrap_or_default(),
        "text": FALLBACK_MESSAGE,
        "category": Category::Other.as_str(),
    })
}

fn string_field(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Positional match first; a lone screenshot is shared by every record.
fn assign_image(data_urls: &[String], index: usize, total: usize) -> Option<String> {
    if let Some(url) = data_urls.get(index) {
        return Some(url.clone());
    }
    if data_urls.len() == 1 && total > 1 {
        return Some(data_urls[0].clone());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use affilizap_common::Platform;

    const NOW: i64 = 1_700_000_000_000;

    fn links(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fenced_reply_parses_like_bare_reply() {
        let bare = r#"[{"originalLink":"https://amzn.to/x","text":"t","category":"TECH"}]"#;
        let tagged = format!("```json\n{bare}\n```");
        let untagged = format!("```\n{bare}\n```");
        assert_eq!(ParsedReply::parse(&tagged).unwrap(), ParsedReply::parse(bare).unwrap());
        assert_eq!(ParsedReply::parse(&untagged).unwrap(), ParsedReply::parse(bare).unwrap());
    }

    #[test]
    fn test_gap_cases() {
        assert_eq!(ParsedReply::parse("[]").unwrap(), ParsedReply::Gap);
        assert_eq!(ParsedReply::parse("{\"text\":\"x\"}").unwrap(), ParsedReply::Gap);
        assert_eq!(ParsedReply::parse("   ").unwrap(), ParsedReply::Gap);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = ParsedReply::parse("[{\"text\": ").unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[test]
    fn test_missing_fields_default_from_input() {
        let raw = r#"[{"text":"a"},{"originalLink":"","category":"FOOD"}]"#;
        let input = links(&["https://shopee.com.br/a", "https://meli.la/b"]);
        let copies = normalize_at(raw, &input, &[], NOW).unwrap();

        assert_eq!(copies[0].original_link, "https://shopee.com.br/a");
        assert_eq!(copies[0].platform, Platform::Shopee);
        assert_eq!(copies[0].category, Category::Other);
        assert_eq!(copies[1].original_link, "https://meli.la/b");
        assert_eq!(copies[1].platform, Platform::MercadoLivre);
        assert_eq!(copies[1].text, "");
        assert_eq!(copies[1].category, Category::Food);
    }

    #[test]
    fn test_whitespace_fields_are_kept() {
        let raw = r#"[{"originalLink":" ","text":"  "}]"#;
        let copies = normalize_at(raw, &links(&["https://amzn.to/1"]), &[], NOW).unwrap();
        assert_eq!(copies[0].original_link, " ");
        assert_eq!(copies[0].text, "  ");
        assert_eq!(copies[0].platform, Platform::Other);
    }

    #[test]
    fn test_ids_and_timestamps() {
        let raw = r#"[{"text":"a"},{"text":"b"}]"#;
        let copies = normalize_at(raw, &[], &[], NOW).unwrap();
        assert_eq!(copies[0].id, "gen-1700000000000-0");
        assert_eq!(copies[1].id, "gen-1700000000000-1");
        assert!(copies.iter().all(|c| c.timestamp == NOW && !c.is_error));
    }

    #[test]
    fn test_record_link_wins_over_input_link() {
        let raw = r#"[{"originalLink":"https://amzn.to/from-print","text":"t","category":"TECH"}]"#;
        let copies = normalize_at(raw, &links(&["https://shopee.com.br/x"]), &[], NOW).unwrap();
        assert_eq!(copies[0].original_link, "https://amzn.to/from-print");
        assert_eq!(copies[0].platform, Platform::Amazon);
    }

    #[test]
    fn test_unrecognized_category_passes_through() {
        let raw = r#"[{"text":"t","category":"GAMES"}]"#;
        let copies = normalize_at(raw, &[], &[], NOW).unwrap();
        assert_eq!(copies[0].category, Category::Unrecognized("GAMES".into()));
    }

    #[test]
    fn test_fallback_uses_first_link() {
        let copies = normalize_at("[]", &links(&["https://magalu.com/p", "https://amzn.to/q"]), &[], NOW)
            .unwrap();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].text, FALLBACK_MESSAGE);
        assert_eq!(copies[0].original_link, "https://magalu.com/p");
        assert_eq!(copies[0].platform, Platform::Magalu);
        assert!(!copies[0].is_error);
    }

    #[test]
    fn test_product_image_url_is_untouched() {
        let raw = r#"[{"text":"t","productImageUrl":"not a url"}]"#;
        let copies = normalize_at(raw, &[], &[], NOW).unwrap();
        assert_eq!(copies[0].product_image_url.as_deref(), Some("not a url"));
    }

    #[test]
    fn test_error_copies_per_link() {
        let image = InlineImage::new("image/png", vec![1, 2, 3]);
        let input = links(&["https://amzn.to/a", "https://shopee.com.br/b", "https://x.com/c"]);
        let copies = error_copies(&input, std::slice::from_ref(&image), NOW);

        assert_eq!(copies.len(), 3);
        assert!(copies.iter().all(|c| c.is_error && c.text == RETRY_MESSAGE));
        assert!(copies.iter().all(|c| c.image_url.is_none()));
        assert_eq!(copies[1].platform, Platform::Shopee);
        assert_eq!(copies[2].platform, Platform::Other);
        assert_eq!(copies[0].id, "err-1700000000000-0");
    }

    #[test]
    fn test_single_link_error_keeps_image() {
        let image = InlineImage::new("image/png", vec![1, 2, 3]);
        let copies = error_copies(&links(&["https://amzn.to/a"]), &[image.clone()], NOW);
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].image_url, Some(image.to_data_url()));

        let image_only = error_copies(&[], &[image], NOW);
        assert_eq!(image_only.len(), 1);
        assert_eq!(image_only[0].original_link, "");
        assert!(image_only[0].image_url.is_some());
    }
}
