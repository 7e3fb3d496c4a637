/// Strip markdown code fences wrapped around a response.
///
/// The opening fence may carry a language tag (```` ```json ````, ```` ```JSON ````,
/// ```` ```javascript ````). Content without fences is returned trimmed.
pub fn strip_code_blocks(response: &str) -> &str {
    let mut body = response.trim();

    if let Some(rest) = body.strip_prefix("```") {
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        body = &rest[tag_len..];
    }

    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }

    body.trim()
}
