use thiserror::Error;

pub type Result<T> = std::result::Result<T, SupabaseError>;

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl SupabaseError {
    /// Human-readable message from a GoTrue/PostgREST error body, falling back
    /// to the raw body.
    pub fn message(&self) -> String {
        match self {
            SupabaseError::Api { message, .. } => extract_error_message(message),
            other => other.to_string(),
        }
    }
}

fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

impl From<reqwest::Error> for SupabaseError {
    fn from(err: reqwest::Error) -> Self {
        SupabaseError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SupabaseError {
    fn from(err: serde_json::Error) -> Self {
        SupabaseError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gotrue_message_is_extracted() {
        let err = SupabaseError::Api {
            status: 400,
            message: r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#
                .to_string(),
        };
        assert_eq!(err.message(), "Invalid login credentials");
    }

    #[test]
    fn test_non_json_body_is_kept() {
        let err = SupabaseError::Api {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(err.message(), "Bad Gateway");
    }
}
