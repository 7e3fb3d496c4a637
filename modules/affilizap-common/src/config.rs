use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_DATA_DIR: &str = ".affilizap";

/// Checked in order; the first non-blank value wins.
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Application configuration loaded from environment variables.
///
/// Only the model credential matters for generation, and even that is
/// optional here: a missing key surfaces later as a failed attempt.
#[derive(Debug, Clone)]
pub struct Config {
    // Model
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub request_timeout: Duration,

    // Hosted database / identity
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,

    // Local tier
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let timeout_secs = match env::var("GEMINI_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("GEMINI_TIMEOUT_SECS must be a number, got {raw:?}"))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            gemini_api_key: first_env(&API_KEY_VARS),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            supabase_url: optional_env("SUPABASE_URL"),
            supabase_anon_key: optional_env("SUPABASE_ANON_KEY"),
            data_dir: optional_env("AFFILIZAP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        };

        config.log_keys();
        Ok(config)
    }

    /// Supabase URL and anon key, when both are configured.
    pub fn supabase(&self) -> Option<(&str, &str)> {
        match (&self.supabase_url, &self.supabase_anon_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key.as_str())),
            _ => None,
        }
    }

    fn log_keys(&self) {
        tracing::debug!("Config loaded:");
        tracing::debug!("  API_KEY: {}", preview_opt(&self.gemini_api_key));
        tracing::debug!("  GEMINI_MODEL: {}", self.gemini_model);
        tracing::debug!("  GEMINI_TIMEOUT_SECS: {}", self.request_timeout.as_secs());
        tracing::debug!("  SUPABASE_URL: {}", self.supabase_url.as_deref().unwrap_or("<not set>"));
        tracing::debug!("  SUPABASE_ANON_KEY: {}", preview_opt(&self.supabase_anon_key));
        tracing::debug!("  AFFILIZAP_DATA_DIR: {}", self.data_dir.display());
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| optional_env(key))
}

fn preview(val: &str) -> String {
    let n = val.char_indices().nth(5).map(|(i, _)| i).unwrap_or(val.len());
    format!("{}...({} chars)", &val[..n], val.len())
}

fn preview_opt(val: &Option<String>) -> String {
    match val {
        Some(v) if !v.is_empty() => preview(v),
        _ => "<not set>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_redacts() {
        assert_eq!(preview("AIzaSyD-secret"), "AIzaS...(14 chars)");
        assert_eq!(preview("abc"), "abc...(3 chars)");
        assert_eq!(preview_opt(&None), "<not set>");
    }

    #[test]
    fn test_first_env_prefers_earlier_names() {
        env::set_var("AFFILIZAP_TEST_KEY_PRIMARY", "primary");
        env::set_var("AFFILIZAP_TEST_KEY_SECONDARY", "secondary");
        env::set_var("AFFILIZAP_TEST_KEY_BLANK", "   ");

        let keys = ["AFFILIZAP_TEST_KEY_PRIMARY", "AFFILIZAP_TEST_KEY_SECONDARY"];
        assert_eq!(first_env(&keys).as_deref(), Some("primary"));

        let keys = ["AFFILIZAP_TEST_KEY_BLANK", "AFFILIZAP_TEST_KEY_SECONDARY"];
        assert_eq!(first_env(&keys).as_deref(), Some("secondary"));

        assert_eq!(first_env(&["AFFILIZAP_TEST_KEY_UNSET"]), None);
        assert_eq!(API_KEY_VARS[0], "API_KEY");
    }

    #[test]
    fn test_supabase_requires_both_values() {
        let mut config = Config {
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            supabase_url: Some("https://abc.supabase.co".into()),
            supabase_anon_key: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        };
        assert!(config.supabase().is_none());
        config.supabase_anon_key = Some("anon".into());
        assert_eq!(config.supabase(), Some(("https://abc.supabase.co", "anon")));
    }
}
