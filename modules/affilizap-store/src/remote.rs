use affilizap_common::{Category, GeneratedCopy, Platform};
use async_trait::async_trait;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use supabase_client::{SelectQuery, SupabaseClient};

use crate::error::Result;

pub const HISTORY_TABLE: &str = "link_history";

/// Rows read back on startup.
pub const RECENT_LIMIT: u32 = 50;

/// The remote tier. Append-only from this side.
#[async_trait]
pub trait RemoteHistory: Send + Sync {
    async fn record(&self, copy: &GeneratedCopy) -> Result<()>;

    /// Most recent entries, newest first.
    async fn recent(&self, limit: u32) -> Result<Vec<GeneratedCopy>>;
}

/// Row written to `link_history`. `created_at` is set by the server.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRow<'a> {
    pub original_url: &'a str,
    pub generated_url: &'a str,
    pub platform: Platform,
    pub status: &'static str,
}

impl<'a> HistoryRow<'a> {
    pub fn from_copy(copy: &'a GeneratedCopy) -> Self {
        Self {
            original_url: &copy.original_link,
            generated_url: &copy.text,
            platform: copy.platform,
            status: if copy.is_error { "error" } else { "success" },
        }
    }
}

/// Row as read from `link_history`. Older rows may carry the copy in `text`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredRow {
    pub id: Value,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub generated_url: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl StoredRow {
    pub fn into_copy(self) -> GeneratedCopy {
        let id = match self.id {
            Value::String(s) => s,
            other => other.to_string(),
        };
        let text = self
            .text
            .filter(|t| !t.is_empty())
            .or(self.generated_url)
            .unwrap_or_default();
        let platform = self
            .platform
            .and_then(|p| p.parse::<Platform>().ok())
            .unwrap_or_default();
        let timestamp = self
            .created_at
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.timestamp_millis())
            .unwrap_or_default();

        GeneratedCopy {
            id,
            original_link: self.original_url.unwrap_or_default(),
            text,
            category: Category::Other,
            platform,
            image_url: None,
            product_image_url: None,
            timestamp,
            is_error: self.status.as_deref() == Some("error"),
        }
    }
}

/// `link_history` over PostgREST.
#[derive(Clone)]
pub struct SupabaseHistory {
    client: SupabaseClient,
}

impl SupabaseHistory {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteHistory for SupabaseHistory {
    async fn record(&self, copy: &GeneratedCopy) -> Result<()> {
        self.client
            .insert(HISTORY_TABLE, &HistoryRow::from_copy(copy))
            .await?;
        Ok(())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<GeneratedCopy>> {
        let query = SelectQuery::new().order_desc("created_at").limit(limit);
        let rows: Vec<StoredRow> = self.client.select(HISTORY_TABLE, &query).await?;
        Ok(rows.into_iter().map(StoredRow::into_copy).collect())
    }
}
