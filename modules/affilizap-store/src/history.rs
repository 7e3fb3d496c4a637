use std::sync::Arc;

use affilizap_common::GeneratedCopy;
use futures::future::join_all;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::local::KeyValueStore;
use crate::query::{sort_newest_first, HistoryQuery};
use crate::remote::{RemoteHistory, RECENT_LIMIT};

pub const HISTORY_KEY: &str = "affilizap_history";

/// Two-tier history: the local store is written through on every change,
/// the remote tier only receives successful entries, in the background.
pub struct HistoryStore {
    local: Arc<dyn KeyValueStore>,
    remote: Option<Arc<dyn RemoteHistory>>,
    entries: Mutex<Vec<GeneratedCopy>>,
}

impl HistoryStore {
    pub fn new(local: Arc<dyn KeyValueStore>) -> Self {
        Self {
            local,
            remote: None,
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteHistory>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Read the local tier only. What the user removed or edited locally
    /// stays that way.
    pub async fn load_local(&self) -> Result<usize> {
        let mut entries = self.entries.lock().await;
        *entries = self.read_local().await?;
        debug!(count = entries.len(), "Loaded local history");
        Ok(entries.len())
    }

    /// Read the local tier, then replace it wholesale with the remote tier
    /// when that read succeeds and returns anything.
    ///
    /// The remote read happens without holding the entries lock, so other
    /// readers see the local entries in the meantime.
    pub async fn load(&self) -> Result<usize> {
        let count = self.load_local().await?;

        let Some(remote) = &self.remote else {
            return Ok(count);
        };

        let rows = match remote.recent(RECENT_LIMIT).await {
            Ok(rows) if !rows.is_empty() => rows,
            Ok(_) => {
                debug!("Remote history is empty, keeping local");
                return Ok(count);
            }
            Err(e) => {
                warn!(error = %e, "Failed to load remote history");
                return Ok(count);
            }
        };

        info!(count = rows.len(), "Replacing history with remote rows");
        let mut entries = self.entries.lock().await;
        *entries = rows;
        self.write_local(&entries).await?;
        Ok(entries.len())
    }

    /// Prepend the successful entries. Degraded entries are never stored.
    ///
    /// A failed local write is logged and the remote writes still go out;
    /// the in-memory view keeps the new entries either way.
    ///
    /// Remote writes run in the background; the returned handle can be
    /// awaited before shutdown but never reports their failures.
    pub async fn append(&self, copies: &[GeneratedCopy]) -> Result<RemoteSync> {
        let valid: Vec<GeneratedCopy> = copies.iter().filter(|c| !c.is_error).cloned().collect();
        if valid.is_empty() {
            return Ok(RemoteSync::default());
        }

        {
            let mut entries = self.entries.lock().await;
            let mut updated = valid.clone();
            updated.append(&mut entries);
            *entries = updated;
            if let Err(e) = self.write_local(&entries).await {
                warn!(error = %e, "Failed to save history locally");
            }
        }
        info!(count = valid.len(), "Added to history");

        let Some(remote) = &self.remote else {
            return Ok(RemoteSync::default());
        };

        let tasks = valid
            .into_iter()
            .map(|copy| {
                let remote = Arc::clone(remote);
                tokio::spawn(async move {
                    if let Err(e) = remote.record(&copy).await {
                        warn!(id = copy.id.as_str(), error = %e, "Failed to save to remote history");
                    }
                })
            })
            .collect();

        Ok(RemoteSync { tasks })
    }

    /// All entries, newest first.
    pub async fn list(&self) -> Vec<GeneratedCopy> {
        let mut entries = self.entries.lock().await.clone();
        sort_newest_first(&mut entries);
        entries
    }

    pub async fn query(&self, query: &HistoryQuery) -> Vec<GeneratedCopy> {
        query.apply(self.entries.lock().await.iter())
    }

    pub async fn get(&self, id: &str) -> Option<GeneratedCopy> {
        self.entries.lock().await.iter().find(|c| c.id == id).cloned()
    }

    /// Remove every entry with this id. Local only.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|c| c.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.write_local(&entries).await?;
        Ok(true)
    }

    /// Save an edited copy text back into history.
    pub async fn update_text(&self, id: &str, text: &str) -> Result<bool> {
        let mut entries = self.entries.lock().await;
        let Some(entry) = entries.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        entry.text = text.to_string();
        self.write_local(&entries).await?;
        Ok(true)
    }

    /// Drop everything. Local only.
    pub async fn clear(&self) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.clear();
        self.local.remove(HISTORY_KEY).await?;
        info!("History cleared");
        Ok(())
    }

    async fn read_local(&self) -> Result<Vec<GeneratedCopy>> {
        let Some(raw) = self.local.get(HISTORY_KEY).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(error = %e, "Failed to parse stored history, starting empty");
                Ok(Vec::new())
            }
        }
    }

    /// Screenshots are dropped before anything reaches the local tier.
    async fn write_local(&self, entries: &[GeneratedCopy]) -> Result<()> {
        let stripped: Vec<GeneratedCopy> = entries.iter().map(GeneratedCopy::without_image).collect();
        let json = serde_json::to_string(&stripped)?;
        self.local.set(HISTORY_KEY, &json).await
    }
}

/// Pending remote writes from one `append`.
#[derive(Default)]
pub struct RemoteSync {
    tasks: Vec<JoinHandle<()>>,
}

impl RemoteSync {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every write to finish, successfully or not.
    pub async fn settled(self) {
        for result in join_all(self.tasks).await {
            if let Err(e) = result {
                warn!(error = %e, "Remote history task did not complete");
            }
        }
    }
}
