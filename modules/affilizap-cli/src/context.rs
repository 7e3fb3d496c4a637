use std::sync::Arc;

use affilizap_common::Config;
use affilizap_store::{
    Authenticator, HistoryStore, JsonFileStore, KeyValueStore, SupabaseHistory,
};
use anyhow::{Context, Result};
use supabase_client::SupabaseClient;
use tracing::debug;

/// Shared state for one command invocation.
pub struct AppContext {
    pub config: Config,
    pub local: Arc<dyn KeyValueStore>,
}

impl AppContext {
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env().context("Failed to load configuration")?;
        let local: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::in_dir(&config.data_dir));
        Ok(Self { config, local })
    }

    /// Anonymous Supabase client, if configured.
    pub fn supabase(&self) -> Result<Option<SupabaseClient>> {
        self.config
            .supabase()
            .map(|(url, key)| SupabaseClient::new(url, key))
            .transpose()
            .context("Failed to build Supabase client")
    }

    pub fn authenticator(&self) -> Result<Authenticator<SupabaseClient>> {
        let client = self
            .supabase()?
            .context("SUPABASE_URL and SUPABASE_ANON_KEY must be set for account commands")?;
        Ok(Authenticator::new(client, Arc::clone(&self.local)))
    }

    /// History store with the remote tier attached when Supabase is configured.
    /// Remote calls use the saved session's token when there is one.
    pub async fn history(&self) -> Result<HistoryStore> {
        let store = HistoryStore::new(Arc::clone(&self.local));

        let Some(client) = self.supabase()? else {
            debug!("Supabase not configured, history is local only");
            return Ok(store);
        };

        let auth = Authenticator::new(client.clone(), Arc::clone(&self.local));
        let client = match auth.current_session().await? {
            Some(session) => client.with_access_token(session.access_token),
            None => client,
        };

        Ok(store.with_remote(Arc::new(SupabaseHistory::new(client))))
    }
}
