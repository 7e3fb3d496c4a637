pub mod auth;
pub mod error;
pub mod history;
pub mod local;
pub mod query;
pub mod remote;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use auth::{AuthOutcome, Authenticator, IdentityProvider, SESSION_KEY};
pub use error::{AuthError, Result, StoreError};
pub use history::{HistoryStore, RemoteSync, HISTORY_KEY};
pub use local::{JsonFileStore, KeyValueStore, MemoryStore};
pub use query::HistoryQuery;
pub use remote::{RemoteHistory, SupabaseHistory};

pub use supabase_client::Session;
