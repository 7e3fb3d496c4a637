use supabase_client::SupabaseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The local tier could not be read or written.
    #[error("Local storage error: {0}")]
    Local(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Remote storage error: {0}")]
    Remote(String),
}

impl From<SupabaseError> for StoreError {
    fn from(e: SupabaseError) -> Self {
        StoreError::Remote(e.message())
    }
}

/// Shown when the identity service gives no usable message.
pub const DEFAULT_AUTH_MESSAGE: &str = "Ocorreu um erro na autenticação.";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Preencha e-mail e senha.")]
    MissingCredentials,

    /// Rejected by the identity service. The message is user-facing.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SupabaseError> for AuthError {
    fn from(e: SupabaseError) -> Self {
        let message = e.message();
        if message.trim().is_empty() {
            AuthError::Rejected(DEFAULT_AUTH_MESSAGE.to_string())
        } else {
            AuthError::Rejected(message)
        }
    }
}
