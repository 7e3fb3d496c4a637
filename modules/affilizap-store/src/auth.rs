use std::sync::Arc;

use async_trait::async_trait;
use supabase_client::{Session, SignUpResponse, SupabaseClient};
use tracing::{info, warn};

use crate::error::AuthError;
use crate::local::KeyValueStore;

pub const SESSION_KEY: &str = "affilizap_session";

pub const SIGN_UP_MESSAGE: &str =
    "Conta criada com sucesso! Verifique seu e-mail (se necessário) ou faça login.";

/// The remote identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<SignUpResponse, AuthError>;

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError>;
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        Ok(self.sign_in_with_password(email, password).await?)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<SignUpResponse, AuthError> {
        let metadata = serde_json::json!({ "full_name": full_name });
        Ok(SupabaseClient::sign_up(self, email, password, metadata).await?)
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        self.clone()
            .with_access_token(session.access_token.clone())
            .sign_out()
            .await?;
        Ok(())
    }
}

/// What a successful auth call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    SignedIn(Session),
    /// The account exists but has no session yet, usually pending email
    /// confirmation.
    SignUpPending { message: String },
}

/// Sign-in flow with the session kept in the local tier.
pub struct Authenticator<P> {
    provider: P,
    local: Arc<dyn KeyValueStore>,
}

impl<P: IdentityProvider> Authenticator<P> {
    pub fn new(provider: P, local: Arc<dyn KeyValueStore>) -> Self {
        Self { provider, local }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let (email, password) = credentials(email, password)?;
        let session = self.provider.sign_in(email, password).await?;
        self.save(&session).await?;
        info!(user = session.user.id.as_str(), "Signed in");
        Ok(AuthOutcome::SignedIn(session))
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthOutcome, AuthError> {
        let (email, password) = credentials(email, password)?;
        match self.provider.sign_up(email, password, full_name.trim()).await? {
            SignUpResponse::Session(session) => {
                self.save(&session).await?;
                info!(user = session.user.id.as_str(), "Signed up and signed in");
                Ok(AuthOutcome::SignedIn(session))
            }
            SignUpResponse::User(user) => {
                info!(user = user.id.as_str(), "Signed up, confirmation pending");
                Ok(AuthOutcome::SignUpPending {
                    message: SIGN_UP_MESSAGE.to_string(),
                })
            }
        }
    }

    /// Forget the local session. Revocation failures are only logged.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(session) = self.current_session().await? {
            if let Err(e) = self.provider.sign_out(&session).await {
                warn!(error = %e, "Failed to revoke session");
            }
        }
        self.local.remove(SESSION_KEY).await?;
        Ok(())
    }

    pub async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(raw) = self.local.get(SESSION_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable session");
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<(), AuthError> {
        let json = serde_json::to_string(session).map_err(crate::StoreError::from)?;
        self.local.set(SESSION_KEY, &json).await?;
        Ok(())
    }
}

fn credentials<'a>(email: &'a str, password: &'a str) -> Result<(&'a str, &'a str), AuthError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok((email, password))
}
