// Test doubles for both history tiers and the identity service.
//
// MockRemote keeps recorded rows in memory and can be told to fail or stall
// reads, or to fail writes. FullDiskStore rejects every local write.
// MockIdentity answers sign-in/sign-up from fixed responses.

use std::io;
use std::sync::Mutex;
use std::time::Duration;

use affilizap_common::GeneratedCopy;
use async_trait::async_trait;
use supabase_client::{Session, SignUpResponse, User};

use crate::auth::IdentityProvider;
use crate::error::{AuthError, Result, StoreError};
use crate::local::KeyValueStore;
use crate::remote::RemoteHistory;

#[derive(Default)]
pub struct MockRemote {
    inner: Mutex<MockRemoteInner>,
}

#[derive(Default)]
struct MockRemoteInner {
    recorded: Vec<GeneratedCopy>,
    recent: Vec<GeneratedCopy>,
    fail_reads: bool,
    fail_writes: bool,
    read_delay: Option<Duration>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows returned by `recent`, newest first.
    pub fn with_recent(self, rows: Vec<GeneratedCopy>) -> Self {
        self.inner.lock().unwrap().recent = rows;
        self
    }

    pub fn failing_reads(self) -> Self {
        self.inner.lock().unwrap().fail_reads = true;
        self
    }

    /// `recent` sleeps this long before answering.
    pub fn with_read_delay(self, delay: Duration) -> Self {
        self.inner.lock().unwrap().read_delay = Some(delay);
        self
    }

    pub fn failing_writes(self) -> Self {
        self.inner.lock().unwrap().fail_writes = true;
        self
    }

    pub fn recorded(&self) -> Vec<GeneratedCopy> {
        self.inner.lock().unwrap().recorded.clone()
    }
}

#[async_trait]
impl RemoteHistory for MockRemote {
    async fn record(&self, copy: &GeneratedCopy) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(StoreError::Remote("insert rejected".into()));
        }
        inner.recorded.push(copy.clone());
        Ok(())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<GeneratedCopy>> {
        let delay = self.inner.lock().unwrap().read_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let inner = self.inner.lock().unwrap();
        if inner.fail_reads {
            return Err(StoreError::Remote("connection refused".into()));
        }
        Ok(inner.recent.iter().take(limit as usize).cloned().collect())
    }
}

/// Local tier that reads as empty and refuses every write.
#[derive(Default)]
pub struct FullDiskStore;

#[async_trait]
impl KeyValueStore for FullDiskStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(io::Error::other("no space left on device").into())
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Err(io::Error::other("no space left on device").into())
    }
}

pub fn session(email: &str) -> Session {
    Session {
        access_token: format!("token-{email}"),
        refresh_token: Some("refresh".into()),
        expires_in: Some(3600),
        expires_at: None,
        user: user(email),
    }
}

pub fn user(email: &str) -> User {
    User {
        id: format!("user-{email}"),
        email: Some(email.to_string()),
        user_metadata: serde_json::json!({}),
    }
}

/// Identity service that accepts a single password.
pub struct MockIdentity {
    password: String,
    confirm_email: bool,
    signed_out: Mutex<Vec<String>>,
}

impl MockIdentity {
    pub fn accepting(password: &str) -> Self {
        Self {
            password: password.to_string(),
            confirm_email: false,
            signed_out: Mutex::new(Vec::new()),
        }
    }

    /// Sign-ups return a bare user instead of a session.
    pub fn requiring_confirmation(mut self) -> Self {
        self.confirm_email = true;
        self
    }

    /// Access tokens revoked so far.
    pub fn signed_out(&self) -> Vec<String> {
        self.signed_out.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> std::result::Result<Session, AuthError> {
        if password != self.password {
            return Err(AuthError::Rejected("Invalid login credentials".into()));
        }
        Ok(session(email))
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        full_name: &str,
    ) -> std::result::Result<SignUpResponse, AuthError> {
        if self.confirm_email {
            let mut user = user(email);
            user.user_metadata = serde_json::json!({ "full_name": full_name });
            return Ok(SignUpResponse::User(user));
        }
        Ok(SignUpResponse::Session(session(email)))
    }

    async fn sign_out(&self, session: &Session) -> std::result::Result<(), AuthError> {
        self.signed_out.lock().unwrap().push(session.access_token.clone());
        Ok(())
    }
}
