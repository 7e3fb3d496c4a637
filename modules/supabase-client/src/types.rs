use serde::{Deserialize, Serialize};

// =============================================================================
// PostgREST
// =============================================================================

/// Read options for a PostgREST `select`.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    pub columns: String,
    /// Column sorted newest-first.
    pub order_desc: Option<String>,
    pub limit: Option<u32>,
}

impl Default for SelectQuery {
    fn default() -> Self {
        Self {
            columns: "*".to_string(),
            order_desc: None,
            limit: None,
        }
    }
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order_desc = Some(column.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-string pairs in PostgREST syntax.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("select", self.columns.clone())];
        if let Some(column) = &self.order_desc {
            params.push(("order", format!("{column}.desc")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

// =============================================================================
// GoTrue
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PasswordCredentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SignUpRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl User {
    /// `full_name` from sign-up metadata, else the local part of the email.
    pub fn display_name(&self) -> Option<String> {
        self.user_metadata
            .get("full_name")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|e| e.split('@').next())
                    .map(str::to_string)
            })
    }
}

/// GoTrue returns a session when confirmation is disabled and a bare user
/// when the address still has to be confirmed.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(Session),
    User(User),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_params() {
        let query = SelectQuery::new().order_desc("created_at").limit(50);
        assert_eq!(
            query.params(),
            vec![
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
                ("limit", "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_sign_up_without_session_is_user() {
        let body = r#"{"id":"5f1c","email":"ana@example.com","user_metadata":{"full_name":"Ana"}}"#;
        let parsed: SignUpResponse = serde_json::from_str(body).unwrap();
        match parsed {
            SignUpResponse::User(user) => assert_eq!(user.display_name().as_deref(), Some("Ana")),
            SignUpResponse::Session(_) => panic!("expected pending user"),
        }
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = User {
            id: "1".into(),
            email: Some("loja.ofertas@example.com".into()),
            user_metadata: serde_json::Value::Null,
        };
        assert_eq!(user.display_name().as_deref(), Some("loja.ofertas"));
    }
}
