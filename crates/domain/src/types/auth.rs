//! Authentication payloads
//!
//! The backend issues a bearer token either from an email/password sign-in
//! or from the Google OAuth callback exchange.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Signed-in user as returned by the backend.
///
/// Only the commonly displayed fields are typed; the rest is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Name to greet the user with: name, then email, then a generic label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.email.as_deref().filter(|e| !e.is_empty()))
            .unwrap_or("there")
    }
}

/// `POST /auth/signin` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Token response shared by sign-in and the OAuth callback exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// `GET /auth/google?mode=login` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleAuthStart {
    pub auth_url: String,
    /// CSRF state echoed back as `X-OAuth-State` during the exchange.
    #[serde(default)]
    pub state: Option<String>,
}

/// Authorization code captured from the OAuth redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthCallback {
    pub code: String,
    #[serde(default)]
    pub state: Option<String>,
}
