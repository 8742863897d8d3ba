//! API authentication
//!
//! Email/password and Google sign-in against the Mia backend. The access
//! token lives in a [`CredentialStore`] (the OS keychain in production), the
//! signed-in user in the local store.

use std::sync::Arc;

use async_trait::async_trait;
use mia_domain::constants::{KEYCHAIN_ACCESS_TOKEN_ACCOUNT, STORAGE_KEY_USER};
use mia_domain::{AuthSession, GoogleAuthStart, MiaError, OAuthCallback, SignInRequest, User};
use parking_lot::RwLock;
use tracing::{debug, info, instrument};
use url::Url;

use super::client::ApiClient;
use super::errors::ApiError;
use crate::errors::InfraError;
use crate::storage::LocalStore;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Current access token, or `None` when signed out.
    async fn access_token(&self) -> Result<Option<String>, ApiError>;
}

/// Persistent storage for the access token
pub trait CredentialStore: Send + Sync {
    fn load_token(&self) -> Result<Option<String>, MiaError>;

    fn save_token(&self, token: &str) -> Result<(), MiaError>;

    /// Remove the token. Clearing an empty store succeeds.
    fn clear_token(&self) -> Result<(), MiaError>;
}

/// OS keychain backed credential store
#[derive(Debug, Clone)]
pub struct KeychainCredentialStore {
    service: String,
    account: String,
}

impl KeychainCredentialStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self { service: service.into(), account: KEYCHAIN_ACCESS_TOKEN_ACCOUNT.to_string() }
    }

    fn entry(&self) -> Result<keyring::Entry, MiaError> {
        keyring::Entry::new(&self.service, &self.account)
            .map_err(|err| InfraError::from(err).into())
    }
}

impl CredentialStore for KeychainCredentialStore {
    fn load_token(&self) -> Result<Option<String>, MiaError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    fn save_token(&self, token: &str) -> Result<(), MiaError> {
        self.entry()?.set_password(token).map_err(|err| InfraError::from(err).into())
    }

    fn clear_token(&self) -> Result<(), MiaError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }
}

/// Process-local credential store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl InMemoryCredentialStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: RwLock::new(Some(token.into())) }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load_token(&self) -> Result<Option<String>, MiaError> {
        Ok(self.token.read().clone())
    }

    fn save_token(&self, token: &str) -> Result<(), MiaError> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<(), MiaError> {
        *self.token.write() = None;
        Ok(())
    }
}

/// Serves whatever token the credential store currently holds.
pub struct StoredTokenProvider {
    credentials: Arc<dyn CredentialStore>,
}

impl StoredTokenProvider {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl AccessTokenProvider for StoredTokenProvider {
    async fn access_token(&self) -> Result<Option<String>, ApiError> {
        self.credentials
            .load_token()
            .map(|token| token.filter(|t| !t.is_empty()))
            .map_err(|e| ApiError::Auth(format!("Failed to read access token: {e}")))
    }
}

/// Pull `code` and `state` out of an OAuth redirect URL.
///
/// Only URLs that contain `code=` and either `/auth/callback` or
/// `getmia.live` count as redirects; anything else yields `None`.
pub fn parse_oauth_redirect(redirect_url: &str) -> Option<OAuthCallback> {
    if !redirect_url.contains("code=")
        || !(redirect_url.contains("/auth/callback") || redirect_url.contains("getmia.live"))
    {
        return None;
    }

    let url = Url::parse(redirect_url).ok()?;
    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" if code.is_none() => code = Some(value.into_owned()),
            "state" if state.is_none() => state = Some(value.into_owned()),
            _ => {}
        }
    }

    Some(OAuthCallback { code: code.filter(|c| !c.is_empty())?, state })
}

/// API authentication service with keychain integration
pub struct ApiAuthService {
    client: Arc<ApiClient>,
    credentials: Arc<dyn CredentialStore>,
    local: Arc<LocalStore>,
}

impl ApiAuthService {
    pub fn new(
        client: Arc<ApiClient>,
        credentials: Arc<dyn CredentialStore>,
        local: Arc<LocalStore>,
    ) -> Self {
        Self { client, credentials, local }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the backend's error (e.g. invalid credentials) or a storage
    /// error if the session cannot be persisted.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let request = SignInRequest { email: email.to_string(), password: password.to_string() };
        let session: AuthSession = self.client.post("/auth/signin", &request).await?;
        self.persist_session(&session)?;
        info!("signed in with email");
        Ok(session)
    }

    /// Start the Google flow. The caller opens `auth_url` and later passes the
    /// redirect back to [`Self::complete_google_login`] together with
    /// `state`.
    #[instrument(skip(self))]
    pub async fn start_google_login(&self) -> Result<GoogleAuthStart, ApiError> {
        info!("Starting Google authentication flow");
        self.client.get("/auth/google?mode=login").await
    }

    /// Exchange the redirect's code for a session.
    ///
    /// `initial_state` is the state returned by
    /// [`Self::start_google_login`]; it is sent as `X-OAuth-State` so the
    /// backend can verify the round trip.
    #[instrument(skip(self, callback, initial_state))]
    pub async fn complete_google_login(
        &self,
        callback: &OAuthCallback,
        initial_state: Option<&str>,
    ) -> Result<AuthSession, ApiError> {
        debug!("Completing Google authentication");

        let path = format!(
            "/auth/google/callback?code={}&state={}",
            urlencoding::encode(&callback.code),
            urlencoding::encode(callback.state.as_deref().unwrap_or_default()),
        );
        let headers: Vec<(&str, &str)> =
            initial_state.map(|state| ("X-OAuth-State", state)).into_iter().collect();

        let session: AuthSession = self.client.get_with_headers(&path, &headers).await?;
        self.persist_session(&session)?;
        info!("Google authentication successful");
        Ok(session)
    }

    /// Whether an access token is stored
    pub fn is_authenticated(&self) -> bool {
        matches!(self.credentials.load_token(), Ok(Some(token)) if !token.is_empty())
    }

    /// The signed-in user, if known
    pub fn current_user(&self) -> Option<User> {
        self.local.get(STORAGE_KEY_USER)
    }

    /// Forget the token and the user.
    ///
    /// # Errors
    ///
    /// Returns error if keychain or local store deletion fails
    pub fn logout(&self) -> Result<(), ApiError> {
        self.credentials.clear_token().map_err(|e| ApiError::Auth(format!("Failed to logout: {e}")))?;
        self.local.remove(STORAGE_KEY_USER).map_err(ApiError::from)?;
        info!("signed out");
        Ok(())
    }

    fn persist_session(&self, session: &AuthSession) -> Result<(), ApiError> {
        if session.access_token.is_empty() {
            return Err(ApiError::Auth("backend returned an empty access token".into()));
        }
        self.credentials.save_token(&session.access_token).map_err(ApiError::from)?;
        let stored = match &session.user {
            Some(user) => self.local.set(STORAGE_KEY_USER, user),
            None => self.local.remove(STORAGE_KEY_USER),
        };
        stored.map_err(ApiError::from)
    }
}
