//! Application context - dependency injection container

use std::sync::Arc;

use mia_core::{AdHocSettings, MeetingListService, SystemClock};
use mia_domain::{Config, MiaError, Result};
use mia_infra::{
    ApiAuthService, ApiClient, ApiClientConfig, CredentialStore, InMemorySessionFlagStore,
    KeychainCredentialStore, LocalStore, MeetingApi, StoredTokenProvider,
};
use tracing::info;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub api_client: Arc<ApiClient>,
    /// Directory, ad-hoc persistence, agent, notes and search endpoints.
    pub meetings: Arc<MeetingApi>,
    pub meeting_list: Arc<MeetingListService>,
    pub auth: Arc<ApiAuthService>,
    pub local: Arc<LocalStore>,
    /// Lives as long as the context: one context per browsing session.
    pub session_flags: Arc<InMemorySessionFlagStore>,
}

impl AppContext {
    /// Load configuration and wire services, keeping the access token in the
    /// OS keychain.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or the local store
    /// cannot be opened.
    pub fn new() -> Result<Self> {
        let config = mia_infra::config::load()?;
        Self::new_with_config(config)
    }

    /// Wire services from an explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the local store cannot be opened or the HTTP
    /// client cannot be built.
    pub fn new_with_config(config: Config) -> Result<Self> {
        let credentials = Arc::new(KeychainCredentialStore::new(&config.storage.keychain_service));
        Self::new_with_credentials(config, credentials)
    }

    /// Wire services with a caller-supplied credential store.
    ///
    /// # Errors
    /// Returns an error if the local store cannot be opened or the HTTP
    /// client cannot be built.
    pub fn new_with_credentials(
        config: Config,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let local = Arc::new(LocalStore::open(&config.storage.local_store_path)?);

        let token_provider = Arc::new(StoredTokenProvider::new(credentials.clone()));
        let api_client = Arc::new(
            ApiClient::new(ApiClientConfig::from(&config.api), token_provider)
                .map_err(MiaError::from)?,
        );
        let meetings = Arc::new(MeetingApi::new(api_client.clone()));
        let auth = Arc::new(ApiAuthService::new(api_client.clone(), credentials, local.clone()));
        let session_flags = Arc::new(InMemorySessionFlagStore::new());

        let meeting_list = Arc::new(
            MeetingListService::new(
                meetings.clone(),
                meetings.clone(),
                session_flags.clone(),
                Arc::new(SystemClock),
            )
            .with_adhoc_settings(AdHocSettings::from(&config.adhoc))
            .with_relevance_policy(config.meetings.relevance_policy),
        );

        info!(
            base_url = %api_client.base_url(),
            local_store = %local.path().display(),
            relevance_policy = %config.meetings.relevance_policy,
            adhoc_enabled = config.adhoc.enabled,
            "application context ready"
        );

        Ok(Self { config, api_client, meetings, meeting_list, auth, local, session_flags })
    }
}
