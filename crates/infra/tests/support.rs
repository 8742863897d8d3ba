//! Shared fixtures for `mia-infra` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use mia_infra::{
    ApiClient, ApiClientConfig, CredentialStore, InMemoryCredentialStore, StoredTokenProvider,
};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-token";

/// API client pointed at `server`, authenticated through `credentials`.
pub fn api_client(server: &MockServer, credentials: Arc<dyn CredentialStore>) -> Arc<ApiClient> {
    let config = ApiClientConfig { base_url: server.uri(), ..Default::default() };
    let auth = Arc::new(StoredTokenProvider::new(credentials));
    Arc::new(ApiClient::new(config, auth).expect("api client should build"))
}

/// API client with [`TEST_TOKEN`] already stored.
pub fn signed_in_client(server: &MockServer) -> Arc<ApiClient> {
    api_client(server, Arc::new(InMemoryCredentialStore::with_token(TEST_TOKEN)))
}
