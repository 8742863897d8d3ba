//! Shared fixtures for `mia-app` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use mia_domain::Config;
use mia_infra::{CredentialStore, InMemoryCredentialStore};
use mia_lib::AppContext;
use tempfile::TempDir;
use wiremock::MockServer;

pub const MEET_ROOM: &str = "https://meet.google.com/abc-defg-hij";

/// App context against a mock backend, with its local store in a temp dir.
pub struct TestApp {
    pub server: MockServer,
    pub ctx: Arc<AppContext>,
    pub credentials: Arc<InMemoryCredentialStore>,
    /// Keep temporary directory alive for the lifetime of the app.
    pub dir: TempDir,
}

impl TestApp {
    pub async fn signed_in() -> Self {
        Self::start(InMemoryCredentialStore::with_token("test-token")).await
    }

    pub async fn signed_out() -> Self {
        Self::start(InMemoryCredentialStore::default()).await
    }

    async fn start(credentials: InMemoryCredentialStore) -> Self {
        let server = MockServer::start().await;
        let dir = TempDir::new().expect("temp dir");
        let config = test_config(&server, &dir);
        let credentials = Arc::new(credentials);
        let store: Arc<dyn CredentialStore> = credentials.clone();
        let ctx = AppContext::new_with_credentials(config, store).expect("context should build");

        Self { server, ctx: Arc::new(ctx), credentials, dir }
    }
}

pub fn test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.api.timeout_seconds = 5;
    config.storage.local_store_path =
        dir.path().join("mia-storage.json").to_string_lossy().into_owned();
    config
}
