//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ADHOC_DURATION_MINUTES, DEFAULT_ADHOC_TITLE, DEFAULT_API_BASE_URL,
    DEFAULT_API_TIMEOUT_SECS, DEFAULT_KEYCHAIN_SERVICE, PAGE_TITLE_PREFIX,
};
use crate::types::RelevancePolicy;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub adhoc: AdHocConfig,
    pub meetings: MeetingsConfig,
    pub storage: StorageConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_API_BASE_URL.to_string(), timeout_seconds: DEFAULT_API_TIMEOUT_SECS }
    }
}

/// Ad-hoc meeting detection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdHocConfig {
    /// Turning this off makes every load a plain directory listing.
    pub enabled: bool,
    pub duration_minutes: i64,
    pub fallback_title: String,
    /// Product prefix stripped from the hosting page's title.
    pub title_prefix: String,
}

impl Default for AdHocConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_minutes: DEFAULT_ADHOC_DURATION_MINUTES,
            fallback_title: DEFAULT_ADHOC_TITLE.to_string(),
            title_prefix: PAGE_TITLE_PREFIX.to_string(),
        }
    }
}

/// Meeting list configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingsConfig {
    pub relevance_policy: RelevancePolicy,
}

/// Local persistence configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file backing the local key/value store.
    pub local_store_path: String,
    pub keychain_service: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_store_path: "mia-storage.json".to_string(),
            keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
        }
    }
}
