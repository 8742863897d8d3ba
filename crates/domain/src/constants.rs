//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Remote API
pub const DEFAULT_API_BASE_URL: &str = "https://console.getmia.live/api";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

// Ad-hoc meeting detection
pub const ADHOC_ID_PREFIX: &str = "adhoc-";
pub const SESSION_FLAG_PREFIX: &str = "mia_adhoc_";
pub const IDEMPOTENCY_KEY_PREFIX: &str = "mia-idem-";
pub const DEFAULT_ADHOC_DURATION_MINUTES: i64 = 60;
pub const DEFAULT_ADHOC_TITLE: &str = "Ad-Hoc Meeting";
pub const PAGE_TITLE_PREFIX: &str = "Mia - ";
pub const ADHOC_LOCATION: &str = "Ad-Hoc";
pub const ADHOC_DESCRIPTION: &str = "Detected on page";
pub const ADHOC_REQUEST_DESCRIPTION: &str = "Automatically detected ad-hoc meeting";

// Agent
pub const NO_SUMMARY_AVAILABLE: &str = "No summary available.";

// Local storage keys
pub const STORAGE_KEY_USER: &str = "user";
pub const STORAGE_KEY_QUICK_NOTE: &str = "quick_note";
pub const STORAGE_KEY_OVERLAY_OPEN: &str = "overlay_is_open";

// Keychain
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "live.getmia.extension";
pub const KEYCHAIN_ACCESS_TOKEN_ACCOUNT: &str = "access_token";
