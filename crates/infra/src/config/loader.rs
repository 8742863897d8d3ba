//! Configuration loader
//!
//! Loads application configuration from a file and environment variables.
//!
//! ## Loading Strategy
//! 1. Load `.env` from the working directory (if present) via `dotenvy`
//! 2. Read a config file if one is found (probed paths, JSON or TOML),
//!    otherwise start from defaults
//! 3. Apply environment variable overrides on top
//!
//! ## Environment Variables
//! - `MIA_API_BASE_URL`: Backend base URL
//! - `MIA_API_TIMEOUT`: Request timeout in seconds
//! - `MIA_RELEVANCE_POLICY`: `attendable` or `upcoming`
//! - `MIA_ADHOC_ENABLED`: Whether ad-hoc detection runs (true/false)
//! - `MIA_ADHOC_DURATION_MINUTES`: Length of a detected meeting
//! - `MIA_LOCAL_STORE_PATH`: JSON file for the local key/value store
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./mia.{toml,json}` then `./config.{toml,json}` (current working
//!    directory)
//! 2. The same names in the parent and grandparent directories
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};

use mia_domain::{Config, MiaError, RelevancePolicy, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["mia.toml", "mia.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `MiaError::Config` if a config file exists but is invalid, or an
/// environment override has an invalid value.
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "Ignoring unreadable .env file"),
    }

    let base = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    let config = apply_env_overrides(base)?;
    tracing::info!(base_url = %config.api.base_url, "Configuration loaded");
    Ok(config)
}

/// Load configuration from environment variables over the defaults
///
/// # Errors
/// Returns `MiaError::Config` if a variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    apply_env_overrides(Config::default())
}

/// Apply `MIA_*` environment variables on top of `config`
///
/// # Errors
/// Returns `MiaError::Config` if a variable has an invalid value.
pub fn apply_env_overrides(mut config: Config) -> Result<Config> {
    if let Some(base_url) = env_opt("MIA_API_BASE_URL") {
        config.api.base_url = base_url;
    }
    if let Some(timeout) = env_opt("MIA_API_TIMEOUT") {
        config.api.timeout_seconds = timeout
            .parse::<u64>()
            .map_err(|e| MiaError::Config(format!("Invalid API timeout: {e}")))?;
    }
    if let Some(policy) = env_opt("MIA_RELEVANCE_POLICY") {
        config.meetings.relevance_policy = policy
            .parse::<RelevancePolicy>()
            .map_err(|e| MiaError::Config(format!("Invalid relevance policy: {e}")))?;
    }
    config.adhoc.enabled = env_bool("MIA_ADHOC_ENABLED", config.adhoc.enabled);
    if let Some(minutes) = env_opt("MIA_ADHOC_DURATION_MINUTES") {
        let minutes = minutes
            .parse::<i64>()
            .map_err(|e| MiaError::Config(format!("Invalid ad-hoc duration: {e}")))?;
        if minutes <= 0 {
            return Err(MiaError::Config(format!("Ad-hoc duration must be positive, got {minutes}")));
        }
        config.adhoc.duration_minutes = minutes;
    }
    if let Some(path) = env_opt("MIA_LOCAL_STORE_PATH") {
        config.storage.local_store_path = path;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `MiaError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(MiaError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            MiaError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| MiaError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| MiaError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| MiaError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(MiaError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    env_opt(key)
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::TempDir;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 6] = [
        "MIA_API_BASE_URL",
        "MIA_API_TIMEOUT",
        "MIA_RELEVANCE_POLICY",
        "MIA_ADHOC_ENABLED",
        "MIA_ADHOC_DURATION_MINUTES",
        "MIA_LOCAL_STORE_PATH",
    ];

    fn clear_env() {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        for value in ["1", "true", "yes", "on", "TRUE"] {
            std::env::set_var("MIA_TEST_BOOL", value);
            assert!(env_bool("MIA_TEST_BOOL", false), "{value}");
        }
        for value in ["0", "false", "no", "off"] {
            std::env::set_var("MIA_TEST_BOOL", value);
            assert!(!env_bool("MIA_TEST_BOOL", true), "{value}");
        }

        std::env::remove_var("MIA_TEST_BOOL");
        assert!(env_bool("MIA_TEST_BOOL", true));
        assert!(!env_bool("MIA_TEST_BOOL", false));
    }

    #[test]
    fn test_env_overrides_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("MIA_API_BASE_URL", "http://localhost:8080/api");
        std::env::set_var("MIA_API_TIMEOUT", "5");
        std::env::set_var("MIA_RELEVANCE_POLICY", "Upcoming");
        std::env::set_var("MIA_ADHOC_ENABLED", "off");
        std::env::set_var("MIA_ADHOC_DURATION_MINUTES", "45");
        std::env::set_var("MIA_LOCAL_STORE_PATH", "/tmp/mia.json");

        let config = load_from_env().unwrap();
        clear_env();

        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.timeout_seconds, 5);
        assert_eq!(config.meetings.relevance_policy, RelevancePolicy::Upcoming);
        assert!(!config.adhoc.enabled);
        assert_eq!(config.adhoc.duration_minutes, 45);
        assert_eq!(config.storage.local_store_path, "/tmp/mia.json");
    }

    #[test]
    fn test_env_without_overrides_is_default() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        assert_eq!(load_from_env().unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_env_values_are_config_errors() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        for (var, value) in [
            ("MIA_API_TIMEOUT", "soon"),
            ("MIA_RELEVANCE_POLICY", "everything"),
            ("MIA_ADHOC_DURATION_MINUTES", "0"),
        ] {
            clear_env();
            std::env::set_var(var, value);
            let result = load_from_env();
            assert!(matches!(result, Err(MiaError::Config(_))), "{var}={value}");
        }
        clear_env();
    }

    #[test]
    fn test_load_from_file_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mia.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://staging.getmia.live/api"

[adhoc]
duration_minutes = 30

[meetings]
relevance_policy = "upcoming"
"#,
        )
        .unwrap();

        let config = load_from_file(Some(path)).unwrap();
        assert_eq!(config.api.base_url, "https://staging.getmia.live/api");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.adhoc.duration_minutes, 30);
        assert!(config.adhoc.enabled);
        assert_eq!(config.meetings.relevance_policy, RelevancePolicy::Upcoming);
    }

    #[test]
    fn test_load_from_file_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "storage": { "local_store_path": "state.json" } }"#).unwrap();

        let config = load_from_file(Some(path)).unwrap();
        assert_eq!(config.storage.local_store_path, "state.json");
        assert_eq!(config.storage.keychain_service, "live.getmia.extension");
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/mia.toml")));
        assert!(matches!(result, Err(MiaError::Config(_))));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mia.json");
        std::fs::write(&path, r#"{ "this is": "not valid json" "#).unwrap();

        assert!(load_from_file(Some(path)).is_err());
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
