use std::time::Duration;

use mia_domain::{MiaError, Result};
use tracing::{info, warn};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn";

/// Install the global `tracing` subscriber.
///
/// The filter comes from `MIA_LOG`, then `RUST_LOG`, then a default of
/// `info`. `MIA_LOG_FORMAT=json` switches from the human-readable layout to
/// one JSON object per event.
///
/// # Errors
/// Returns `MiaError::Internal` if a global subscriber is already installed.
pub fn init_tracing() -> Result<()> {
    let filter = std::env::var("MIA_LOG")
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));
    let format = std::env::var("MIA_LOG_FORMAT").unwrap_or_else(|_| "pretty".into());

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().flatten_event(true).with_target(true).with_current_span(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    installed.map_err(|e| MiaError::Internal(format!("failed to install tracing subscriber: {e}")))?;

    info!(format = %format, "logging initialized");
    Ok(())
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"meetings::load"`).
/// * `elapsed` - Duration the command execution took.
/// * `error` - The failure label from [`error_label`], if the command failed.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&'static str>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(error_type) => warn!(command, duration_ms, error_type, "command_execution_failure"),
    }
}

/// Convert a `MiaError` into a stable label suitable for logging.
#[inline]
pub const fn error_label(error: &MiaError) -> &'static str {
    match error {
        MiaError::Config(_) => "config",
        MiaError::Network(_) => "network",
        MiaError::Auth(_) => "auth",
        MiaError::Storage(_) => "storage",
        MiaError::NotFound(_) => "not_found",
        MiaError::InvalidInput(_) => "invalid_input",
        MiaError::Internal(_) => "internal",
    }
}
