//! Command execution helpers
//!
//! Every command runs through [`execute_command`] so timing and outcome are
//! logged the same way.

use std::future::Future;
use std::time::Instant;

use mia_domain::Result as DomainResult;

use crate::utils::logging::{error_label, log_command_execution};

/// Execute a command, logging its duration and outcome.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn catch_me_up(ctx: &AppContext, meeting_id: &str) -> Result<String> {
///     execute_command("agent::catch_me_up", || async {
///         let summary = ctx.meetings.catch_me_up(meeting_id).await?;
///         Ok(summary.display_text().to_string())
///     })
///     .await
/// }
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();
    let result = command_fn().await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().err().map(error_label));
    result
}

/// Execute a command with String error conversion
///
/// For hosts that can only carry a message across their boundary.
pub async fn execute_with_string_error<F, Fut, T>(
    command_name: &str,
    command_fn: F,
) -> Result<T, String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    execute_command(command_name, command_fn).await.map_err(|e| e.to_string())
}
