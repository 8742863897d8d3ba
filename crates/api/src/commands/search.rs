//! Transcript search

use mia_domain::{MiaError, Result};
use serde_json::Value;

use crate::utils::command_helpers::execute_command;
use crate::AppContext;

/// Search one meeting's transcript. The backend's result shape is returned
/// as-is.
///
/// # Errors
/// Returns `MiaError::InvalidInput` for a blank query, otherwise the backend
/// error.
pub async fn smart_transcript_search(
    ctx: &AppContext,
    meeting_id: &str,
    query: &str,
) -> Result<Value> {
    execute_command("search::smart_transcript_search", || async {
        let query = query.trim();
        if query.is_empty() {
            return Err(MiaError::InvalidInput("search query is empty".into()));
        }
        ctx.meetings.smart_transcript_search(meeting_id, query).await.map_err(MiaError::from)
    })
    .await
}
