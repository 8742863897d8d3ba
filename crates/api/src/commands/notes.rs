//! Meeting notes, the quick note and the overlay toggle

use mia_domain::constants::{STORAGE_KEY_OVERLAY_OPEN, STORAGE_KEY_QUICK_NOTE};
use mia_domain::{MiaError, Result};

use crate::utils::command_helpers::execute_command;
use crate::AppContext;

/// # Errors
/// Returns the backend error.
pub async fn get_meeting_note(ctx: &AppContext, meeting_id: &str) -> Result<String> {
    execute_command("notes::get_meeting_note", || async {
        let note = ctx.meetings.get_meeting_note(meeting_id).await.map_err(MiaError::from)?;
        Ok::<_, MiaError>(note.content)
    })
    .await
}

/// # Errors
/// Returns the backend error.
pub async fn save_meeting_note(ctx: &AppContext, meeting_id: &str, content: &str) -> Result<()> {
    execute_command("notes::save_meeting_note", || async {
        ctx.meetings.save_meeting_note(meeting_id, content).await.map_err(MiaError::from)
    })
    .await
}

/// # Errors
/// Returns the backend error.
pub async fn delete_meeting_note(ctx: &AppContext, meeting_id: &str) -> Result<()> {
    execute_command("notes::delete_meeting_note", || async {
        ctx.meetings.delete_meeting_note(meeting_id).await.map_err(MiaError::from)
    })
    .await
}

/// The quick note, empty when none was saved.
pub fn get_quick_note(ctx: &AppContext) -> String {
    ctx.local.get(STORAGE_KEY_QUICK_NOTE).unwrap_or_default()
}

/// # Errors
/// Returns `MiaError::Storage` if the local store cannot be written.
pub fn save_quick_note(ctx: &AppContext, content: &str) -> Result<()> {
    ctx.local.set(STORAGE_KEY_QUICK_NOTE, content)
}

pub fn is_overlay_open(ctx: &AppContext) -> bool {
    ctx.local.get(STORAGE_KEY_OVERLAY_OPEN).unwrap_or(false)
}

/// Flip the overlay open flag and return the new value.
///
/// # Errors
/// Returns `MiaError::Storage` if the local store cannot be written.
pub fn toggle_overlay(ctx: &AppContext) -> Result<bool> {
    let open = !is_overlay_open(ctx);
    ctx.local.set(STORAGE_KEY_OVERLAY_OPEN, &open)?;
    Ok(open)
}
