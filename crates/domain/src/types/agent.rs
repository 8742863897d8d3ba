//! Bot, summary, notes and transcript search payloads

use serde::{Deserialize, Serialize};

use crate::constants::NO_SUMMARY_AVAILABLE;

/// `POST /agent/catch-me-up` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchMeUpResponse {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CatchMeUpResponse {
    /// Text shown to the user: summary, else message, else a placeholder.
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.summary
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.message.as_deref().filter(|m| !m.is_empty()))
            .unwrap_or(NO_SUMMARY_AVAILABLE)
    }
}

/// Personal note attached to a meeting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingNote {
    #[serde(default)]
    pub content: String,
}

/// `POST /search/smart` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmartSearchRequest {
    pub meeting_id: String,
    pub query: String,
}
