//! Meeting, agent, notes and search endpoints
//!
//! [`MeetingApi`] also implements the core ports for the directory listing
//! and ad-hoc persistence.

use std::sync::Arc;

use async_trait::async_trait;
use mia_core::{AdHocMeetingStore, MeetingDirectory};
use mia_domain::{
    AdHocMeetingRequest, CatchMeUpResponse, MeetingNote, MeetingRecord, MeetingsResponse,
    MiaError, SmartSearchRequest,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use urlencoding::encode;

use super::client::ApiClient;
use super::errors::ApiError;

#[derive(Debug, Serialize)]
struct CatchMeUpRequest<'a> {
    meeting_id: &'a str,
}

/// Meeting-related API commands
pub struct MeetingApi {
    client: Arc<ApiClient>,
}

impl MeetingApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    // === Directory ===

    /// Fetch the partitioned meeting listing
    #[instrument(skip(self))]
    pub async fn list_meetings(&self) -> Result<MeetingsResponse, ApiError> {
        let response: MeetingsResponse = self.client.get("/meetings").await?;
        debug!(
            joined = response.joined_team_meetings.len(),
            missed = response.missed_team_meetings.len(),
            private = response.private_meetings.len(),
            "Meetings fetched"
        );
        Ok(response)
    }

    /// Persist a client-detected meeting.
    ///
    /// The idempotency key, when present, is sent as `Idempotency-Key`. A
    /// success without a body yields an empty record, which reconciliation
    /// fills from the optimistic entry.
    #[instrument(skip(self, request), fields(meeting_url = %request.meeting_url))]
    pub async fn create_meeting(
        &self,
        request: &AdHocMeetingRequest,
    ) -> Result<MeetingRecord, ApiError> {
        let headers: Vec<(&str, &str)> = request
            .idempotency_key
            .as_deref()
            .map(|key| ("Idempotency-Key", key))
            .into_iter()
            .collect();

        let record: Option<MeetingRecord> =
            self.client.post_with_headers("/meetings", request, &headers).await?;
        let record = record.unwrap_or_default();
        debug!(meeting_id = %record.id, "Meeting created");
        Ok(record)
    }

    // === Agent ===

    /// Ask the recording bot to join a meeting
    #[instrument(skip(self), fields(meeting_id = %meeting_id))]
    pub async fn join_meeting_with_agent(&self, meeting_id: &str) -> Result<Value, ApiError> {
        let path = format!("/meetings/{}/join-agent", encode(meeting_id));
        self.client.post(&path, &json!({})).await
    }

    /// Summary of the meeting so far
    #[instrument(skip(self), fields(meeting_id = %meeting_id))]
    pub async fn catch_me_up(&self, meeting_id: &str) -> Result<CatchMeUpResponse, ApiError> {
        self.client.post("/agent/catch-me-up", &CatchMeUpRequest { meeting_id }).await
    }

    /// Search a meeting's transcript. The response shape belongs to the
    /// backend and is passed through untouched.
    #[instrument(skip(self, query), fields(meeting_id = %meeting_id))]
    pub async fn smart_transcript_search(
        &self,
        meeting_id: &str,
        query: &str,
    ) -> Result<Value, ApiError> {
        let request =
            SmartSearchRequest { meeting_id: meeting_id.to_string(), query: query.to_string() };
        self.client.post("/search/smart", &request).await
    }

    // === Notes ===

    #[instrument(skip(self), fields(meeting_id = %meeting_id))]
    pub async fn get_meeting_note(&self, meeting_id: &str) -> Result<MeetingNote, ApiError> {
        let path = format!("/meetings/{}/notes", encode(meeting_id));
        let note: Option<MeetingNote> = self.client.get(&path).await?;
        Ok(note.unwrap_or_default())
    }

    #[instrument(skip(self, content), fields(meeting_id = %meeting_id))]
    pub async fn save_meeting_note(&self, meeting_id: &str, content: &str) -> Result<(), ApiError> {
        let path = format!("/meetings/{}/notes", encode(meeting_id));
        let note = MeetingNote { content: content.to_string() };
        let _: Value = self.client.post(&path, &note).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(meeting_id = %meeting_id))]
    pub async fn delete_meeting_note(&self, meeting_id: &str) -> Result<(), ApiError> {
        let path = format!("/meetings/{}/notes", encode(meeting_id));
        self.client.delete(&path).await
    }
}

#[async_trait]
impl MeetingDirectory for MeetingApi {
    async fn get_meetings(&self) -> mia_domain::Result<MeetingsResponse> {
        self.list_meetings().await.map_err(MiaError::from)
    }
}

#[async_trait]
impl AdHocMeetingStore for MeetingApi {
    async fn create_ad_hoc_meeting(
        &self,
        request: &AdHocMeetingRequest,
    ) -> mia_domain::Result<MeetingRecord> {
        self.create_meeting(request).await.map_err(MiaError::from)
    }
}
