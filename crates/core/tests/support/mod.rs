//! Shared test helpers for `mia-core` integration tests.
//!
//! Lightweight in-memory implementations of the meeting list ports so the
//! service tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use mia_core::{AdHocMeetingStore, Clock, MeetingDirectory, SessionFlagStore};
use mia_domain::{
    AdHocMeetingRequest, Meeting, MeetingRecord, MeetingsResponse, MiaError, Result,
};
use parking_lot::Mutex;
use tokio::sync::Notify;

pub const MEET_ROOM: &str = "https://meet.google.com/abc-defg-hij";

/// 2024-05-01 12:00:00 UTC
pub fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn meeting(id: &str, start_offset_hours: i64) -> Meeting {
    let start = noon() + Duration::hours(start_offset_hours);
    Meeting::new(id, id.to_uppercase(), start, start + Duration::hours(1))
}

/// Clock frozen at a single instant.
#[derive(Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Session flag store with an atomic claim.
#[derive(Default)]
pub struct MemoryFlags {
    keys: Mutex<HashSet<String>>,
}

impl MemoryFlags {
    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().iter().cloned().collect()
    }
}

impl SessionFlagStore for MemoryFlags {
    fn has(&self, key: &str) -> bool {
        self.keys.lock().contains(key)
    }

    fn set(&self, key: &str) {
        self.keys.lock().insert(key.to_string());
    }

    fn claim(&self, key: &str) -> bool {
        self.keys.lock().insert(key.to_string())
    }
}

/// Directory returning a fixed listing, or an error when built with
/// [`StaticDirectory::failing`].
pub struct StaticDirectory {
    response: Option<MeetingsResponse>,
}

impl StaticDirectory {
    pub fn private(meetings: Vec<Meeting>) -> Self {
        Self {
            response: Some(MeetingsResponse { private_meetings: meetings, ..Default::default() }),
        }
    }

    pub fn with(response: MeetingsResponse) -> Self {
        Self { response: Some(response) }
    }

    pub fn failing() -> Self {
        Self { response: None }
    }
}

#[async_trait]
impl MeetingDirectory for StaticDirectory {
    async fn get_meetings(&self) -> Result<MeetingsResponse> {
        self.response.clone().ok_or_else(|| MiaError::Network("directory unavailable".into()))
    }
}

/// Store replying with a scripted result and recording every request.
pub struct RecordingStore {
    reply: Result<MeetingRecord>,
    calls: AtomicUsize,
    requests: Mutex<Vec<AdHocMeetingRequest>>,
    gate: Option<Arc<Notify>>,
}

impl RecordingStore {
    pub fn replying(record: MeetingRecord) -> Self {
        Self { reply: Ok(record), calls: AtomicUsize::new(0), requests: Mutex::default(), gate: None }
    }

    pub fn failing(error: MiaError) -> Self {
        Self { reply: Err(error), calls: AtomicUsize::new(0), requests: Mutex::default(), gate: None }
    }

    /// Hold every reply until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<AdHocMeetingRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl AdHocMeetingStore for RecordingStore {
    async fn create_ad_hoc_meeting(&self, request: &AdHocMeetingRequest) -> Result<MeetingRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.reply.clone()
    }
}
