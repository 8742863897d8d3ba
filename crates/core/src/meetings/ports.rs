//! Port interfaces for the meeting list
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mia_domain::{AdHocMeetingRequest, MeetingRecord, MeetingsResponse, Result};

/// Remote listing of the user's meetings
#[async_trait]
pub trait MeetingDirectory: Send + Sync {
    /// Fetch the partitioned meeting listing.
    async fn get_meetings(&self) -> Result<MeetingsResponse>;
}

/// Remote persistence for client-detected meetings
#[async_trait]
pub trait AdHocMeetingStore: Send + Sync {
    /// Persist an ad-hoc meeting. The backend assigns the identifier and may
    /// omit start/end/url in its reply.
    async fn create_ad_hoc_meeting(&self, request: &AdHocMeetingRequest) -> Result<MeetingRecord>;
}

/// Session-scoped marker store used to suppress duplicate ad-hoc creation.
///
/// Flags live for one browsing session and are never cleared by a reload of
/// the meeting list.
pub trait SessionFlagStore: Send + Sync {
    fn has(&self, key: &str) -> bool;

    fn set(&self, key: &str);

    /// Set `key` and report whether this call was the one that set it.
    ///
    /// The default is a plain check-then-set; stores shared across threads
    /// should override it with an atomic version.
    fn claim(&self, key: &str) -> bool {
        if self.has(key) {
            return false;
        }
        self.set(key);
        true
    }
}

/// Wall-clock source, injectable for tests
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
