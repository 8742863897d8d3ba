//! Ad-hoc meeting detection
//!
//! When the user opens the meeting list on a call page that the directory
//! does not know about, an optimistic meeting is synthesized for it and
//! persisted in the background. The decision runs in a fixed order:
//!
//! 1. classify the page URL as a meeting room (or stop),
//! 2. stop if any directory meeting's join URL is part of the page URL,
//! 3. stop if this room's session flag is already set,
//! 4. set the session flag, then build the optimistic entry.
//!
//! Step 4 sets the flag before anything asynchronous happens, so a rapid
//! second invocation in the same session sees it and backs off.

use std::sync::Arc;

use chrono::Duration;
use mia_domain::constants::{
    ADHOC_DESCRIPTION, ADHOC_ID_PREFIX, ADHOC_LOCATION, ADHOC_REQUEST_DESCRIPTION,
};
use mia_domain::{clean_page_title, AdHocConfig, AdHocMeetingRequest, Meeting, SyncStatus};
use tracing::{debug, info};

use super::ports::{Clock, SessionFlagStore};
use super::room::{classify_room_url, MeetingRoom};

/// Ambient inputs read from the hosting page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub url: String,
    /// The page's document title.
    pub title: String,
}

impl PageContext {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self { url: url.into(), title: title.into() }
    }
}

/// Tunables for ad-hoc creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdHocSettings {
    pub enabled: bool,
    pub duration: Duration,
    pub fallback_title: String,
    pub title_prefix: String,
}

impl Default for AdHocSettings {
    fn default() -> Self {
        Self::from(&AdHocConfig::default())
    }
}

impl From<&AdHocConfig> for AdHocSettings {
    fn from(config: &AdHocConfig) -> Self {
        Self {
            enabled: config.enabled,
            duration: Duration::minutes(config.duration_minutes.max(1)),
            fallback_title: config.fallback_title.clone(),
            title_prefix: config.title_prefix.clone(),
        }
    }
}

/// Everything needed to show and persist a newly detected meeting.
#[derive(Debug, Clone, PartialEq)]
pub struct AdHocCandidate {
    pub room: MeetingRoom,
    /// Optimistic entry, tagged [`SyncStatus::Saving`].
    pub meeting: Meeting,
    pub request: AdHocMeetingRequest,
}

/// Outcome of one detector run.
#[derive(Debug, Clone, PartialEq)]
pub enum AdHocDecision {
    Disabled,
    /// The page is not an active meeting room.
    NotMeetingRoom,
    /// A directory meeting already tracks this page.
    KnownMeeting { meeting_id: String },
    /// This session already created (or is creating) an entry for the room.
    AlreadyProcessed { flag_key: String },
    Create(Box<AdHocCandidate>),
}

/// Decides whether the current page needs an ad-hoc meeting.
pub struct AdHocDetector {
    flags: Arc<dyn SessionFlagStore>,
    clock: Arc<dyn Clock>,
    settings: AdHocSettings,
}

impl AdHocDetector {
    pub fn new(
        flags: Arc<dyn SessionFlagStore>,
        clock: Arc<dyn Clock>,
        settings: AdHocSettings,
    ) -> Self {
        Self { flags, clock, settings }
    }

    /// Run detection for `page` against the full merged `directory`.
    ///
    /// `directory` must be unfiltered: a meeting that already ended still
    /// counts as tracking its page.
    pub fn detect(&self, page: &PageContext, directory: &[Meeting]) -> AdHocDecision {
        if !self.settings.enabled {
            return AdHocDecision::Disabled;
        }

        let Some(room) = classify_room_url(&page.url) else {
            return AdHocDecision::NotMeetingRoom;
        };

        if let Some(known) = directory.iter().find(|m| m.matches_page(&page.url)) {
            debug!(meeting_id = %known.id, "page already tracked by directory meeting");
            return AdHocDecision::KnownMeeting { meeting_id: known.id.clone() };
        }

        let flag_key = room.session_flag_key();
        if !self.flags.claim(&flag_key) {
            debug!(flag_key = %flag_key, "ad-hoc meeting already processed this session");
            return AdHocDecision::AlreadyProcessed { flag_key };
        }

        let candidate = self.build_candidate(room, page);
        info!(
            meeting_id = %candidate.meeting.id,
            platform = %candidate.room.platform(),
            "detected ad-hoc meeting"
        );
        AdHocDecision::Create(Box::new(candidate))
    }

    fn build_candidate(&self, room: MeetingRoom, page: &PageContext) -> AdHocCandidate {
        let start = self.clock.now();
        let end = start + self.settings.duration;
        let title =
            clean_page_title(&page.title, &self.settings.title_prefix, &self.settings.fallback_title);

        let mut meeting = Meeting::new(
            format!("{ADHOC_ID_PREFIX}{}", start.timestamp_millis()),
            title.clone(),
            start,
            end,
        )
        .with_meeting_url(page.url.clone());
        meeting.location = Some(ADHOC_LOCATION.to_string());
        meeting.description = Some(ADHOC_DESCRIPTION.to_string());
        meeting.sync_status = Some(SyncStatus::Saving);

        let request = AdHocMeetingRequest {
            title,
            meeting_url: page.url.clone(),
            location: page.url.clone(),
            start_time: start,
            end_time: end,
            description: ADHOC_REQUEST_DESCRIPTION.to_string(),
            idempotency_key: Some(room.idempotency_key(start.date_naive())),
        };

        AdHocCandidate { room, meeting, request }
    }
}
