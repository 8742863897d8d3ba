//! Meeting types shared by the directory, the ad-hoc detector and the API
//!
//! A [`Meeting`] always carries well-formed start/end timestamps: malformed
//! or missing values from the backend are coerced to the current instant on
//! deserialization. A [`MeetingRecord`] is the backend's reply to a create
//! call, where start/end/url may legitimately be absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants::ADHOC_ID_PREFIX;
use crate::impl_domain_status_conversions;
use crate::utils::timestamp::{lenient, lenient_option};

/// Recording bot lifecycle as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotStatus {
    Joining,
    Joined,
    Left,
    Failed,
    /// Any value this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl_domain_status_conversions!(BotStatus {
    Joining => "joining",
    Joined => "joined",
    Left => "left",
    Failed => "failed",
    Unknown => "unknown",
});

impl BotStatus {
    /// The bot is on its way into, or already inside, the call.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Joining | Self::Joined)
    }
}

/// Reconciliation state of a client-synthesized meeting.
///
/// Backend-sourced meetings never carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Saving,
    Saved,
    Failed,
}

impl_domain_status_conversions!(SyncStatus {
    Saving => "saving",
    Saved => "saved",
    Failed => "failed",
});

/// Which directory meetings are worth showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevancePolicy {
    /// Only meetings whose end time is still ahead.
    Upcoming,
    /// Upcoming meetings, plus ended ones whose bot is active or whose call
    /// page is the one currently open.
    #[default]
    Attendable,
}

impl_domain_status_conversions!(RelevancePolicy {
    Upcoming => "upcoming",
    Attendable => "attendable",
});

/// Meeting attendee
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// A meeting as displayed in the meeting list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default = "chrono::Utc::now", with = "lenient")]
    pub start_time: DateTime<Utc>,
    #[serde(default = "chrono::Utc::now", with = "lenient")]
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<Attendee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_status: Option<BotStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_bot_enabled: Option<bool>,
    /// Client-side reconciliation tag, serialized as `_status`.
    #[serde(rename = "_status", default, skip_serializing_if = "Option::is_none")]
    pub sync_status: Option<SyncStatus>,
}

impl Meeting {
    /// Minimal meeting with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_time,
            end_time,
            meeting_url: None,
            description: None,
            location: None,
            attendees: Vec::new(),
            organizer_email: None,
            organizer_name: None,
            summary: None,
            bot_status: None,
            auto_bot_enabled: None,
            sync_status: None,
        }
    }

    /// Builder-style setter for the join URL.
    #[must_use]
    pub fn with_meeting_url(mut self, url: impl Into<String>) -> Self {
        self.meeting_url = Some(url.into());
        self
    }

    /// Builder-style setter for the bot status.
    #[must_use]
    pub const fn with_bot_status(mut self, status: BotStatus) -> Self {
        self.bot_status = Some(status);
        self
    }

    /// Whether this entry was synthesized on the client.
    #[must_use]
    pub fn is_ad_hoc(&self) -> bool {
        self.id.starts_with(ADHOC_ID_PREFIX)
    }

    #[must_use]
    pub fn is_bot_active(&self) -> bool {
        self.bot_status.is_some_and(BotStatus::is_active)
    }

    #[must_use]
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.end_time <= now
    }

    /// True when this meeting's join URL is a non-empty substring of
    /// `page_url`.
    #[must_use]
    pub fn matches_page(&self, page_url: &str) -> bool {
        self.meeting_url.as_deref().is_some_and(|url| !url.is_empty() && page_url.contains(url))
    }

    /// Merge the backend's record over this optimistic entry.
    ///
    /// Backend values win. `start_time`, `end_time`, `meeting_url`, `title`
    /// and an empty `id` fall back to this entry's values. The result is
    /// tagged [`SyncStatus::Saved`].
    #[must_use]
    pub fn reconciled_with(&self, record: MeetingRecord) -> Self {
        let id = if record.id.is_empty() { self.id.clone() } else { record.id };

        Self {
            id,
            title: record.title.filter(|t| !t.is_empty()).unwrap_or_else(|| self.title.clone()),
            start_time: record.start_time.unwrap_or(self.start_time),
            end_time: record.end_time.unwrap_or(self.end_time),
            meeting_url: record
                .meeting_url
                .filter(|url| !url.is_empty())
                .or_else(|| self.meeting_url.clone()),
            description: record.description,
            location: record.location,
            attendees: record.attendees,
            organizer_email: record.organizer_email,
            organizer_name: record.organizer_name,
            summary: record.summary,
            bot_status: record.bot_status,
            auto_bot_enabled: record.auto_bot_enabled,
            sync_status: Some(SyncStatus::Saved),
        }
    }
}

/// The backend's reply to a meeting create call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, with = "lenient_option")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "lenient_option")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub meeting_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attendees: Vec<Attendee>,
    #[serde(default)]
    pub organizer_email: Option<String>,
    #[serde(default)]
    pub organizer_name: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub bot_status: Option<BotStatus>,
    #[serde(default)]
    pub auto_bot_enabled: Option<bool>,
}

/// Body of the ad-hoc meeting create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdHocMeetingRequest {
    pub title: String,
    pub meeting_url: String,
    /// Some backends read the join link from `location`.
    pub location: String,
    #[serde(with = "lenient")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "lenient")]
    pub end_time: DateTime<Utc>,
    pub description: String,
    /// Sent as the `Idempotency-Key` header, not in the body.
    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

/// Partitioned listing returned by `GET /meetings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingsResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub joined_team_meetings: Vec<Meeting>,
    #[serde(deserialize_with = "null_as_default")]
    pub missed_team_meetings: Vec<Meeting>,
    #[serde(deserialize_with = "null_as_default")]
    pub private_meetings: Vec<Meeting>,
}

impl MeetingsResponse {
    /// Merge all partitions into one list sorted by start time.
    ///
    /// The sort is stable, so meetings starting together keep partition
    /// order (joined, missed, private).
    #[must_use]
    pub fn into_merged(self) -> Vec<Meeting> {
        let mut merged = self.joined_team_meetings;
        merged.extend(self.missed_team_meetings);
        merged.extend(self.private_meetings);
        merged.sort_by_key(|meeting| meeting.start_time);
        merged
    }
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Null) | None => Ok(String::new()),
        Some(other) => Err(serde::de::Error::custom(format!("invalid meeting id: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    use super::*;

    fn ten_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn optimistic() -> Meeting {
        let mut meeting = Meeting::new("adhoc-1714557600000", "Standup", ten_am(), ten_am() + Duration::hours(1))
            .with_meeting_url("https://meet.google.com/abc-defg-hij");
        meeting.sync_status = Some(SyncStatus::Saving);
        meeting
    }

    #[test]
    fn deserializes_backend_meeting_without_status_tag() {
        let meeting: Meeting = serde_json::from_value(json!({
            "id": "m-1",
            "title": "Planning",
            "start_time": "2024-05-01T10:00:00Z",
            "end_time": "2024-05-01T11:00:00Z",
            "meeting_url": "https://zoom.us/j/123",
            "bot_status": "joined"
        }))
        .unwrap();

        assert_eq!(meeting.start_time, ten_am());
        assert_eq!(meeting.bot_status, Some(BotStatus::Joined));
        assert_eq!(meeting.sync_status, None);
        assert!(!meeting.is_ad_hoc());
    }

    #[test]
    fn malformed_timestamps_become_now() {
        let before = Utc::now();
        let meeting: Meeting = serde_json::from_value(json!({
            "id": 42,
            "title": "Broken",
            "start_time": "Invalid Date",
            "end_time": null
        }))
        .unwrap();

        assert_eq!(meeting.id, "42");
        assert!(meeting.start_time >= before);
        assert!(meeting.end_time >= before);
    }

    #[test]
    fn unknown_bot_status_is_preserved_as_unknown() {
        let meeting: Meeting =
            serde_json::from_value(json!({ "id": "m", "bot_status": "recording" })).unwrap();
        assert_eq!(meeting.bot_status, Some(BotStatus::Unknown));
        assert!(!meeting.is_bot_active());
    }

    #[test]
    fn status_tag_serializes_as_underscore_status() {
        let value = serde_json::to_value(optimistic()).unwrap();
        assert_eq!(value["_status"], "saving");
        assert_eq!(value["start_time"], "2024-05-01T10:00:00.000Z");
    }

    #[test]
    fn page_match_requires_non_empty_url() {
        let page = "https://meet.google.com/abc-defg-hij?authuser=0";
        assert!(optimistic().matches_page(page));

        let mut empty = optimistic();
        empty.meeting_url = Some(String::new());
        assert!(!empty.matches_page(page));

        empty.meeting_url = None;
        assert!(!empty.matches_page(page));
    }

    #[test]
    fn reconcile_falls_back_for_omitted_fields() {
        let record: MeetingRecord = serde_json::from_value(json!({
            "id": "srv-9",
            "title": "Standup (saved)",
            "location": "https://meet.google.com/abc-defg-hij"
        }))
        .unwrap();

        let saved = optimistic().reconciled_with(record);

        assert_eq!(saved.id, "srv-9");
        assert_eq!(saved.title, "Standup (saved)");
        assert_eq!(saved.start_time, ten_am());
        assert_eq!(saved.end_time, ten_am() + Duration::hours(1));
        assert_eq!(saved.meeting_url.as_deref(), Some("https://meet.google.com/abc-defg-hij"));
        assert_eq!(saved.sync_status, Some(SyncStatus::Saved));
    }

    #[test]
    fn reconcile_prefers_backend_values() {
        let record = MeetingRecord {
            id: "srv-1".into(),
            start_time: Some(ten_am() - Duration::minutes(5)),
            meeting_url: Some("https://meet.google.com/abc-defg-hij".into()),
            bot_status: Some(BotStatus::Joining),
            ..MeetingRecord::default()
        };

        let saved = optimistic().reconciled_with(record);
        assert_eq!(saved.start_time, ten_am() - Duration::minutes(5));
        assert_eq!(saved.title, "Standup");
        assert_eq!(saved.bot_status, Some(BotStatus::Joining));
    }

    #[test]
    fn merged_directory_is_sorted_by_start() {
        let late = Meeting::new("late", "Late", ten_am() + Duration::hours(3), ten_am() + Duration::hours(4));
        let early = Meeting::new("early", "Early", ten_am(), ten_am() + Duration::hours(1));
        let middle = Meeting::new("mid", "Mid", ten_am() + Duration::hours(1), ten_am() + Duration::hours(2));

        let response = MeetingsResponse {
            joined_team_meetings: vec![late],
            missed_team_meetings: vec![middle],
            private_meetings: vec![early],
        };

        let ids: Vec<_> = response.into_merged().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, ["early", "mid", "late"]);
    }

    #[test]
    fn missing_partitions_default_to_empty() {
        let response: MeetingsResponse =
            serde_json::from_value(json!({ "private_meetings": [{ "id": "p" }] })).unwrap();
        assert_eq!(response.into_merged().len(), 1);
    }

    #[test]
    fn create_request_omits_idempotency_key_from_body() {
        let request = AdHocMeetingRequest {
            title: "Standup".into(),
            meeting_url: "https://zoom.us/j/1".into(),
            location: "https://zoom.us/j/1".into(),
            start_time: ten_am(),
            end_time: ten_am() + Duration::hours(1),
            description: "Automatically detected ad-hoc meeting".into(),
            idempotency_key: Some("mia-idem-abc".into()),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("idempotency_key").is_none());
        assert_eq!(value["end_time"], "2024-05-01T11:00:00.000Z");
    }
}
