//! Meeting-room URL classification
//!
//! Only URLs that point at an actual call count as meeting rooms. Landing
//! pages and pre-join screens without a room token must not classify, or
//! every visit to a conferencing site would create an ad-hoc meeting.
//!
//! Recognised rooms:
//! - Google Meet: `meet.google.com/abc-defg-hij`
//! - Zoom: `zoom.us/j/<id>` or `zoom.us/my/<alias>`
//! - Teams: `teams.microsoft.com/l/meetup-join/...`

use chrono::NaiveDate;
use mia_domain::constants::{IDEMPOTENCY_KEY_PREFIX, SESSION_FLAG_PREFIX};
use mia_domain::impl_domain_status_conversions;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static GOOGLE_MEET_ROOM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"meet\.google\.com/([a-z]{3}-[a-z]{4}-[a-z]{3})")
        .expect("GOOGLE_MEET_ROOM should compile - this is a bug")
});

static ZOOM_ROOM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"zoom\.us/(j|my)/").expect("ZOOM_ROOM should compile - this is a bug"));

static TEAMS_ROOM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"teams\.microsoft\.com/l/meetup-join/")
        .expect("TEAMS_ROOM should compile - this is a bug")
});

/// Conferencing platforms the overlay runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeetingPlatform {
    GoogleMeet,
    Zoom,
    Teams,
    Webex,
}

impl_domain_status_conversions!(MeetingPlatform {
    GoogleMeet => "google_meet",
    Zoom => "zoom",
    Teams => "teams",
    Webex => "webex",
});

/// A page URL recognised as an active meeting room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRoom {
    platform: MeetingPlatform,
    identity_key: String,
}

impl MeetingRoom {
    #[must_use]
    pub const fn platform(&self) -> MeetingPlatform {
        self.platform
    }

    /// Stable identity of the room across reloads: the Meet room code, or
    /// the full URL for other platforms.
    #[must_use]
    pub fn identity_key(&self) -> &str {
        &self.identity_key
    }

    /// Session flag key marking this room as already processed.
    #[must_use]
    pub fn session_flag_key(&self) -> String {
        format!("{SESSION_FLAG_PREFIX}{}", self.identity_key)
    }

    /// Key sent with the create call so a backend can collapse duplicates
    /// coming from separate tabs (separate session flag stores) on the same
    /// day.
    #[must_use]
    pub fn idempotency_key(&self, day: NaiveDate) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.identity_key.as_bytes());
        hasher.update(b":");
        hasher.update(day.to_string().as_bytes());
        let digest = hasher.finalize().to_hex();
        format!("{IDEMPOTENCY_KEY_PREFIX}{}", &digest.as_str()[..32])
    }
}

/// Classify a page URL as a meeting room.
///
/// The three patterns are independent; a URL is a room if any of them
/// matches. When the Meet pattern matches, its room code is the identity
/// key regardless of the other patterns.
#[must_use]
pub fn classify_room_url(url: &str) -> Option<MeetingRoom> {
    if let Some(captures) = GOOGLE_MEET_ROOM.captures(url) {
        let code = captures.get(1).map_or(url, |m| m.as_str());
        return Some(MeetingRoom { platform: MeetingPlatform::GoogleMeet, identity_key: code.to_string() });
    }

    let platform = if ZOOM_ROOM.is_match(url) {
        MeetingPlatform::Zoom
    } else if TEAMS_ROOM.is_match(url) {
        MeetingPlatform::Teams
    } else {
        return None;
    };

    Some(MeetingRoom { platform, identity_key: url.to_string() })
}

/// What the overlay can do on a given page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSupport {
    /// Platform hosting the page, if it is one Mia supports.
    pub platform: Option<MeetingPlatform>,
    /// Present when the page is an active meeting room.
    pub room: Option<MeetingRoom>,
}

impl PageSupport {
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.platform.is_some()
    }
}

/// Report which platform hosts `url` and whether it is an active room.
#[must_use]
pub fn page_support(url: &str) -> PageSupport {
    let room = classify_room_url(url);
    let platform = room.as_ref().map(MeetingRoom::platform).or_else(|| platform_for_host(url));
    PageSupport { platform, room }
}

fn platform_for_host(url: &str) -> Option<MeetingPlatform> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let on = |domain: &str| host == domain || host.ends_with(&format!(".{domain}"));

    if host == "meet.google.com" {
        Some(MeetingPlatform::GoogleMeet)
    } else if on("zoom.us") {
        Some(MeetingPlatform::Zoom)
    } else if on("teams.microsoft.com") || on("teams.live.com") {
        Some(MeetingPlatform::Teams)
    } else if on("webex.com") {
        Some(MeetingPlatform::Webex)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_meet_room_code_is_identity() {
        let room = classify_room_url("https://meet.google.com/abc-defg-hij?authuser=1").unwrap();
        assert_eq!(room.platform(), MeetingPlatform::GoogleMeet);
        assert_eq!(room.identity_key(), "abc-defg-hij");
        assert_eq!(room.session_flag_key(), "mia_adhoc_abc-defg-hij");
    }

    #[test]
    fn google_meet_landing_pages_are_not_rooms() {
        assert!(classify_room_url("https://meet.google.com/").is_none());
        assert!(classify_room_url("https://meet.google.com/landing").is_none());
        assert!(classify_room_url("https://meet.google.com/new").is_none());
        assert!(classify_room_url("https://meet.google.com/ABC-DEFG-HIJ").is_none());
        assert!(classify_room_url("https://meet.google.com/ab-defg-hij").is_none());
    }

    #[test]
    fn zoom_join_and_personal_rooms() {
        let join = classify_room_url("https://us02web.zoom.us/j/81234567890?pwd=x").unwrap();
        assert_eq!(join.platform(), MeetingPlatform::Zoom);
        assert_eq!(join.identity_key(), "https://us02web.zoom.us/j/81234567890?pwd=x");

        assert!(classify_room_url("https://zoom.us/my/ada.lovelace").is_some());
        assert!(classify_room_url("https://zoom.us/").is_none());
        assert!(classify_room_url("https://zoom.us/signin").is_none());
    }

    #[test]
    fn teams_meetup_join_only() {
        let url = "https://teams.microsoft.com/l/meetup-join/19%3ameeting_NjM@thread.v2/0";
        assert_eq!(classify_room_url(url).unwrap().platform(), MeetingPlatform::Teams);
        assert!(classify_room_url("https://teams.microsoft.com/_#/calendarv2").is_none());
    }

    #[test]
    fn unrelated_urls_are_not_rooms() {
        assert!(classify_room_url("https://example.com/j/123").is_none());
        assert!(classify_room_url("").is_none());
    }

    #[test]
    fn idempotency_key_is_stable_per_room_and_day() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let a = classify_room_url("https://meet.google.com/abc-defg-hij").unwrap();
        let a_again = classify_room_url("https://meet.google.com/abc-defg-hij?hs=1").unwrap();
        let b = classify_room_url("https://meet.google.com/xyz-wxyz-xyz").unwrap();

        assert_eq!(a.idempotency_key(day), a_again.idempotency_key(day));
        assert_ne!(a.idempotency_key(day), b.idempotency_key(day));
        assert_ne!(a.idempotency_key(day), a.idempotency_key(day.succ_opt().unwrap()));
        assert!(a.idempotency_key(day).starts_with("mia-idem-"));
        assert_eq!(a.idempotency_key(day).len(), "mia-idem-".len() + 32);
    }

    #[test]
    fn idempotency_key_never_looks_like_a_synthetic_id() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let room = classify_room_url("https://zoom.us/j/123456789").unwrap();
        let key = room.idempotency_key(day);

        assert!(key.starts_with(IDEMPOTENCY_KEY_PREFIX));
        assert!(!key.starts_with(mia_domain::constants::ADHOC_ID_PREFIX));
    }

    #[test]
    fn page_support_reports_host_platform() {
        let lobby = page_support("https://meet.google.com/landing");
        assert_eq!(lobby.platform, Some(MeetingPlatform::GoogleMeet));
        assert!(lobby.room.is_none());

        let webex = page_support("https://acme.webex.com/meet/ada");
        assert_eq!(webex.platform, Some(MeetingPlatform::Webex));

        let room = page_support("https://zoom.us/j/123");
        assert!(room.room.is_some());

        let other = page_support("https://news.example.com");
        assert!(!other.is_supported());
        assert!(!page_support("not a url").is_supported());
    }
}
