//! Which directory meetings are shown in the meeting list

use chrono::{DateTime, Utc};
use mia_domain::{Meeting, RelevancePolicy};

/// Decide whether `meeting` belongs in the displayed list.
///
/// - [`RelevancePolicy::Upcoming`]: the meeting has not ended yet.
/// - [`RelevancePolicy::Attendable`]: not ended, OR its bot is joining or
///   joined, OR `page_url` is the meeting's own call page. An attendee on
///   the call page of a meeting that overran keeps seeing it.
#[must_use]
pub fn is_relevant(
    policy: RelevancePolicy,
    meeting: &Meeting,
    now: DateTime<Utc>,
    page_url: &str,
) -> bool {
    let upcoming = !meeting.has_ended(now);

    match policy {
        RelevancePolicy::Upcoming => upcoming,
        RelevancePolicy::Attendable => {
            upcoming || meeting.is_bot_active() || meeting.matches_page(page_url)
        }
    }
}

/// Keep the relevant meetings, preserving order.
#[must_use]
pub fn filter_relevant(
    policy: RelevancePolicy,
    meetings: &[Meeting],
    now: DateTime<Utc>,
    page_url: &str,
) -> Vec<Meeting> {
    meetings.iter().filter(|m| is_relevant(policy, m, now, page_url)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use mia_domain::BotStatus;

    use super::*;

    const PAGE: &str = "https://meet.google.com/abc-defg-hij";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn ended() -> Meeting {
        Meeting::new("past", "Past", now() - Duration::hours(2), now() - Duration::hours(1))
    }

    fn upcoming() -> Meeting {
        Meeting::new("next", "Next", now() + Duration::hours(1), now() + Duration::hours(2))
    }

    #[test]
    fn upcoming_meetings_are_always_relevant() {
        for policy in [RelevancePolicy::Upcoming, RelevancePolicy::Attendable] {
            assert!(is_relevant(policy, &upcoming(), now(), PAGE));
            assert!(!is_relevant(policy, &ended(), now(), PAGE));
        }
    }

    #[test]
    fn meeting_ending_exactly_now_has_ended() {
        let meeting = Meeting::new("edge", "Edge", now() - Duration::hours(1), now());
        assert!(!is_relevant(RelevancePolicy::Upcoming, &meeting, now(), ""));
    }

    #[test]
    fn attendable_keeps_ended_meeting_with_active_bot() {
        let joining = ended().with_bot_status(BotStatus::Joining);
        let joined = ended().with_bot_status(BotStatus::Joined);
        let left = ended().with_bot_status(BotStatus::Left);

        assert!(is_relevant(RelevancePolicy::Attendable, &joining, now(), ""));
        assert!(is_relevant(RelevancePolicy::Attendable, &joined, now(), ""));
        assert!(!is_relevant(RelevancePolicy::Attendable, &left, now(), ""));
        assert!(!is_relevant(RelevancePolicy::Upcoming, &joined, now(), ""));
    }

    #[test]
    fn attendable_keeps_ended_meeting_on_its_call_page() {
        let on_page = ended().with_meeting_url(PAGE);
        assert!(is_relevant(RelevancePolicy::Attendable, &on_page, now(), PAGE));
        assert!(!is_relevant(RelevancePolicy::Attendable, &on_page, now(), "https://zoom.us/j/1"));
        assert!(!is_relevant(RelevancePolicy::Upcoming, &on_page, now(), PAGE));
    }

    #[test]
    fn filter_preserves_order() {
        let meetings = vec![upcoming(), ended(), Meeting { id: "later".into(), ..upcoming() }];
        let kept: Vec<_> = filter_relevant(RelevancePolicy::Attendable, &meetings, now(), PAGE)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(kept, ["next", "later"]);
    }
}
