//! Background persistence of ad-hoc meetings and merging of the result
//!
//! The optimistic entry is shown immediately. Persistence runs on a spawned
//! task whose outcome is applied to the displayed list later, by id. The
//! list may have been reloaded or dropped in the meantime, so applying an
//! outcome never assumes the entry is still there.

use std::sync::Arc;

use mia_domain::{Meeting, MeetingRecord, MiaError, SyncStatus};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::adhoc::AdHocCandidate;
use super::ports::AdHocMeetingStore;

/// How persistence of one ad-hoc meeting ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    Saved(MeetingRecord),
    Failed { error: MiaError },
}

/// Outcome addressed to the optimistic entry it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Client-side id of the optimistic entry.
    pub meeting_id: String,
    pub outcome: ReconcileOutcome,
}

/// Apply `reconciliation` to the entry with a matching id.
///
/// On success the entry is replaced in place by the merged meeting; on
/// failure only its sync status changes. Returns `false` when no entry
/// matches, which is expected after a reload.
pub fn apply_reconciliation(meetings: &mut [Meeting], reconciliation: &Reconciliation) -> bool {
    let Some(entry) = meetings.iter_mut().find(|m| m.id == reconciliation.meeting_id) else {
        return false;
    };

    match &reconciliation.outcome {
        ReconcileOutcome::Saved(record) => *entry = entry.reconciled_with(record.clone()),
        ReconcileOutcome::Failed { .. } => entry.sync_status = Some(SyncStatus::Failed),
    }
    true
}

/// Handle to an in-flight ad-hoc persistence task.
///
/// Dropping the handle does not abort the task; the create call still runs
/// to completion and its result is discarded.
#[derive(Debug)]
pub struct PendingReconciliation {
    meeting_id: String,
    cancel: CancellationToken,
    handle: JoinHandle<Option<Reconciliation>>,
}

impl PendingReconciliation {
    /// Start persisting `candidate` on the current tokio runtime.
    pub fn spawn(store: Arc<dyn AdHocMeetingStore>, candidate: &AdHocCandidate) -> Self {
        let meeting_id = candidate.meeting.id.clone();
        let request = candidate.request.clone();
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        let task_id = meeting_id.clone();
        let handle = tokio::spawn(async move {
            let result = tokio::select! {
                () = task_cancel.cancelled() => return None,
                result = store.create_ad_hoc_meeting(&request) => result,
            };

            let outcome = match result {
                Ok(record) => {
                    info!(meeting_id = %task_id, saved_id = %record.id, "ad-hoc meeting saved");
                    ReconcileOutcome::Saved(record)
                }
                Err(error) => {
                    warn!(meeting_id = %task_id, error = %error, "failed to save ad-hoc meeting");
                    ReconcileOutcome::Failed { error }
                }
            };

            Some(Reconciliation { meeting_id: task_id, outcome })
        });

        Self { meeting_id, cancel, handle }
    }

    /// Id of the optimistic entry this task will reconcile.
    #[must_use]
    pub fn meeting_id(&self) -> &str {
        &self.meeting_id
    }

    /// Stop waiting for the create call. A request already sent may still
    /// reach the backend.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task. `None` means it was cancelled.
    pub async fn outcome(self) -> Option<Reconciliation> {
        match self.handle.await {
            Ok(reconciliation) => reconciliation,
            Err(join_error) if join_error.is_cancelled() => None,
            Err(join_error) => {
                warn!(meeting_id = %self.meeting_id, error = %join_error, "ad-hoc persistence task panicked");
                Some(Reconciliation {
                    meeting_id: self.meeting_id,
                    outcome: ReconcileOutcome::Failed {
                        error: MiaError::Internal(format!("persistence task failed: {join_error}")),
                    },
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn optimistic(id: &str) -> Meeting {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut meeting = Meeting::new(id, "Ad-Hoc Meeting", start, start + Duration::hours(1))
            .with_meeting_url("https://zoom.us/j/1");
        meeting.sync_status = Some(SyncStatus::Saving);
        meeting
    }

    #[test]
    fn saved_outcome_replaces_entry_in_place() {
        let mut list = vec![optimistic("adhoc-1"), optimistic("m-2")];
        let reconciliation = Reconciliation {
            meeting_id: "adhoc-1".into(),
            outcome: ReconcileOutcome::Saved(MeetingRecord { id: "srv-1".into(), ..Default::default() }),
        };

        assert!(apply_reconciliation(&mut list, &reconciliation));
        assert_eq!(list[0].id, "srv-1");
        assert_eq!(list[0].sync_status, Some(SyncStatus::Saved));
        assert_eq!(list[0].meeting_url.as_deref(), Some("https://zoom.us/j/1"));
        assert_eq!(list[1].id, "m-2");
    }

    #[test]
    fn failed_outcome_only_flips_status() {
        let mut list = vec![optimistic("adhoc-1")];
        let before = list[0].clone();
        let reconciliation = Reconciliation {
            meeting_id: "adhoc-1".into(),
            outcome: ReconcileOutcome::Failed { error: MiaError::Network("offline".into()) },
        };

        assert!(apply_reconciliation(&mut list, &reconciliation));
        assert_eq!(list[0].sync_status, Some(SyncStatus::Failed));
        assert_eq!(list[0].id, before.id);
        assert_eq!(list[0].title, before.title);
        assert_eq!(list[0].meeting_url, before.meeting_url);
    }

    #[test]
    fn unknown_id_is_ignored() {
        let mut list = vec![optimistic("m-1")];
        let reconciliation = Reconciliation {
            meeting_id: "adhoc-gone".into(),
            outcome: ReconcileOutcome::Saved(MeetingRecord::default()),
        };

        assert!(!apply_reconciliation(&mut list, &reconciliation));
        assert_eq!(list, vec![optimistic("m-1")]);
    }
}
