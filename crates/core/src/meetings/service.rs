//! Meeting list service - core business logic
//!
//! One load fetches the directory, runs ad-hoc detection against the full
//! merged listing, filters it for display and, when a new ad-hoc meeting was
//! detected, prepends the optimistic entry and starts persisting it.

use std::sync::Arc;

use mia_domain::{Meeting, RelevancePolicy, Result};
use tracing::{debug, error, instrument};

use super::adhoc::{AdHocDecision, AdHocDetector, AdHocSettings, PageContext};
use super::ports::{AdHocMeetingStore, Clock, MeetingDirectory, SessionFlagStore};
use super::reconcile::PendingReconciliation;
use super::relevance::filter_relevant;

/// Result of one meeting list load.
#[derive(Debug)]
pub struct MeetingListLoad {
    /// Displayed meetings. A freshly detected ad-hoc meeting comes first.
    pub meetings: Vec<Meeting>,
    /// Persistence of the ad-hoc meeting, when one was detected.
    pub pending: Option<PendingReconciliation>,
}

/// Meeting list service
pub struct MeetingListService {
    directory: Arc<dyn MeetingDirectory>,
    store: Arc<dyn AdHocMeetingStore>,
    flags: Arc<dyn SessionFlagStore>,
    clock: Arc<dyn Clock>,
    detector: AdHocDetector,
    policy: RelevancePolicy,
}

impl MeetingListService {
    /// Create a new meeting list service with default settings
    pub fn new(
        directory: Arc<dyn MeetingDirectory>,
        store: Arc<dyn AdHocMeetingStore>,
        flags: Arc<dyn SessionFlagStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let detector = AdHocDetector::new(flags.clone(), clock.clone(), AdHocSettings::default());
        Self { directory, store, flags, clock, detector, policy: RelevancePolicy::default() }
    }

    pub fn with_adhoc_settings(mut self, settings: AdHocSettings) -> Self {
        self.detector = AdHocDetector::new(self.flags.clone(), self.clock.clone(), settings);
        self
    }

    pub fn with_relevance_policy(mut self, policy: RelevancePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn relevance_policy(&self) -> RelevancePolicy {
        self.policy
    }

    /// Fetch the directory and build the displayed list for `page`.
    ///
    /// A directory failure is returned as-is; no partial list is produced
    /// and no ad-hoc meeting is created.
    #[instrument(skip(self), fields(page_url = %page.url))]
    pub async fn load(&self, page: &PageContext) -> Result<MeetingListLoad> {
        let directory = match self.directory.get_meetings().await {
            Ok(response) => response.into_merged(),
            Err(err) => {
                error!(error = %err, "failed to fetch meeting directory");
                return Err(err);
            }
        };

        Ok(self.detect_and_reconcile(page, directory))
    }

    /// Build the displayed list from an already merged `directory`.
    ///
    /// Must run inside a tokio runtime when ad-hoc detection is enabled,
    /// since a detected meeting is persisted on a spawned task.
    pub fn detect_and_reconcile(&self, page: &PageContext, directory: Vec<Meeting>) -> MeetingListLoad {
        let now = self.clock.now();
        let decision = self.detector.detect(page, &directory);
        let mut meetings = filter_relevant(self.policy, &directory, now, &page.url);

        let pending = match decision {
            AdHocDecision::Create(candidate) => {
                let pending = PendingReconciliation::spawn(self.store.clone(), &candidate);
                meetings.insert(0, candidate.meeting);
                Some(pending)
            }
            other => {
                debug!(decision = ?other, "no ad-hoc meeting created");
                None
            }
        };

        debug!(shown = meetings.len(), total = directory.len(), "meeting list built");
        MeetingListLoad { meetings, pending }
    }
}
