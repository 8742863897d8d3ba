//! Meeting list and agent commands
//!
//! [`MeetingListController`] owns the list the user sees. A load replaces it
//! wholesale; a persisted ad-hoc meeting is folded in later, and only if the
//! controller (and the entry) still exist by then.

use std::sync::{Arc, Weak};

use mia_core::{apply_reconciliation, PageContext, PendingReconciliation};
use mia_domain::{BotStatus, Meeting, MiaError, Result};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::utils::command_helpers::execute_command;
use crate::AppContext;

/// What the meeting list currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ListState {
    Loading,
    /// The directory could not be fetched. No partial list is kept.
    Error {
        message: String,
        retryable: bool,
    },
    Loaded {
        meetings: Vec<Meeting>,
    },
}

impl ListState {
    #[must_use]
    pub fn meetings(&self) -> &[Meeting] {
        match self {
            Self::Loaded { meetings } => meetings,
            Self::Loading | Self::Error { .. } => &[],
        }
    }
}

/// Meeting list bound to one hosting page.
pub struct MeetingListController {
    ctx: Arc<AppContext>,
    page: PageContext,
    state: Arc<Mutex<ListState>>,
    reconciliations: Mutex<Vec<JoinHandle<()>>>,
}

impl MeetingListController {
    pub fn new(ctx: Arc<AppContext>, page: PageContext) -> Self {
        Self {
            ctx,
            page,
            state: Arc::new(Mutex::new(ListState::Loading)),
            reconciliations: Mutex::new(Vec::new()),
        }
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    /// Copy of the current list state.
    pub fn snapshot(&self) -> ListState {
        self.state.lock().clone()
    }

    /// Load (or reload) the list. Also serves as "try again" after an error.
    ///
    /// # Errors
    /// Returns the directory error after recording it in the list state.
    pub async fn load(&self) -> Result<()> {
        *self.state.lock() = ListState::Loading;

        let result = execute_command("meetings::load", || async {
            self.ctx.meeting_list.load(&self.page).await
        })
        .await;

        match result {
            Ok(load) => {
                *self.state.lock() = ListState::Loaded { meetings: load.meetings };
                if let Some(pending) = load.pending {
                    self.track(pending);
                }
                Ok(())
            }
            Err(err) => {
                *self.state.lock() =
                    ListState::Error { message: err.to_string(), retryable: err.is_retryable() };
                Err(err)
            }
        }
    }

    /// Wait for every in-flight ad-hoc persistence started by this controller
    /// to be applied.
    pub async fn settle(&self) {
        let handles = std::mem::take(&mut *self.reconciliations.lock());
        for handle in handles {
            if let Err(err) = handle.await {
                debug!(error = %err, "reconciliation task ended abnormally");
            }
        }
    }

    /// Dispatch the recording bot and mark the entry as joining.
    ///
    /// # Errors
    /// Returns the backend error; the list is left untouched.
    pub async fn join_with_agent(&self, meeting_id: &str) -> Result<()> {
        execute_command("agent::join_meeting", || async {
            self.ctx.meetings.join_meeting_with_agent(meeting_id).await.map_err(MiaError::from)
        })
        .await?;

        let mut state = self.state.lock();
        if let ListState::Loaded { meetings } = &mut *state {
            if let Some(meeting) = meetings.iter_mut().find(|m| m.id == meeting_id) {
                meeting.bot_status = Some(BotStatus::Joining);
            }
        }
        info!(meeting_id, "agent dispatched");
        Ok(())
    }

    fn track(&self, pending: PendingReconciliation) {
        let state = Arc::downgrade(&self.state);
        let handle = tokio::spawn(apply_when_done(state, pending));

        let mut tracked = self.reconciliations.lock();
        tracked.retain(|h| !h.is_finished());
        tracked.push(handle);
    }
}

async fn apply_when_done(state: Weak<Mutex<ListState>>, pending: PendingReconciliation) {
    let meeting_id = pending.meeting_id().to_string();
    let Some(reconciliation) = pending.outcome().await else {
        debug!(%meeting_id, "ad-hoc persistence cancelled");
        return;
    };

    let Some(state) = state.upgrade() else {
        debug!(%meeting_id, "meeting list gone, dropping reconciliation");
        return;
    };

    let mut state = state.lock();
    let applied = match &mut *state {
        ListState::Loaded { meetings } => apply_reconciliation(meetings, &reconciliation),
        ListState::Loading | ListState::Error { .. } => false,
    };
    debug!(%meeting_id, applied, "ad-hoc reconciliation processed");
}

/// Summary of the meeting so far, ready for display.
///
/// # Errors
/// Returns the backend error.
pub async fn catch_me_up(ctx: &AppContext, meeting_id: &str) -> Result<String> {
    execute_command("agent::catch_me_up", || async {
        let response = ctx.meetings.catch_me_up(meeting_id).await.map_err(MiaError::from)?;
        Ok::<_, MiaError>(response.display_text().to_string())
    })
    .await
}
