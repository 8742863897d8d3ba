//! # Mia Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the meeting directory, ad-hoc
//!   persistence, session flags and time
//! - Meeting-room URL classification
//! - The ad-hoc meeting detector and its reconciliation
//! - The meeting list use case
//!
//! ## Architecture Principles
//! - Only depends on `mia-domain`
//! - No HTTP, storage or browser code
//! - All external dependencies via traits

pub mod meetings;

pub use meetings::adhoc::{AdHocCandidate, AdHocDecision, AdHocDetector, AdHocSettings, PageContext};
pub use meetings::ports::{
    AdHocMeetingStore, Clock, MeetingDirectory, SessionFlagStore, SystemClock,
};
pub use meetings::reconcile::{
    apply_reconciliation, PendingReconciliation, ReconcileOutcome, Reconciliation,
};
pub use meetings::relevance::{filter_relevant, is_relevant};
pub use meetings::room::{classify_room_url, page_support, MeetingPlatform, MeetingRoom, PageSupport};
pub use meetings::service::{MeetingListLoad, MeetingListService};
