//! Domain types and models

pub mod agent;
pub mod auth;
pub mod meeting;

pub use agent::{CatchMeUpResponse, MeetingNote, SmartSearchRequest};
pub use auth::{AuthSession, GoogleAuthStart, OAuthCallback, SignInRequest, User};
pub use meeting::{
    AdHocMeetingRequest, Attendee, BotStatus, Meeting, MeetingRecord, MeetingsResponse,
    RelevancePolicy, SyncStatus,
};
