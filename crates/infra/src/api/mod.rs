//! Mia backend API client
//!
//! HTTP access to the meeting directory, ad-hoc persistence, the meeting
//! agent, notes, transcript search and authentication.
//!
//! # Architecture
//!
//! - Uses [`HttpClient`](crate::http::HttpClient) (no direct reqwest calls)
//! - Bearer token from a [`CredentialStore`], sent only when present
//! - Timeout on every call; idempotent calls retried, creates sent once

pub mod auth;
pub mod client;
pub mod errors;
pub mod meetings;

pub use auth::{
    parse_oauth_redirect, AccessTokenProvider, ApiAuthService, CredentialStore,
    InMemoryCredentialStore, KeychainCredentialStore, StoredTokenProvider,
};
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use errors::ApiError;
pub use meetings::MeetingApi;
