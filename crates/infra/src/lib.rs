//! # Mia Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client with retry for idempotent requests
//! - Mia backend API client (meetings, agent, notes, search, auth)
//! - Credential stores (OS keychain, in-memory)
//! - Session flag store and JSON-file local store
//! - Configuration loader
//!
//! ## Architecture
//! - Implements traits defined in `mia-core`
//! - Contains all "impure" code (network, filesystem, keychain)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod storage;

// Re-export commonly used items
pub use api::*;
pub use errors::InfraError;
pub use http::*;
pub use storage::*;
