//! # Mia App
//!
//! Application layer - commands and wiring for the meeting assistant.
//!
//! This crate contains:
//! - Commands (host → backend bridge)
//! - Application context (dependency injection)
//! - The meeting list controller that owns displayed list state
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Exposes plain async functions a host shell can call

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
