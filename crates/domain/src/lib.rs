//! # Mia Domain
//!
//! Business domain types and models for the Mia meeting assistant.
//!
//! This crate contains:
//! - Meeting, auth, notes and agent payload types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Pure utilities (lenient timestamps, page title cleanup)
//!
//! ## Architecture
//! - No dependencies on other Mia crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::timestamp::parse_timestamp_or;
pub use utils::title::clean_page_title;
