//! Local persistence: session flags and the JSON key/value store

pub mod local;
pub mod session_flags;

pub use local::LocalStore;
pub use session_flags::InMemorySessionFlagStore;
