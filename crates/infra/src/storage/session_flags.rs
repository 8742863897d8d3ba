//! Session-scoped flag store
//!
//! Flags live as long as the process, which stands in for one browsing
//! session. Reloading the meeting list never clears them.

use dashmap::DashSet;
use mia_core::SessionFlagStore;
use tracing::trace;

/// Concurrent in-memory [`SessionFlagStore`].
#[derive(Debug, Default)]
pub struct InMemorySessionFlagStore {
    flags: DashSet<String>,
}

impl InMemorySessionFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl SessionFlagStore for InMemorySessionFlagStore {
    fn has(&self, key: &str) -> bool {
        self.flags.contains(key)
    }

    fn set(&self, key: &str) {
        trace!(key, "session flag set");
        self.flags.insert(key.to_string());
    }

    /// Atomic check-and-set: exactly one concurrent caller wins.
    fn claim(&self, key: &str) -> bool {
        let claimed = self.flags.insert(key.to_string());
        trace!(key, claimed, "session flag claim");
        claimed
    }
}
