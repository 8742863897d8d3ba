//! Hosting page inspection

use mia_core::{page_support, PageSupport};
use tracing::debug;

/// Platform and room status of the page the overlay was opened on.
pub fn inspect_page(url: &str) -> PageSupport {
    let support = page_support(url);
    debug!(
        platform = support.platform.map(|p| p.as_str()),
        in_room = support.room.is_some(),
        "page inspected"
    );
    support
}
