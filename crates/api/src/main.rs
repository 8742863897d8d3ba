//! Mia - meeting list for the current page
//!
//! Usage: `mia <page-url> [page-title]`
//!
//! Loads the meeting list as the overlay would for the given page, waits for
//! any ad-hoc meeting to be saved and logs the resulting list.

use std::sync::Arc;

use anyhow::Context;
use mia_core::PageContext;
use mia_lib::utils::logging::init_tracing;
use mia_lib::{inspect_page, AppContext, ListState, MeetingListController};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let mut args = std::env::args().skip(1);
    let url = args.next().context("usage: mia <page-url> [page-title]")?;
    let title = args.next().unwrap_or_default();

    let support = inspect_page(&url);
    if !support.is_supported() {
        warn!(%url, "page is not on a supported meeting platform");
    }

    let ctx = Arc::new(AppContext::new().context("failed to initialize application context")?);
    if !ctx.auth.is_authenticated() {
        warn!("not signed in; the directory request will likely be rejected");
    }

    let controller = MeetingListController::new(ctx, PageContext::new(url, title));
    if let Err(err) = controller.load().await {
        warn!(error = %err, retryable = err.is_retryable(), "meeting list failed to load");
    }
    controller.settle().await;

    match controller.snapshot() {
        ListState::Loaded { meetings } => {
            for meeting in &meetings {
                info!(
                    id = %meeting.id,
                    title = %meeting.title,
                    start = %meeting.start_time,
                    sync_status = meeting.sync_status.map(|s| s.as_str()),
                    bot_status = meeting.bot_status.map(|s| s.as_str()),
                    "meeting"
                );
            }
            info!(count = meetings.len(), "meeting list loaded");
        }
        other => info!(state = ?other, "meeting list not loaded"),
    }

    Ok(())
}
