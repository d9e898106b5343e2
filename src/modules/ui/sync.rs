//! List synchronization.
//!
//! After an invoice is created through the API, the dashboard may not show it yet
//! (render delay), and even once rendered it may sit on a page that has not been
//! revealed (the list grows behind a "Load more" control). The engine polls for the
//! entity and advances pagination at most once per poll, until a deadline.

use std::time::Duration;

use serde::Serialize;
use tokio::time::{sleep, Instant};
use tracing::debug;

use super::driver::{wait_attached, UiDriver};
use super::locator::Locator;
use crate::core::Result;

/// Default upper bound for a synchronization wait
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Default pause between two presence checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncSettings {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Counters describing how a wait went
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Loop iterations before the deadline (the final check is not counted)
    pub polls: u32,
    /// Successful clicks on the "Load more" control
    pub load_more_clicks: u32,
}

/// Result of a wait that did not hit a driver failure.
///
/// Driver failures come back as `Err`, giving three distinct outcomes: found,
/// not found by the deadline, and transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncOutcome {
    Found(SyncStats),
    TimedOut(SyncStats),
}

impl SyncOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SyncOutcome::Found(_))
    }

    pub fn stats(&self) -> SyncStats {
        match self {
            SyncOutcome::Found(stats) | SyncOutcome::TimedOut(stats) => *stats,
        }
    }
}

/// Wait until `target` matches something on the page, revealing further pages of the
/// list through `load_more` as needed.
///
/// Each iteration: return as soon as the target is present; otherwise, if the
/// control is visible, wait (one poll interval at most) for it to be attached and
/// click it once; then sleep one poll interval. Visibility probes, attach waits and
/// clicks on the control may fail because the last page removed it; those failures
/// are ignored. After the deadline one last presence check decides the outcome.
pub async fn wait_for_entity_to_appear(
    driver: &dyn UiDriver,
    target: &Locator,
    load_more: &Locator,
    settings: SyncSettings,
) -> Result<SyncOutcome> {
    let deadline = Instant::now() + settings.timeout;
    let mut stats = SyncStats::default();

    while Instant::now() < deadline {
        stats.polls += 1;

        if driver.count(target).await? > 0 {
            debug!(target = %target, polls = stats.polls, clicks = stats.load_more_clicks, "Entity found");
            return Ok(SyncOutcome::Found(stats));
        }

        if driver.is_visible(load_more).await.unwrap_or(false) {
            let clicked = match wait_attached(driver, load_more, settings.poll_interval).await {
                Ok(()) => driver.click(load_more).await,
                Err(e) => Err(e),
            };
            match clicked {
                Ok(()) => stats.load_more_clicks += 1,
                Err(e) => debug!(error = %e, "Load more unavailable, continuing to poll"),
            }
        }

        sleep(settings.poll_interval).await;
    }

    if driver.count(target).await? > 0 {
        Ok(SyncOutcome::Found(stats))
    } else {
        debug!(target = %target, polls = stats.polls, "Entity not found before deadline");
        Ok(SyncOutcome::TimedOut(stats))
    }
}
