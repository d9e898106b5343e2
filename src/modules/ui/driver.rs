use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, Instant};

use super::locator::Locator;
use crate::core::{HarnessError, Result};

/// Granularity of the generic element waits
pub const WAIT_STEP: Duration = Duration::from_millis(100);

/// Browser automation primitives the page objects are written against.
///
/// Single-element operations act on the first element the locator matches.
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// Navigate the page to an absolute URL
    async fn goto(&self, url: &str) -> Result<()>;

    /// Give the page a chance to settle after navigation (best effort)
    async fn wait_for_load(&self) -> Result<()>;

    /// Number of matching elements
    async fn count(&self, locator: &Locator) -> Result<usize>;

    /// Text of the first match, `None` when nothing matches
    async fn text_content(&self, locator: &Locator) -> Result<Option<String>>;

    /// Text of every match, in document order
    async fn all_text_contents(&self, locator: &Locator) -> Result<Vec<String>>;

    /// Whether the first match exists and is rendered
    async fn is_visible(&self, locator: &Locator) -> Result<bool>;

    /// Whether the first match is disabled; fails when nothing matches
    async fn is_disabled(&self, locator: &Locator) -> Result<bool>;

    /// Click the first match; fails when nothing matches
    async fn click(&self, locator: &Locator) -> Result<()>;

    /// Replace the value of the first matching input
    async fn fill(&self, locator: &Locator, value: &str) -> Result<()>;

    /// Select the option with this value (or label) on the first matching select
    async fn select_option(&self, locator: &Locator, value: &str) -> Result<()>;

    /// Attribute of the first match
    async fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>>;

    /// Resize the layout viewport
    async fn set_viewport(&self, width: u32, height: u32) -> Result<()>;

    /// `document.body.scrollWidth`
    async fn body_scroll_width(&self) -> Result<u32>;

    /// Release the page; drivers without resources keep the default
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Opens one isolated page per scenario
#[async_trait]
pub trait UiSessionFactory: Send + Sync {
    async fn open(&self) -> Result<std::sync::Arc<dyn UiDriver>>;
}

/// Poll until the locator matches a visible element
pub async fn wait_visible(driver: &dyn UiDriver, locator: &Locator, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if driver.is_visible(locator).await? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(HarnessError::timeout(format!(
                "{} not visible after {:?}",
                locator, timeout
            )));
        }
        sleep(WAIT_STEP.min(timeout)).await;
    }
}

/// Poll until the locator matches at least one element
pub async fn wait_attached(driver: &dyn UiDriver, locator: &Locator, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if driver.count(locator).await? > 0 {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(HarnessError::timeout(format!(
                "{} not attached after {:?}",
                locator, timeout
            )));
        }
        sleep(WAIT_STEP.min(timeout)).await;
    }
}
