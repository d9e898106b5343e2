use super::{normalize_base_url, parse_var};
use crate::core::{HarnessError, Result};
use crate::modules::ui::SyncSettings;
use std::time::Duration;

/// Browser-side configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub base_url: String,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Upper bound for every blocking UI wait
    pub wait_timeout: Duration,
    /// Cadence of the list synchronization loop
    pub poll_interval: Duration,
}

impl UiConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            wait_timeout: Duration::from_millis(30_000),
            poll_interval: Duration::from_millis(500),
        }
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("UI_BASE_URL")
            .ok_or_else(|| HarnessError::Configuration("UI_BASE_URL not set".to_string()))?;
        let wait_ms: u64 = parse_var(lookup, "UI_WAIT_TIMEOUT_MS", "30000")?;
        let poll_ms: u64 = parse_var(lookup, "UI_POLL_INTERVAL_MS", "500")?;

        Ok(UiConfig {
            base_url: normalize_base_url("UI_BASE_URL", &base_url)?,
            headless: parse_var(lookup, "UI_HEADLESS", "true")?,
            viewport_width: parse_var(lookup, "UI_VIEWPORT_WIDTH", "1280")?,
            viewport_height: parse_var(lookup, "UI_VIEWPORT_HEIGHT", "720")?,
            wait_timeout: Duration::from_millis(wait_ms),
            poll_interval: Duration::from_millis(poll_ms),
        })
    }

    pub fn validate(&self) -> Result<()> {
        normalize_base_url("UI_BASE_URL", &self.base_url)?;

        if self.wait_timeout.is_zero() || self.poll_interval.is_zero() {
            return Err(HarnessError::Configuration(
                "UI wait timeout and poll interval must be greater than 0".to_string(),
            ));
        }

        if self.poll_interval >= self.wait_timeout {
            return Err(HarnessError::Configuration(
                "UI poll interval must be shorter than the wait timeout".to_string(),
            ));
        }

        Ok(())
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            timeout: self.wait_timeout,
            poll_interval: self.poll_interval,
        }
    }
}
