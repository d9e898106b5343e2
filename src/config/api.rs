use super::{normalize_base_url, parse_var};
use crate::core::{HarnessError, Result};
use std::time::Duration;

/// HTTP configuration for the API channel
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    /// The shared test environment serves self-signed certificates
    pub accept_invalid_certs: bool,
}

impl ApiConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(30),
            accept_invalid_certs: true,
        }
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("API_BASE_URL")
            .ok_or_else(|| HarnessError::Configuration("API_BASE_URL not set".to_string()))?;
        let timeout_secs: u64 = parse_var(lookup, "API_REQUEST_TIMEOUT_SECS", "30")?;

        Ok(ApiConfig {
            base_url: normalize_base_url("API_BASE_URL", &base_url)?,
            request_timeout: Duration::from_secs(timeout_secs),
            accept_invalid_certs: parse_var(lookup, "ACCEPT_INVALID_CERTS", "true")?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        normalize_base_url("API_BASE_URL", &self.base_url)?;

        if self.request_timeout.is_zero() {
            return Err(HarnessError::Configuration(
                "API request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Create the HTTP client used by [`crate::modules::api::ApiClient`]
    pub fn build_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .timeout(self.request_timeout)
            .user_agent(concat!("billpay-e2e/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(HarnessError::Transport)
    }
}
