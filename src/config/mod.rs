use crate::core::{HarnessError, Result};
use crate::modules::fixtures::FixturePolicy;
use std::str::FromStr;

pub mod api;
pub mod ui;

pub use api::ApiConfig;
pub use ui::UiConfig;

/// Main harness configuration.
///
/// Built once at the entry point and passed down explicitly, so two runs against
/// different environments can live in the same process.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub runner: RunnerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_json: bool,
}

/// Which scenario suites the runner executes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    Api,
    Ui,
    All,
}

impl Suite {
    pub fn includes_api(&self) -> bool {
        matches!(self, Suite::Api | Suite::All)
    }

    pub fn includes_ui(&self) -> bool {
        matches!(self, Suite::Ui | Suite::All)
    }
}

impl FromStr for Suite {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "api" => Ok(Suite::Api),
            "ui" => Ok(Suite::Ui),
            "all" => Ok(Suite::All),
            _ => Err(format!("Invalid suite: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Scenarios executed concurrently
    pub workers: usize,
    /// Extra attempts for a failed scenario
    pub retries: u32,
    pub suite: Suite,
    pub fixture_policy: FixturePolicy,
}

impl HarnessConfig {
    /// Configuration with defaults for everything but the two base URLs
    pub fn new(api_base_url: impl Into<String>, ui_base_url: impl Into<String>) -> Self {
        HarnessConfig {
            app: AppConfig {
                env: "development".to_string(),
                log_level: "info".to_string(),
                log_json: false,
            },
            api: ApiConfig::new(api_base_url.into()),
            ui: UiConfig::new(ui_base_url.into()),
            runner: RunnerConfig {
                workers: 4,
                retries: 0,
                suite: Suite::Api,
                fixture_policy: FixturePolicy::Strict,
            },
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_retries = if lookup("CI").is_some() { "2" } else { "0" };

        let config = HarnessConfig {
            app: AppConfig {
                env: lookup("HARNESS_ENV").unwrap_or_else(|| "development".to_string()),
                log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
                log_json: lookup("LOG_FORMAT")
                    .map(|v| v.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
            },
            api: ApiConfig::from_lookup(&lookup)?,
            ui: UiConfig::from_lookup(&lookup)?,
            runner: RunnerConfig {
                workers: parse_var(&lookup, "HARNESS_WORKERS", "4")?,
                retries: parse_var(&lookup, "HARNESS_RETRIES", default_retries)?,
                suite: parse_var(&lookup, "HARNESS_SUITE", "api")?,
                fixture_policy: parse_var(&lookup, "FIXTURE_POLICY", "strict")?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.ui.validate()?;

        if self.runner.workers == 0 {
            return Err(HarnessError::Configuration(
                "Worker count must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Read `key` (or `default`) and parse it, reporting the variable name on failure
pub(crate) fn parse_var<F, T>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse()
        .map_err(|_| HarnessError::Configuration(format!("Invalid {}", key)))
}

/// Base URLs must be absolute http(s) URLs; trailing slashes are dropped
pub(crate) fn normalize_base_url(key: &str, value: &str) -> Result<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(HarnessError::Configuration(format!(
            "{} must start with http:// or https://",
            key
        )));
    }
    Ok(trimmed.to_string())
}
