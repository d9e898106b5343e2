/// Harness-wide Result type
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Failures of the harness itself.
///
/// HTTP-level failures of the service under test (4xx/5xx) are never represented
/// here: the API client hands them back as data so scenarios can assert on them.
/// Only environment problems end up in this enum.
#[derive(thiserror::Error, Debug)]
pub enum HarnessError {
    /// Transport failures (DNS, connection refused, timeouts)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not JSON, or not the expected shape
    #[error("Malformed response body (status {status}): {reason}")]
    MalformedBody { status: u16, reason: String },

    /// JSON serialization errors on the harness side
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Browser / DevTools protocol failures
    #[error("Driver error: {0}")]
    Driver(String),

    /// A bounded UI wait expired
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Strict fixture provisioning failed
    #[error("Fixture error: {0}")]
    Fixture(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

// Helper functions for common error scenarios
impl HarnessError {
    pub fn malformed(status: u16, reason: impl Into<String>) -> Self {
        HarnessError::MalformedBody {
            status,
            reason: reason.into(),
        }
    }

    pub fn driver(msg: impl Into<String>) -> Self {
        HarnessError::Driver(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        HarnessError::Timeout(msg.into())
    }

    pub fn fixture(msg: impl Into<String>) -> Self {
        HarnessError::Fixture(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        HarnessError::Configuration(msg.into())
    }

    /// Whether the error points at the environment rather than at a wait that ran out
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            HarnessError::Transport(_) | HarnessError::MalformedBody { .. } | HarnessError::Driver(_)
        )
    }
}
