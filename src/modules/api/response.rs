use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{HarnessError, Result};

/// Machine code and human message of a service error
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default, deserialize_with = "string_or_number")]
    pub code: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub message: String,
}

/// Error envelope: `{"error": {"code": "...", "message": "..."}}`.
///
/// Parsing is lenient on purpose: missing fields come back empty and
/// [`ErrorResponse::is_well_formed`] is what scenarios assert on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: ErrorDetail,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    /// Both code and message are present and non-blank
    pub fn is_well_formed(&self) -> bool {
        !self.error.code.trim().is_empty() && !self.error.message.trim().is_empty()
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error.code, self.error.message)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Status code plus parsed body, for success and error paths alike.
///
/// `body` is `Ok` for 2xx responses and `Err(ErrorResponse)` otherwise, so a match on
/// it is exhaustive over both outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub body: std::result::Result<T, ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Success body, if any
    pub fn ok(&self) -> Option<&T> {
        self.body.as_ref().ok()
    }

    /// Error envelope, if any
    pub fn error(&self) -> Option<&ErrorResponse> {
        self.body.as_ref().err()
    }

    pub fn into_body(self) -> std::result::Result<T, ErrorResponse> {
        self.body
    }

    pub fn map<U, F>(self, f: F) -> ApiResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ApiResponse {
            status: self.status,
            body: self.body.map(f),
        }
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Interpret a raw status and body.
    ///
    /// Fails only when the body is not JSON, or a 2xx body does not match `T`.
    /// An empty or oddly shaped error body becomes an empty envelope.
    pub fn from_parts(status: u16, bytes: &[u8]) -> Result<Self> {
        if (200..300).contains(&status) {
            let body = serde_json::from_slice::<T>(bytes)
                .map_err(|e| HarnessError::malformed(status, e.to_string()))?;
            return Ok(ApiResponse {
                status,
                body: Ok(body),
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiResponse {
                status,
                body: Err(ErrorResponse::default()),
            });
        }

        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| HarnessError::malformed(status, e.to_string()))?;
        let envelope = serde_json::from_value::<ErrorResponse>(value).unwrap_or_default();

        Ok(ApiResponse {
            status,
            body: Err(envelope),
        })
    }
}
