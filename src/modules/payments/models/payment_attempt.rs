use serde::{Deserialize, Serialize};

/// Payment attempt lifecycle: created `pending`, then `confirmed` or `failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Confirmed => write!(f, "confirmed"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A single try to settle one invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAttempt {
    /// Service-assigned id
    pub id: String,
    pub invoice_id: String,
    pub created_at: String,
    pub status: PaymentStatus,
}

/// Body of `POST /payments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub invoice_id: String,
}

/// Value of the `X-Mock-Outcome` header.
///
/// When sent, it wins over the amount-based rule of the mock payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MockOutcome {
    Success,
    Fail,
}

impl MockOutcome {
    pub const HEADER: &'static str = "X-Mock-Outcome";

    pub fn as_header_value(&self) -> &'static str {
        match self {
            MockOutcome::Success => "success",
            MockOutcome::Fail => "fail",
        }
    }

    /// Outcome the mock provider picks on its own: amounts whose last decimal digit
    /// is 3 or 7 are declined, everything else goes through.
    pub fn expected_for_amount(amount_minor: i64) -> Self {
        match (amount_minor % 10).abs() {
            3 | 7 => MockOutcome::Fail,
            _ => MockOutcome::Success,
        }
    }
}

impl std::str::FromStr for MockOutcome {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" => Ok(MockOutcome::Success),
            "fail" => Ok(MockOutcome::Fail),
            _ => Err(format!("Invalid mock outcome: {}", s)),
        }
    }
}
