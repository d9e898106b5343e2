// Invoice shapes as the Utility Bill Pay service exposes them.
//
// The harness never owns invoices: every value here is a transient copy of what one
// API call returned, and status transitions are observed, never performed locally.

use serde::{Deserialize, Serialize};

/// Invoice status lifecycle (service-owned)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Created and awaiting payment
    Unpaid,
    /// Settled through a confirmed payment attempt
    Paid,
    /// Due date passed without payment; time-driven, not test-creatable
    Expired,
    /// Cancelled at creation; cannot be paid
    Void,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 4] = [
        InvoiceStatus::Unpaid,
        InvoiceStatus::Paid,
        InvoiceStatus::Expired,
        InvoiceStatus::Void,
    ];

    /// Wire value, also used as the status filter option value in the UI
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "unpaid",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Expired => "expired",
            InvoiceStatus::Void => "void",
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unpaid" => Ok(InvoiceStatus::Unpaid),
            "paid" => Ok(InvoiceStatus::Paid),
            "expired" => Ok(InvoiceStatus::Expired),
            "void" => Ok(InvoiceStatus::Void),
            _ => Err(format!("Invalid invoice status: {}", s)),
        }
    }
}

/// Invoice as returned by `GET /invoices/{id}` and `POST /invoices`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    /// ISO 4217 code
    pub currency: String,
    /// Amount in minor units (cents)
    pub amount_minor: i64,
    /// ISO 8601 timestamp; may be empty or invalid
    pub due_date_iso: String,
    pub status: InvoiceStatus,
}

/// Body of `POST /invoices`.
///
/// Every field is deliberately permissive (signed amount, free-form currency, any
/// status) so negative scenarios can send payloads the service must reject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    pub id: String,
    pub customer_id: String,
    pub currency: String,
    pub amount_minor: i64,
    pub due_date_iso: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
}

impl CreateInvoiceRequest {
    /// Status the service should assign when the request is accepted
    pub fn expected_status(&self) -> InvoiceStatus {
        match self.status {
            Some(InvoiceStatus::Void) => InvoiceStatus::Void,
            _ => InvoiceStatus::Unpaid,
        }
    }
}

/// One page of `GET /invoices`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceList {
    pub items: Vec<Invoice>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl InvoiceList {
    /// True when every item carries `status`; vacuously true for an empty page
    pub fn all_have_status(&self, status: InvoiceStatus) -> bool {
        self.items.iter().all(|invoice| invoice.status == status)
    }

    pub fn contains(&self, invoice_id: &str) -> bool {
        self.items.iter().any(|invoice| invoice.id == invoice_id)
    }
}

/// Query parameters for `GET /invoices`; absent fields are not sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInvoicesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl ListInvoicesQuery {
    pub fn with_status(status: InvoiceStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }
}
