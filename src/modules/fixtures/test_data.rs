// Test Data Factory
//
// Generates unique, valid-by-default request payloads for scenarios. Uniqueness
// comes from a millisecond timestamp so ids stay readable in the dashboard.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::core::dates::{format_iso8601_millis, in_october, offset_days};
use crate::modules::invoices::{CreateInvoiceRequest, InvoiceStatus};
use crate::modules::payments::MockOutcome;

/// Currency used by default payloads
pub const DEFAULT_CURRENCY: &str = "USD";

/// Default invoice amount in minor units ($100.00)
pub const DEFAULT_AMOUNT_MINOR: i64 = 10_000;

/// $125.55: ends in 5, the mock provider confirms it
pub const SUCCESSFUL_PAYMENT_AMOUNT: i64 = 12_555;

/// $123.33: ends in 3, the mock provider declines it
pub const FAILING_PAYMENT_AMOUNT: i64 = 12_333;

static LAST_ID_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Millisecond timestamp that never repeats within this process
fn next_id_millis() -> u64 {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let previous = LAST_ID_MILLIS
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    now.max(previous + 1)
}

/// `"<prefix>-<millis>"`.
///
/// Unique within the process; across concurrently running processes it is only
/// as unique as the clock resolution allows.
pub fn generate_unique_id(prefix: &str) -> String {
    format!("{}-{}", prefix, next_id_millis())
}

/// ISO 8601 timestamp `days_from_now` days ahead (default scenarios use 1)
pub fn future_date(days_from_now: i64) -> String {
    format_iso8601_millis(offset_days(Utc::now(), days_from_now))
}

/// ISO 8601 timestamp `days_ago` days back (default scenarios use 7)
pub fn past_date(days_ago: i64) -> String {
    format_iso8601_millis(offset_days(Utc::now(), -days_ago))
}

/// ISO 8601 timestamp `days_ago` days back, moved into October of that year
pub fn past_date_in_october(days_ago: i64) -> String {
    format_iso8601_millis(in_october(Utc::now(), days_ago))
}

pub fn successful_payment_amount() -> i64 {
    SUCCESSFUL_PAYMENT_AMOUNT
}

pub fn failing_payment_amount() -> i64 {
    FAILING_PAYMENT_AMOUNT
}

/// What an unforced confirmation of an invoice with this amount should produce
pub fn expected_outcome(amount_minor: i64) -> MockOutcome {
    MockOutcome::expected_for_amount(amount_minor)
}

/// Field-by-field overrides for [`create_invoice_payload`].
///
/// Overrides are applied verbatim, including values the service must reject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceOverrides {
    pub id: Option<String>,
    pub customer_id: Option<String>,
    pub currency: Option<String>,
    pub amount_minor: Option<i64>,
    pub due_date_iso: Option<String>,
    pub status: Option<InvoiceStatus>,
}

impl InvoiceOverrides {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    pub fn due_date_iso(mut self, due_date_iso: impl Into<String>) -> Self {
        self.due_date_iso = Some(due_date_iso.into());
        self
    }

    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Valid invoice payload (unique ids, USD, $100.00, due tomorrow) with overrides applied
pub fn create_invoice_payload(overrides: InvoiceOverrides) -> CreateInvoiceRequest {
    CreateInvoiceRequest {
        id: overrides.id.unwrap_or_else(|| generate_unique_id("inv")),
        customer_id: overrides
            .customer_id
            .unwrap_or_else(|| generate_unique_id("cust")),
        currency: overrides
            .currency
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        amount_minor: overrides.amount_minor.unwrap_or(DEFAULT_AMOUNT_MINOR),
        due_date_iso: overrides.due_date_iso.unwrap_or_else(|| future_date(1)),
        status: overrides.status,
    }
}
