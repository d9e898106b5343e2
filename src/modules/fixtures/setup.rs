use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::test_data::{create_invoice_payload, InvoiceOverrides, SUCCESSFUL_PAYMENT_AMOUNT};
use crate::core::{HarnessError, Result};
use crate::modules::api::{ApiClient, ApiResponse};
use crate::modules::invoices::InvoiceStatus;

/// How fixture provisioning reacts when the service does not cooperate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixturePolicy {
    /// Any unexpected status aborts provisioning with [`HarnessError::Fixture`]
    #[default]
    Strict,
    /// Log and carry on; the scenario has to notice missing state itself
    Lenient,
}

impl std::str::FromStr for FixturePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(FixturePolicy::Strict),
            "lenient" => Ok(FixturePolicy::Lenient),
            _ => Err(format!("Invalid fixture policy: {}", s)),
        }
    }
}

/// One invoice to provision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureSpec {
    pub status: InvoiceStatus,
    pub amount_minor: Option<i64>,
}

impl FixtureSpec {
    pub fn new(status: InvoiceStatus) -> Self {
        Self {
            status,
            amount_minor: None,
        }
    }

    pub fn with_amount(status: InvoiceStatus, amount_minor: i64) -> Self {
        Self {
            status,
            amount_minor: Some(amount_minor),
        }
    }
}

/// Unpaid, paid and void, in that order
pub fn default_fixture_specs() -> Vec<FixtureSpec> {
    vec![
        FixtureSpec::new(InvoiceStatus::Unpaid),
        FixtureSpec::new(InvoiceStatus::Paid),
        FixtureSpec::new(InvoiceStatus::Void),
    ]
}

/// Ids of provisioned invoices, one slot per status the harness can create
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestInvoices {
    pub unpaid_invoice_id: Option<String>,
    pub paid_invoice_id: Option<String>,
    pub void_invoice_id: Option<String>,
}

impl TestInvoices {
    pub fn get(&self, status: InvoiceStatus) -> Option<&str> {
        match status {
            InvoiceStatus::Unpaid => self.unpaid_invoice_id.as_deref(),
            InvoiceStatus::Paid => self.paid_invoice_id.as_deref(),
            InvoiceStatus::Void => self.void_invoice_id.as_deref(),
            InvoiceStatus::Expired => None,
        }
    }

    fn slot(&mut self, status: InvoiceStatus) -> Option<&mut Option<String>> {
        match status {
            InvoiceStatus::Unpaid => Some(&mut self.unpaid_invoice_id),
            InvoiceStatus::Paid => Some(&mut self.paid_invoice_id),
            InvoiceStatus::Void => Some(&mut self.void_invoice_id),
            InvoiceStatus::Expired => None,
        }
    }
}

/// Report a step that did not return the expected status, per policy
fn check_step<T>(
    policy: FixturePolicy,
    step: &str,
    invoice_id: &str,
    response: &ApiResponse<T>,
    expected: u16,
) -> Result<bool> {
    if response.status == expected {
        return Ok(true);
    }

    let detail = response
        .error()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "unexpected body".to_string());

    match policy {
        FixturePolicy::Strict => Err(HarnessError::fixture(format!(
            "{} for {} returned {} (expected {}): {}",
            step, invoice_id, response.status, expected, detail
        ))),
        FixturePolicy::Lenient => {
            warn!(
                invoice_id = %invoice_id,
                status = response.status,
                expected,
                detail = %detail,
                "Fixture step did not succeed, continuing"
            );
            Ok(false)
        }
    }
}

/// Create the invoices described by `specs` through the API.
///
/// Paid fixtures are created unpaid (default amount 12555) and then paid through a
/// confirmed payment attempt. Expired fixtures cannot be created and are skipped.
/// When several specs share a status, the last one wins its slot.
pub async fn setup_test_invoices(
    client: &ApiClient,
    specs: &[FixtureSpec],
    policy: FixturePolicy,
) -> Result<TestInvoices> {
    let mut invoices = TestInvoices::default();

    for spec in specs {
        let overrides = match spec.status {
            InvoiceStatus::Unpaid | InvoiceStatus::Void => {
                let overrides = InvoiceOverrides::default().status(spec.status);
                match spec.amount_minor {
                    Some(amount) => overrides.amount_minor(amount),
                    None => overrides,
                }
            }
            InvoiceStatus::Paid => InvoiceOverrides::default()
                .status(InvoiceStatus::Unpaid)
                .amount_minor(spec.amount_minor.unwrap_or(SUCCESSFUL_PAYMENT_AMOUNT)),
            InvoiceStatus::Expired => {
                warn!(status = %spec.status, "Fixture status cannot be provisioned, skipping");
                continue;
            }
        };

        let payload = create_invoice_payload(overrides);
        let created = client.create_invoice(&payload).await?;
        check_step(policy, "Invoice creation", &payload.id, &created, 201)?;

        if spec.status == InvoiceStatus::Paid {
            let idempotency_key = Uuid::new_v4().to_string();
            let payment = client
                .create_payment(&payload.id, Some(&idempotency_key))
                .await?;
            if check_step(policy, "Payment creation", &payload.id, &payment, 201)? {
                if let Some(attempt) = payment.ok() {
                    let confirmed = client.confirm_payment(&attempt.id, None).await?;
                    check_step(policy, "Payment confirmation", &payload.id, &confirmed, 200)?;
                }
            }
        }

        info!(status = %spec.status, invoice_id = %payload.id, "Fixture invoice provisioned");
        if let Some(slot) = invoices.slot(spec.status) {
            *slot = Some(payload.id);
        }
    }

    Ok(invoices)
}
