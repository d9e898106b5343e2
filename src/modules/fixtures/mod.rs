// Fixtures module: test data synthesis and API-side provisioning

pub mod setup;
pub mod test_data;

pub use setup::{default_fixture_specs, setup_test_invoices, FixturePolicy, FixtureSpec, TestInvoices};
pub use test_data::{
    create_invoice_payload, expected_outcome, failing_payment_amount, future_date,
    generate_unique_id, past_date, past_date_in_october, successful_payment_amount,
    InvoiceOverrides, DEFAULT_AMOUNT_MINOR, DEFAULT_CURRENCY, FAILING_PAYMENT_AMOUNT,
    SUCCESSFUL_PAYMENT_AMOUNT,
};
