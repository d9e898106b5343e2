// Literal UI contract of the dashboard: labels, toasts and test ids

pub const PAGE_TITLE: &str = "Utility Bill Pay (Demo UI)";
pub const ADD_INVOICE_BUTTON: &str = "Add Invoice";
pub const LOAD_MORE_BUTTON: &str = "Load more";
pub const STATUS_FILTER_LABEL: &str = "Status filter:";

pub const CREATE_INVOICE_SUCCESS_MESSAGE: &str = "Invoice created";
pub const CREATE_INVOICE_DUPLICATE_ERROR_MESSAGE: &str = "Invoice id already exists";
pub const PAYMENT_CONFIRMED: &str = "Payment confirmed";
pub const PAYMENT_FAILED: &str = "Payment failed (mock)";
pub const INVALID_DATE: &str = "Invalid Date";

pub const TEST_ID_ADD_INVOICE: &str = "add-invoice";
pub const TEST_ID_FILTER_STATUS: &str = "filter-status";
pub const TEST_ID_TOAST: &str = "toast-message";
pub const TEST_ID_LOAD_MORE: &str = "load-more";
pub const TEST_ID_CREATE_MODAL: &str = "create-modal";
pub const TEST_ID_CREATE_ID: &str = "create-id";
pub const TEST_ID_CREATE_CUSTOMER: &str = "create-customer";
pub const TEST_ID_CREATE_AMOUNT: &str = "create-amount";
pub const TEST_ID_CREATE_CURRENCY: &str = "create-currency";
pub const TEST_ID_CREATE_DUE: &str = "create-due";
pub const TEST_ID_CREATE_SUBMIT: &str = "create-submit";

/// Test id prefix of invoice rows; the invoice id follows
pub const INVOICE_ROW_PREFIX: &str = "invoice-row-";

/// Column of the due date inside an invoice row
pub const DUE_DATE_COLUMN: usize = 2;

/// Placeholder of `datetime-local`-style due date inputs
pub const DATETIME_LOCAL_PLACEHOLDER: &str = "YYYY-MM-DDTHH:mm";
