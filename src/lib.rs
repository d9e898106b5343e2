//! Utility Bill Pay end-to-end verification harness
//!
//! This library provides the API client, test data factory, page objects, list
//! synchronization and scenario runner used to verify the invoice/payment service.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use config::HarnessConfig;
pub use core::{HarnessError, Result};
pub use modules::api::{ApiClient, ApiResponse, ErrorResponse};
pub use modules::fixtures;
pub use modules::invoices;
pub use modules::payments;
pub use modules::scenarios;
pub use modules::ui;
