// API module: uniform, non-failing access to the service's HTTP surface

pub mod client;
pub mod response;

pub use client::{ApiClient, IDEMPOTENCY_KEY_HEADER};
pub use response::{ApiResponse, ErrorDetail, ErrorResponse};
