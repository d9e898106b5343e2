// Payments module

pub mod models;

pub use models::{CreatePaymentRequest, MockOutcome, PaymentAttempt, PaymentStatus};
