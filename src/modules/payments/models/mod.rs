mod payment_attempt;

pub use payment_attempt::{CreatePaymentRequest, MockOutcome, PaymentAttempt, PaymentStatus};
