pub mod currency;
pub mod dates;
pub mod error;

pub use error::{HarnessError, Result};
