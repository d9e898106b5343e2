pub mod api;
pub mod fixtures;
pub mod invoices;
pub mod payments;
pub mod scenarios;
pub mod ui;
