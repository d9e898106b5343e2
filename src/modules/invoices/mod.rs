// Invoices module

pub mod models;

pub use models::{CreateInvoiceRequest, Invoice, InvoiceList, InvoiceStatus, ListInvoicesQuery};
