mod invoice;

pub use invoice::{CreateInvoiceRequest, Invoice, InvoiceList, InvoiceStatus, ListInvoicesQuery};
