pub mod create_invoice_modal;
pub mod invoice_list;

pub use create_invoice_modal::{due_date_input_value, CreateInvoiceModal, FormAmount, InvoiceForm};
pub use invoice_list::InvoiceListPage;
