// UI module: driver seam, locators, page objects and list synchronization

pub mod chrome;
pub mod constants;
pub mod driver;
pub mod locator;
pub mod pages;
pub mod sync;

pub use chrome::{ChromeDriver, ChromeSession};
pub use driver::{wait_attached, wait_visible, UiDriver, UiSessionFactory, WAIT_STEP};
pub use locator::Locator;
pub use pages::{CreateInvoiceModal, FormAmount, InvoiceForm, InvoiceListPage};
pub use sync::{wait_for_entity_to_appear, SyncOutcome, SyncSettings, SyncStats};
