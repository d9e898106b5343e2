use std::sync::Arc;

use tracing::{debug, info};

use crate::core::{HarnessError, Result};
use crate::modules::invoices::InvoiceStatus;
use crate::modules::ui::constants::{
    ADD_INVOICE_BUTTON, DUE_DATE_COLUMN, INVOICE_ROW_PREFIX, LOAD_MORE_BUTTON, PAGE_TITLE,
    STATUS_FILTER_LABEL, TEST_ID_ADD_INVOICE, TEST_ID_FILTER_STATUS, TEST_ID_LOAD_MORE,
    TEST_ID_TOAST,
};
use crate::modules::ui::driver::{wait_attached, wait_visible, UiDriver};
use crate::modules::ui::locator::{quote, Locator};
use crate::modules::ui::sync::{wait_for_entity_to_appear, SyncOutcome, SyncSettings};

/// Selector matching every kind of invoice row the dashboard may render
const ROW_SELECTOR: &str = "[data-testid^=\"invoice-row-\"], tr[data-invoice-id], .invoice-item, table tr";

/// Header rows carry column titles rather than invoice data
const HEADER_TEXTS: [&str; 2] = ["Status", "Amount"];

const EMPTY_STATE_TEXTS: [&str; 3] = ["no invoice", "empty", "no data"];

/// Invoice list / dashboard
pub struct InvoiceListPage {
    driver: Arc<dyn UiDriver>,
    base_url: String,
    sync: SyncSettings,
}

impl InvoiceListPage {
    pub fn new(driver: Arc<dyn UiDriver>, base_url: impl Into<String>, sync: SyncSettings) -> Self {
        Self {
            driver,
            base_url: base_url.into(),
            sync,
        }
    }

    pub fn heading() -> Locator {
        Locator::Heading(1)
    }

    pub fn add_invoice_button() -> Locator {
        Locator::test_id(TEST_ID_ADD_INVOICE)
    }

    pub fn status_filter() -> Locator {
        Locator::test_id(TEST_ID_FILTER_STATUS)
    }

    pub fn status_filter_label() -> Locator {
        Locator::text(STATUS_FILTER_LABEL)
    }

    pub fn load_more_button() -> Locator {
        Locator::test_id(TEST_ID_LOAD_MORE)
    }

    pub fn toast() -> Locator {
        Locator::test_id(TEST_ID_TOAST)
    }

    pub fn invoice_rows() -> Locator {
        Locator::CssWithoutText {
            css: ROW_SELECTOR.to_string(),
            excluded: HEADER_TEXTS.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn empty_state() -> Locator {
        Locator::TextMatching(EMPTY_STATE_TEXTS.iter().map(|t| t.to_string()).collect())
    }

    /// CSS selector of the row carrying this invoice's test id
    pub fn row_selector(invoice_id: &str) -> String {
        Locator::test_id_selector(&format!("{}{}", INVOICE_ROW_PREFIX, invoice_id))
    }

    /// Selector of table rows keyed by a `data-invoice-id` attribute
    pub fn fallback_row_selector(invoice_id: &str) -> String {
        format!("tr[data-invoice-id={}]", quote(invoice_id))
    }

    pub fn pay_button(invoice_id: &str) -> Locator {
        Locator::button_within(Self::row_selector(invoice_id), "pay")
    }

    pub fn driver(&self) -> &Arc<dyn UiDriver> {
        &self.driver
    }

    /// Open the dashboard root and give it a chance to settle; load-state failures are
    /// not fatal
    pub async fn goto(&self) -> Result<()> {
        let url = format!("{}/", self.base_url.trim_end_matches('/'));
        self.driver.goto(&url).await?;
        if let Err(e) = self.driver.wait_for_load().await {
            debug!(error = %e, "Page did not settle, continuing");
        }
        Ok(())
    }

    pub async fn is_page_loaded(&self) -> Result<bool> {
        let heading = Self::heading();
        wait_visible(self.driver.as_ref(), &heading, self.sync.timeout).await?;
        let text = self.driver.text_content(&heading).await?;
        Ok(text.as_deref().map(str::trim) == Some(PAGE_TITLE))
    }

    pub async fn has_invoices_or_empty_state(&self) -> Result<bool> {
        let rows = self.driver.count(&Self::invoice_rows()).await?;
        let empty = self.driver.count(&Self::empty_state()).await?;
        Ok(rows > 0 || empty > 0)
    }

    pub async fn has_add_invoice_button(&self) -> Result<bool> {
        self.has_labelled(&Self::add_invoice_button(), ADD_INVOICE_BUTTON).await
    }

    pub async fn has_load_more_button(&self) -> Result<bool> {
        self.has_labelled(&Self::load_more_button(), LOAD_MORE_BUTTON).await
    }

    async fn has_labelled(&self, locator: &Locator, label: &str) -> Result<bool> {
        wait_visible(self.driver.as_ref(), locator, self.sync.timeout).await?;
        let text = self.driver.text_content(locator).await?;
        Ok(text.as_deref().map(str::trim) == Some(label))
    }

    pub async fn has_status_filter(&self) -> Result<bool> {
        let label_visible = self.driver.is_visible(&Self::status_filter_label()).await?;
        let filter_visible = self.driver.is_visible(&Self::status_filter()).await?;
        Ok(label_visible && filter_visible)
    }

    pub async fn click_add_invoice(&self) -> Result<()> {
        let button = Self::add_invoice_button();
        wait_visible(self.driver.as_ref(), &button, self.sync.timeout).await?;
        self.driver.click(&button).await
    }

    pub async fn filter_by_status(&self, status: InvoiceStatus) -> Result<()> {
        debug!(status = %status, "Filtering invoice list");
        self.driver
            .select_option(&Self::status_filter(), status.as_str())
            .await
    }

    pub async fn invoice_count(&self) -> Result<usize> {
        self.driver.count(&Self::invoice_rows()).await
    }

    /// Click the row's pay button; does nothing when the row or its button is absent
    pub async fn click_pay_button_for_invoice(&self, invoice_id: &str) -> Result<()> {
        let button = Self::pay_button(invoice_id);
        if self.driver.count(&button).await? > 0 {
            info!(invoice_id = %invoice_id, "Paying invoice through the UI");
            self.driver.click(&button).await?;
        } else {
            debug!(invoice_id = %invoice_id, "No pay button for invoice");
        }
        Ok(())
    }

    /// Exact match of the trimmed toast text. Waits for the toast to be attached;
    /// no toast within the wait timeout reads as `false`.
    pub async fn has_toast_message(&self, expected: &str) -> Result<bool> {
        let toast = Self::toast();
        match wait_attached(self.driver.as_ref(), &toast, self.sync.timeout).await {
            Ok(()) => {}
            Err(HarnessError::Timeout(_)) => return Ok(false),
            Err(e) => return Err(e),
        }
        let text = self.driver.text_content(&toast).await?;
        Ok(text.as_deref().map(str::trim) == Some(expected))
    }

    pub async fn wait_for_invoice_to_appear(&self, invoice_id: &str) -> Result<SyncOutcome> {
        let outcome = wait_for_entity_to_appear(
            self.driver.as_ref(),
            &Locator::text(invoice_id),
            &Self::load_more_button(),
            self.sync,
        )
        .await?;
        let stats = outcome.stats();
        info!(
            invoice_id = %invoice_id,
            found = outcome.is_found(),
            polls = stats.polls,
            load_more_clicks = stats.load_more_clicks,
            "Waited for invoice"
        );
        Ok(outcome)
    }

    /// Trimmed text of the row's due-date cell, `None` when the row or cell is missing
    /// or the cell is empty
    pub async fn invoice_due_date(&self, invoice_id: &str) -> Result<Option<String>> {
        let primary = Self::row_selector(invoice_id);
        let row = if self.driver.count(&Locator::css(primary.clone())).await? > 0 {
            primary
        } else {
            Self::fallback_row_selector(invoice_id)
        };
        let cells = self
            .driver
            .all_text_contents(&Locator::css(format!("{} td", row)))
            .await?;
        Ok(cells
            .get(DUE_DATE_COLUMN)
            .map(|cell| cell.trim().to_string())
            .filter(|cell| !cell.is_empty()))
    }

    pub async fn is_pay_button_disabled(&self, invoice_id: &str) -> Result<bool> {
        self.driver.is_disabled(&Self::pay_button(invoice_id)).await
    }

    pub async fn set_viewport(&self, width: u32, height: u32) -> Result<()> {
        self.driver.set_viewport(width, height).await
    }

    pub async fn body_scroll_width(&self) -> Result<u32> {
        self.driver.body_scroll_width().await
    }
}
