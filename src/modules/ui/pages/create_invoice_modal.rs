use std::sync::Arc;

use tracing::debug;

use crate::core::currency::major_input_string;
use crate::core::Result;
use crate::modules::ui::constants::{
    DATETIME_LOCAL_PLACEHOLDER, TEST_ID_CREATE_AMOUNT, TEST_ID_CREATE_CURRENCY,
    TEST_ID_CREATE_CUSTOMER, TEST_ID_CREATE_DUE, TEST_ID_CREATE_ID, TEST_ID_CREATE_MODAL,
    TEST_ID_CREATE_SUBMIT,
};
use crate::modules::ui::driver::{wait_visible, UiDriver};
use crate::modules::ui::locator::Locator;

/// Length of `YYYY-MM-DDTHH:mm`
const DATETIME_LOCAL_LEN: usize = 16;

/// Amount typed into the form, with its unit stated by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAmount {
    /// Minor units, typed as the major-unit string (`1100` -> `"11"`)
    Minor(i64),
    /// Typed verbatim
    Major(String),
}

impl FormAmount {
    pub fn input_value(&self) -> String {
        match self {
            FormAmount::Minor(amount_minor) => major_input_string(*amount_minor),
            FormAmount::Major(value) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceForm {
    pub id: String,
    pub customer_id: String,
    pub amount: FormAmount,
    pub currency: Option<String>,
    pub due_date: Option<String>,
}

impl InvoiceForm {
    pub fn new(id: impl Into<String>, customer_id: impl Into<String>, amount: FormAmount) -> Self {
        Self {
            id: id.into(),
            customer_id: customer_id.into(),
            amount,
            currency: None,
            due_date: None,
        }
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }
}

/// Value for the due-date input: ISO timestamps are cut to `YYYY-MM-DDTHH:mm` when the
/// input advertises that format
pub fn due_date_input_value(due_date: &str, placeholder: Option<&str>) -> String {
    match placeholder {
        Some(p) if p.contains(DATETIME_LOCAL_PLACEHOLDER) => {
            due_date.chars().take(DATETIME_LOCAL_LEN).collect()
        }
        _ => due_date.to_string(),
    }
}

pub struct CreateInvoiceModal {
    driver: Arc<dyn UiDriver>,
    wait_timeout: std::time::Duration,
}

impl CreateInvoiceModal {
    pub fn new(driver: Arc<dyn UiDriver>, wait_timeout: std::time::Duration) -> Self {
        Self {
            driver,
            wait_timeout,
        }
    }

    pub fn modal() -> Locator {
        Locator::test_id(TEST_ID_CREATE_MODAL)
    }

    pub fn cancel_button() -> Locator {
        Locator::button("cancel")
    }

    pub async fn wait_for_modal(&self) -> Result<()> {
        wait_visible(self.driver.as_ref(), &Self::modal(), self.wait_timeout).await
    }

    pub async fn is_visible(&self) -> Result<bool> {
        self.driver.is_visible(&Self::modal()).await
    }

    pub async fn fill_invoice_form(&self, form: &InvoiceForm) -> Result<()> {
        let driver = self.driver.as_ref();
        driver.fill(&Locator::test_id(TEST_ID_CREATE_ID), &form.id).await?;
        driver
            .fill(&Locator::test_id(TEST_ID_CREATE_CUSTOMER), &form.customer_id)
            .await?;
        driver
            .fill(&Locator::test_id(TEST_ID_CREATE_AMOUNT), &form.amount.input_value())
            .await?;

        if let Some(currency) = form.currency.as_deref().filter(|c| !c.is_empty()) {
            driver
                .fill(&Locator::test_id(TEST_ID_CREATE_CURRENCY), currency)
                .await?;
        }

        if let Some(due_date) = form.due_date.as_deref().filter(|d| !d.is_empty()) {
            let due = Locator::test_id(TEST_ID_CREATE_DUE);
            let placeholder = driver.attribute(&due, "placeholder").await?;
            let value = due_date_input_value(due_date, placeholder.as_deref());
            driver.fill(&due, &value).await?;
        }

        debug!(invoice_id = %form.id, "Invoice form filled");
        Ok(())
    }

    pub async fn submit(&self) -> Result<()> {
        self.driver
            .click(&Locator::test_id(TEST_ID_CREATE_SUBMIT))
            .await
    }

    pub async fn cancel(&self) -> Result<()> {
        self.driver.click(&Self::cancel_button()).await
    }

    pub async fn create_invoice(&self, form: &InvoiceForm) -> Result<()> {
        self.wait_for_modal().await?;
        self.fill_invoice_form(form).await?;
        self.submit().await
    }
}
