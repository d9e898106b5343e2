use std::future::Future;
use std::sync::Arc;

use anyhow::Context as _;
use tracing::warn;

use crate::config::HarnessConfig;
use crate::modules::api::ApiClient;
use crate::modules::fixtures::{setup_test_invoices, FixtureSpec, TestInvoices};
use crate::modules::ui::{CreateInvoiceModal, InvoiceListPage, UiDriver, UiSessionFactory};

/// Everything a scenario needs; cheap to clone, one clone per scenario attempt
#[derive(Clone)]
pub struct ScenarioContext {
    pub api: ApiClient,
    pub config: Arc<HarnessConfig>,
    ui: Option<Arc<dyn UiSessionFactory>>,
}

impl ScenarioContext {
    pub fn new(api: ApiClient, config: Arc<HarnessConfig>) -> Self {
        Self {
            api,
            config,
            ui: None,
        }
    }

    pub fn with_ui(mut self, factory: Arc<dyn UiSessionFactory>) -> Self {
        self.ui = Some(factory);
        self
    }

    pub fn has_ui(&self) -> bool {
        self.ui.is_some()
    }

    /// Provision fixtures with the configured policy
    pub async fn fixtures(&self, specs: &[FixtureSpec]) -> anyhow::Result<TestInvoices> {
        setup_test_invoices(&self.api, specs, self.config.runner.fixture_policy)
            .await
            .context("fixture provisioning failed")
    }

    /// Open a fresh page with its page objects
    pub async fn open_ui(&self) -> anyhow::Result<UiSession> {
        let factory = self
            .ui
            .as_ref()
            .context("UI scenario scheduled without a browser session")?;
        let driver = factory.open().await.context("could not open a browser page")?;
        let ui = &self.config.ui;

        Ok(UiSession {
            list: InvoiceListPage::new(driver.clone(), ui.base_url.clone(), ui.sync_settings()),
            modal: CreateInvoiceModal::new(driver.clone(), ui.wait_timeout),
            driver,
        })
    }

    /// Run `steps` against a fresh page and release the page afterwards, whatever
    /// the steps returned
    pub async fn with_ui_session<F, Fut>(&self, steps: F) -> anyhow::Result<()>
    where
        F: FnOnce(UiSession) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let session = self.open_ui().await?;
        let driver = session.driver.clone();
        let outcome = steps(session).await;
        if let Err(e) = driver.close().await {
            warn!(error = %e, "Page did not close cleanly");
        }
        outcome
    }
}

/// One page and the page objects bound to it
pub struct UiSession {
    pub driver: Arc<dyn UiDriver>,
    pub list: InvoiceListPage,
    pub modal: CreateInvoiceModal,
}
