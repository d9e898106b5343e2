//! [`UiDriver`] backed by a real Chrome instance over the DevTools protocol.
//!
//! One [`ChromeSession`] owns the browser process for a whole run; every scenario gets
//! its own page through [`UiSessionFactory::open`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::js::EvaluationResult;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use super::driver::{UiDriver, UiSessionFactory, WAIT_STEP};
use super::locator::{quote, Locator};
use crate::config::UiConfig;
use crate::core::{HarnessError, Result};

/// Viewports narrower than this are emulated as mobile devices
const MOBILE_WIDTH_THRESHOLD: u32 = 600;

const VISIBLE_JS: &str = "const s = window.getComputedStyle(el); const r = el.getBoundingClientRect(); return s.display !== 'none' && s.visibility !== 'hidden' && (r.width > 0 || r.height > 0);";

fn driver_error(e: impl std::fmt::Display) -> HarnessError {
    HarnessError::driver(e.to_string())
}

/// A launched browser and the task pumping its DevTools events
pub struct ChromeSession {
    browser: Mutex<Option<Browser>>,
    handler: JoinHandle<()>,
    config: UiConfig,
}

impl ChromeSession {
    /// Launch a browser according to the UI configuration. Certificate errors are
    /// ignored, the test environment serves self-signed certificates.
    pub async fn launch(config: &UiConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.viewport_width, config.viewport_height)
            .arg("--ignore-certificate-errors");
        if !config.headless {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(HarnessError::driver)?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(driver_error)?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        info!(
            headless = config.headless,
            width = config.viewport_width,
            height = config.viewport_height,
            "Browser launched"
        );

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler,
            config: config.clone(),
        })
    }

    /// Open a blank page sized to the configured viewport
    pub async fn new_driver(&self) -> Result<ChromeDriver> {
        let page = {
            let guard = self.browser.lock().await;
            let browser = guard
                .as_ref()
                .ok_or_else(|| HarnessError::driver("browser already closed"))?;
            browser.new_page("about:blank").await.map_err(driver_error)?
        };

        let driver = ChromeDriver {
            page,
            wait_timeout: self.config.wait_timeout,
        };
        driver
            .set_viewport(self.config.viewport_width, self.config.viewport_height)
            .await?;
        Ok(driver)
    }

    /// Close the browser and stop the event handler
    pub async fn close(&self) -> Result<()> {
        if let Some(mut browser) = self.browser.lock().await.take() {
            if let Err(e) = browser.close().await {
                warn!(error = %e, "Browser did not close cleanly");
            }
            let _ = browser.wait().await;
        }
        self.handler.abort();
        info!("Browser closed");
        Ok(())
    }
}

#[async_trait]
impl UiSessionFactory for ChromeSession {
    async fn open(&self) -> Result<Arc<dyn UiDriver>> {
        Ok(Arc::new(self.new_driver().await?))
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// One browser page
pub struct ChromeDriver {
    page: Page,
    wait_timeout: Duration,
}

#[derive(Deserialize)]
struct FirstMatch<T> {
    found: bool,
    value: Option<T>,
}

/// Decode a script result. CDP omits `value` for `null` and `undefined`; both decode
/// from JSON null so `Option` results read as `None`.
fn decode_evaluation<T: DeserializeOwned>(result: &EvaluationResult) -> Result<T> {
    let value = result.value().cloned().unwrap_or(serde_json::Value::Null);
    serde_json::from_value(value).map_err(driver_error)
}

impl ChromeDriver {
    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T> {
        let result = self.page.evaluate(script).await.map_err(driver_error)?;
        decode_evaluation(&result)
    }

    /// Run `body` against the first match, bound to `el`; fails when nothing matches
    async fn with_first<T: DeserializeOwned>(&self, locator: &Locator, body: &str) -> Result<T> {
        let script = format!(
            "(() => {{ const el = ({})[0]; if (!el) {{ return {{ found: false }}; }} return {{ found: true, value: (() => {{ {} }})() }}; }})()",
            locator.to_js(),
            body
        );
        match self.eval::<FirstMatch<T>>(script).await? {
            FirstMatch {
                found: true,
                value: Some(value),
            } => Ok(value),
            FirstMatch { found: true, value: None } => Err(HarnessError::driver(format!(
                "script on {} returned nothing",
                locator
            ))),
            _ => Err(HarnessError::driver(format!("no element matches {}", locator))),
        }
    }
}

#[async_trait]
impl UiDriver for ChromeDriver {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!(url = %url, "Navigating");
        self.page.goto(url).await.map_err(driver_error)?;
        Ok(())
    }

    async fn wait_for_load(&self) -> Result<()> {
        let deadline = Instant::now() + self.wait_timeout;
        while Instant::now() < deadline {
            let state: String = self.eval("document.readyState".to_string()).await?;
            if state == "complete" {
                return Ok(());
            }
            sleep(WAIT_STEP).await;
        }
        Err(HarnessError::timeout("document never reached readyState complete"))
    }

    async fn count(&self, locator: &Locator) -> Result<usize> {
        self.eval(format!("({}).length", locator.to_js())).await
    }

    async fn text_content(&self, locator: &Locator) -> Result<Option<String>> {
        self.eval(format!(
            "(() => {{ const el = ({})[0]; return el ? (el.textContent || '') : null; }})()",
            locator.to_js()
        ))
        .await
    }

    async fn all_text_contents(&self, locator: &Locator) -> Result<Vec<String>> {
        self.eval(format!("({}).map(el => el.textContent || '')", locator.to_js()))
            .await
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        self.eval(format!(
            "(() => {{ const el = ({})[0]; if (!el) {{ return false; }} {} }})()",
            locator.to_js(),
            VISIBLE_JS
        ))
        .await
    }

    async fn is_disabled(&self, locator: &Locator) -> Result<bool> {
        self.with_first(
            locator,
            "return el.disabled === true || el.getAttribute('aria-disabled') === 'true';",
        )
        .await
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        let _: bool = self
            .with_first(locator, "el.scrollIntoView({ block: 'center' }); el.click(); return true;")
            .await?;
        debug!(locator = %locator, "Clicked");
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> Result<()> {
        // The native setter keeps framework-controlled inputs in sync with the DOM value
        let body = format!(
            "const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype; \
             const setter = Object.getOwnPropertyDescriptor(proto, 'value').set; \
             el.focus(); setter.call(el, {}); \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true;",
            quote(value)
        );
        let _: bool = self.with_first(locator, &body).await?;
        Ok(())
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> Result<()> {
        let body = format!(
            "const wanted = {}; \
             const opt = Array.from(el.options || []).find(o => o.value === wanted || o.textContent.trim() === wanted); \
             if (!opt) {{ return false; }} \
             el.value = opt.value; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true;",
            quote(value)
        );
        let selected: bool = self.with_first(locator, &body).await?;
        if !selected {
            return Err(HarnessError::driver(format!(
                "{} has no option '{}'",
                locator, value
            )));
        }
        Ok(())
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>> {
        self.eval(format!(
            "(() => {{ const el = ({})[0]; return el ? el.getAttribute({}) : null; }})()",
            locator.to_js(),
            quote(name)
        ))
        .await
    }

    async fn set_viewport(&self, width: u32, height: u32) -> Result<()> {
        let params = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(width))
            .height(i64::from(height))
            .device_scale_factor(1.0)
            .mobile(width < MOBILE_WIDTH_THRESHOLD)
            .build()
            .map_err(HarnessError::driver)?;
        self.page.execute(params).await.map_err(driver_error)?;
        debug!(width, height, "Viewport set");
        Ok(())
    }

    async fn body_scroll_width(&self) -> Result<u32> {
        self.eval("document.body.scrollWidth".to_string()).await
    }

    async fn close(&self) -> Result<()> {
        self.page.clone().close().await.map_err(driver_error)
    }
}
