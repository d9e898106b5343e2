use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::response::ApiResponse;
use crate::config::ApiConfig;
use crate::core::{HarnessError, Result};
use crate::modules::invoices::{Invoice, InvoiceList, InvoiceStatus, ListInvoicesQuery};
use crate::modules::payments::{CreatePaymentRequest, MockOutcome, PaymentAttempt};

/// Header carrying the caller's idempotency key on payment creation
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Client for the Utility Bill Pay REST API.
///
/// No method fails because of a 4xx/5xx status: the status and the parsed body come
/// back as an [`ApiResponse`]. `Err` is reserved for transport failures and bodies
/// that are not valid JSON.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::with_client(config.build_client()?, &config.base_url)
    }

    /// Wrap an existing HTTP client
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            HarnessError::Configuration(format!("Invalid API base URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(HarnessError::Configuration(format!(
                "API base URL '{}' cannot carry paths",
                base_url
            )));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &'static str,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>> {
        let response = request.send().await.map_err(|e| {
            warn!(method, error = %e, "API request failed before a response arrived");
            HarnessError::Transport(e)
        })?;

        let status = response.status().as_u16();
        let path = response.url().path().to_string();
        let bytes = response.bytes().await?;

        debug!(method, path = %path, status, "API call completed");

        ApiResponse::from_parts(status, &bytes)
    }

    /// GET /health; true on any 2xx
    pub async fn health_check(&self) -> Result<bool> {
        let response = self.client.get(self.url(&["health"])).send().await?;
        Ok(response.status().is_success())
    }

    /// GET /invoices with optional status/limit/cursor
    pub async fn list_invoices(&self, query: &ListInvoicesQuery) -> Result<ApiResponse<InvoiceList>> {
        let request = self.client.get(self.url(&["invoices"])).query(query);
        self.send("GET", request).await
    }

    /// GET /invoices/{id}
    pub async fn get_invoice(&self, id: &str) -> Result<ApiResponse<Invoice>> {
        let request = self.client.get(self.url(&["invoices", id]));
        self.send("GET", request).await
    }

    /// POST /invoices
    ///
    /// Generic over the payload so scenarios can post structurally invalid bodies.
    pub async fn create_invoice<P>(&self, payload: &P) -> Result<ApiResponse<Invoice>>
    where
        P: Serialize + ?Sized,
    {
        let request = self.client.post(self.url(&["invoices"])).json(payload);
        self.send("POST", request).await
    }

    /// POST /payments, with an optional `Idempotency-Key`
    pub async fn create_payment(
        &self,
        invoice_id: &str,
        idempotency_key: Option<&str>,
    ) -> Result<ApiResponse<PaymentAttempt>> {
        let body = CreatePaymentRequest {
            invoice_id: invoice_id.to_string(),
        };

        let mut request = self.client.post(self.url(&["payments"])).json(&body);
        if let Some(key) = idempotency_key {
            request = request.header(IDEMPOTENCY_KEY_HEADER, key);
        }

        self.send("POST", request).await
    }

    /// POST /payments/{id}/confirm, with an optional `X-Mock-Outcome` override
    pub async fn confirm_payment(
        &self,
        payment_id: &str,
        mock_outcome: Option<MockOutcome>,
    ) -> Result<ApiResponse<PaymentAttempt>> {
        let mut request = self
            .client
            .post(self.url(&["payments", payment_id, "confirm"]));
        if let Some(outcome) = mock_outcome {
            request = request.header(MockOutcome::HEADER, outcome.as_header_value());
        }

        self.send("POST", request).await
    }

    /// Follow `next_cursor` until it runs out or `max_pages` pages were read.
    ///
    /// Stops at the first non-2xx page and returns that page's status and error.
    pub async fn list_all_invoices(
        &self,
        status: Option<InvoiceStatus>,
        page_size: u32,
        max_pages: usize,
    ) -> Result<ApiResponse<Vec<Invoice>>> {
        let mut items = Vec::new();
        let mut query = ListInvoicesQuery {
            status,
            limit: Some(page_size),
            cursor: None,
        };
        let mut last_status = 200;

        for _ in 0..max_pages {
            let page = self.list_invoices(&query).await?;
            last_status = page.status;

            let list = match page.body {
                Ok(list) => list,
                Err(error) => {
                    return Ok(ApiResponse {
                        status: page.status,
                        body: Err(error),
                    })
                }
            };

            items.extend(list.items);
            match list.next_cursor {
                Some(cursor) if !cursor.is_empty() => query.cursor = Some(cursor),
                _ => break,
            }
        }

        Ok(ApiResponse {
            status: last_status,
            body: Ok(items),
        })
    }
}
