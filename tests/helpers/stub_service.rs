// Stub Utility Bill Pay service
//
// In-memory implementation of the invoice/payment API contract served with actix-test.
// The store is shared so the fake dashboard (fake_ui.rs) renders exactly what the API
// wrote.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{web, App, HttpRequest, HttpResponse};
use billpay_e2e::core::dates::format_iso8601_millis;
use billpay_e2e::invoices::{CreateInvoiceRequest, Invoice, InvoiceList, InvoiceStatus};
use billpay_e2e::payments::{CreatePaymentRequest, MockOutcome, PaymentAttempt, PaymentStatus};
use billpay_e2e::ErrorResponse;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

pub use actix_test::TestServer;

/// Shortest invoice id the service accepts
pub const MIN_INVOICE_ID_LEN: usize = 3;

/// Page size when the caller sends no limit
pub const DEFAULT_LIST_LIMIT: usize = 20;

/// Service-side failure: status plus error envelope
pub type ServiceError = (u16, ErrorResponse);

fn service_error(status: u16, code: &str, message: &str) -> ServiceError {
    (status, ErrorResponse::new(code, message))
}

/// ISO 4217 shape: exactly three ASCII uppercase letters
pub fn is_iso_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// Statuses a caller may request on creation
pub fn is_creatable(status: InvoiceStatus) -> bool {
    matches!(status, InvoiceStatus::Unpaid | InvoiceStatus::Void)
}

/// Only unpaid invoices accept a new payment attempt
pub fn accepts_payment(status: InvoiceStatus) -> bool {
    status == InvoiceStatus::Unpaid
}

/// Invoices in creation order plus payment attempts
#[derive(Debug, Default)]
pub struct Store {
    invoices: Vec<Invoice>,
    payments: HashMap<String, PaymentAttempt>,
    idempotency: HashMap<String, String>,
    next_payment: u64,
}

pub type SharedStore = Arc<Mutex<Store>>;

pub fn new_store() -> SharedStore {
    Arc::new(Mutex::new(Store::default()))
}

impl Store {
    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn invoice(&self, id: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|invoice| invoice.id == id)
    }

    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }

    /// Insert directly, bypassing validation (seeding, expired invoices)
    pub fn insert(&mut self, invoice: Invoice) {
        self.invoices.push(invoice);
    }

    pub fn create_invoice(&mut self, body: Value) -> Result<Invoice, ServiceError> {
        let request: CreateInvoiceRequest = serde_json::from_value(body).map_err(|e| {
            service_error(400, "validation_error", &format!("invalid invoice payload: {}", e))
        })?;

        if request.id.len() < MIN_INVOICE_ID_LEN {
            return Err(service_error(400, "validation_error", "id is too short"));
        }
        if !is_iso_currency_code(&request.currency) {
            return Err(service_error(400, "validation_error", "currency must be ISO 4217"));
        }
        if request.amount_minor < 0 {
            return Err(service_error(400, "validation_error", "amount_minor must be >= 0"));
        }
        let status = request.status.unwrap_or(InvoiceStatus::Unpaid);
        if !is_creatable(status) {
            return Err(service_error(400, "validation_error", "status must be unpaid or void"));
        }
        if self.invoice(&request.id).is_some() {
            return Err(service_error(409, "duplicate_id", "invoice id already exists"));
        }

        let invoice = Invoice {
            id: request.id,
            customer_id: request.customer_id,
            currency: request.currency,
            amount_minor: request.amount_minor,
            due_date_iso: request.due_date_iso,
            status,
        };
        self.invoices.push(invoice.clone());
        Ok(invoice)
    }

    pub fn create_payment(
        &mut self,
        invoice_id: &str,
        idempotency_key: Option<&str>,
    ) -> Result<PaymentAttempt, ServiceError> {
        if let Some(existing) = idempotency_key
            .and_then(|key| self.idempotency.get(key))
            .and_then(|payment_id| self.payments.get(payment_id))
        {
            return Ok(existing.clone());
        }

        let invoice = self
            .invoice(invoice_id)
            .ok_or_else(|| service_error(404, "invoice_not_found", "invoice not found"))?;
        if !accepts_payment(invoice.status) {
            return Err(service_error(
                422,
                "invalid_invoice_state",
                &format!("invoice is {}", invoice.status),
            ));
        }

        self.next_payment += 1;
        let payment = PaymentAttempt {
            id: format!("pay-{}", self.next_payment),
            invoice_id: invoice_id.to_string(),
            created_at: format_iso8601_millis(Utc::now()),
            status: PaymentStatus::Pending,
        };
        if let Some(key) = idempotency_key {
            self.idempotency.insert(key.to_string(), payment.id.clone());
        }
        self.payments.insert(payment.id.clone(), payment.clone());
        Ok(payment)
    }

    pub fn confirm_payment(
        &mut self,
        payment_id: &str,
        forced: Option<MockOutcome>,
    ) -> Result<PaymentAttempt, ServiceError> {
        let payment = self
            .payments
            .get(payment_id)
            .cloned()
            .ok_or_else(|| service_error(404, "payment_not_found", "payment not found"))?;
        if payment.status != PaymentStatus::Pending {
            return Err(service_error(422, "invalid_payment_state", "payment already settled"));
        }

        let amount = self
            .invoice(&payment.invoice_id)
            .map(|invoice| invoice.amount_minor)
            .unwrap_or_default();
        let outcome = forced.unwrap_or_else(|| MockOutcome::expected_for_amount(amount));

        let status = match outcome {
            MockOutcome::Success => PaymentStatus::Confirmed,
            MockOutcome::Fail => PaymentStatus::Failed,
        };
        let updated = PaymentAttempt { status, ..payment };
        self.payments.insert(updated.id.clone(), updated.clone());

        match outcome {
            MockOutcome::Success => {
                if let Some(invoice) = self
                    .invoices
                    .iter_mut()
                    .find(|invoice| invoice.id == updated.invoice_id)
                {
                    invoice.status = InvoiceStatus::Paid;
                }
                Ok(updated)
            }
            MockOutcome::Fail => Err(service_error(402, "payment_failed", "payment declined (mock)")),
        }
    }

    /// Offset-cursor pagination in creation order
    pub fn list(
        &self,
        status: Option<InvoiceStatus>,
        limit: Option<usize>,
        cursor: Option<&str>,
    ) -> Result<InvoiceList, ServiceError> {
        let offset = match cursor {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| service_error(400, "invalid_cursor", "cursor is not valid"))?,
            None => 0,
        };
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).max(1);

        let matching: Vec<&Invoice> = self
            .invoices
            .iter()
            .filter(|invoice| status.map_or(true, |s| invoice.status == s))
            .collect();
        let items: Vec<Invoice> = matching.iter().skip(offset).take(limit).map(|i| (*i).clone()).collect();
        let next = offset + items.len();

        Ok(InvoiceList {
            items,
            next_cursor: (next < matching.len()).then(|| next.to_string()),
        })
    }
}

fn respond<T: serde::Serialize>(result: Result<T, ServiceError>, success: u16) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::build(status_code(success)).json(body),
        Err((status, error)) => HttpResponse::build(status_code(status)).json(error),
    }
}

fn status_code(status: u16) -> actix_web::http::StatusCode {
    actix_web::http::StatusCode::from_u16(status).unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    status: Option<InvoiceStatus>,
    limit: Option<usize>,
    cursor: Option<String>,
}

async fn list_invoices(store: web::Data<SharedStore>, params: web::Query<ListParams>) -> HttpResponse {
    let store = store.lock().unwrap();
    respond(store.list(params.status, params.limit, params.cursor.as_deref()), 200)
}

async fn get_invoice(store: web::Data<SharedStore>, path: web::Path<String>) -> HttpResponse {
    let store = store.lock().unwrap();
    let result = store
        .invoice(&path)
        .cloned()
        .ok_or_else(|| service_error(404, "invoice_not_found", "invoice not found"));
    respond(result, 200)
}

async fn create_invoice(store: web::Data<SharedStore>, body: web::Bytes) -> HttpResponse {
    let result = serde_json::from_slice::<Value>(&body)
        .map_err(|_| service_error(400, "validation_error", "body is not JSON"))
        .and_then(|value| store.lock().unwrap().create_invoice(value));
    respond(result, 201)
}

async fn create_payment(store: web::Data<SharedStore>, req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let key = req
        .headers()
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let result = serde_json::from_slice::<CreatePaymentRequest>(&body)
        .map_err(|_| service_error(400, "validation_error", "invoice_id is required"))
        .and_then(|request| {
            store
                .lock()
                .unwrap()
                .create_payment(&request.invoice_id, key.as_deref())
        });
    respond(result, 201)
}

async fn confirm_payment(
    store: web::Data<SharedStore>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let forced = req
        .headers()
        .get(MockOutcome::HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<MockOutcome>().ok());
    let result = store.lock().unwrap().confirm_payment(&path, forced);
    respond(result, 200)
}

/// Routes of the service contract
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/invoices", web::get().to(list_invoices))
        .route("/invoices", web::post().to(create_invoice))
        .route("/invoices/{id}", web::get().to(get_invoice))
        .route("/payments", web::post().to(create_payment))
        .route("/payments/{id}/confirm", web::post().to(confirm_payment));
}

/// Start the stub service over `store` on a random port
pub fn spawn_stub_service(store: SharedStore) -> TestServer {
    actix_test::start(move || {
        App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(web::Data::new(store.clone()))
            .configure(configure_routes)
    })
}

/// Same contract, but every 4xx/5xx body is replaced by `{}`: status codes stay
/// right while the error envelope is gone
pub fn spawn_stub_service_with_blank_errors(store: SharedStore) -> TestServer {
    actix_test::start(move || {
        App::new()
            .wrap_fn(|req, srv| {
                let fut = srv.call(req);
                async move {
                    let res = fut.await?;
                    let status = res.status();
                    if !status.is_client_error() && !status.is_server_error() {
                        return Ok::<_, actix_web::Error>(res.map_into_boxed_body());
                    }
                    let (req, _) = res.into_parts();
                    let blank = HttpResponse::build(status)
                        .content_type("application/json")
                        .body("{}");
                    Ok::<_, actix_web::Error>(ServiceResponse::new(req, blank))
                }
            })
            .app_data(web::Data::new(store.clone()))
            .configure(configure_routes)
    })
}

/// Server answering every request with a fixed status and raw body
pub fn spawn_raw_server(status: u16, body: &'static str) -> TestServer {
    actix_test::start(move || {
        App::new().default_service(web::to(move || async move {
            HttpResponse::build(status_code(status))
                .content_type("application/json")
                .body(body)
        }))
    })
}

/// Base URL of a test server, without trailing slash
pub fn base_url(srv: &TestServer) -> String {
    srv.url("/").trim_end_matches('/').to_string()
}
