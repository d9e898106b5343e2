// Contract tests for the payment endpoints
//
// POST /payments and POST /payments/{id}/confirm: attempt lifecycle, the
// amount-based mock provider rule, its header override and idempotency keys.

#[path = "../helpers/mod.rs"]
mod helpers;

use billpay_e2e::fixtures::{
    create_invoice_payload, InvoiceOverrides, FAILING_PAYMENT_AMOUNT, SUCCESSFUL_PAYMENT_AMOUNT,
};
use billpay_e2e::invoices::InvoiceStatus;
use billpay_e2e::payments::{MockOutcome, PaymentStatus};
use billpay_e2e::{ApiClient, ErrorResponse};
use helpers::*;

async fn unpaid_invoice(api: &ApiClient, amount_minor: i64) -> String {
    let payload = create_invoice_payload(InvoiceOverrides::default().amount_minor(amount_minor));
    assert_created(&api.create_invoice(&payload).await.unwrap());
    payload.id
}

#[actix_web::test]
async fn test_successful_payment_marks_invoice_paid() {
    let store = new_store();
    let srv = spawn_stub_service(store.clone());
    let api = api_client(&srv);
    let invoice_id = unpaid_invoice(&api, SUCCESSFUL_PAYMENT_AMOUNT).await;

    let created = api.create_payment(&invoice_id, None).await.unwrap();
    let payment = assert_created(&created).clone();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.invoice_id, invoice_id);
    assert!(!payment.created_at.is_empty());

    let confirmed = api.confirm_payment(&payment.id, None).await.unwrap();
    let confirmed = assert_ok(&confirmed);
    assert_eq!(confirmed.id, payment.id);
    assert_eq!(confirmed.status, PaymentStatus::Confirmed);

    let invoice = api.get_invoice(&invoice_id).await.unwrap();
    assert_eq!(assert_ok(&invoice).status, InvoiceStatus::Paid);
}

#[actix_web::test]
async fn test_failing_amounts_are_declined() {
    let store = new_store();
    let srv = spawn_stub_service(store.clone());
    let api = api_client(&srv);

    for amount in [FAILING_PAYMENT_AMOUNT, 12_777] {
        let invoice_id = unpaid_invoice(&api, amount).await;
        let created = api.create_payment(&invoice_id, None).await.unwrap();
        let payment_id = assert_created(&created).id.clone();

        let confirmed = api.confirm_payment(&payment_id, None).await.unwrap();
        assert_error_code(&confirmed, 402, "payment_failed");

        let guard = store.lock().unwrap();
        assert_eq!(guard.invoice(&invoice_id).unwrap().status, InvoiceStatus::Unpaid);
    }
}

#[actix_web::test]
async fn test_mock_outcome_header_overrides_amount() {
    let srv = spawn_stub_service(new_store());
    let api = api_client(&srv);

    let declined_by_amount = unpaid_invoice(&api, FAILING_PAYMENT_AMOUNT).await;
    let created = api.create_payment(&declined_by_amount, None).await.unwrap();
    let forced = api
        .confirm_payment(&assert_created(&created).id, Some(MockOutcome::Success))
        .await
        .unwrap();
    assert_eq!(assert_ok(&forced).status, PaymentStatus::Confirmed);

    let accepted_by_amount = unpaid_invoice(&api, SUCCESSFUL_PAYMENT_AMOUNT).await;
    let created = api.create_payment(&accepted_by_amount, None).await.unwrap();
    let forced = api
        .confirm_payment(&assert_created(&created).id, Some(MockOutcome::Fail))
        .await
        .unwrap();
    assert_error_code(&forced, 402, "payment_failed");
}

#[actix_web::test]
async fn test_idempotency_key_returns_same_attempt() {
    let store = new_store();
    let srv = spawn_stub_service(store.clone());
    let api = api_client(&srv);
    let invoice_id = unpaid_invoice(&api, SUCCESSFUL_PAYMENT_AMOUNT).await;

    let first = api.create_payment(&invoice_id, Some("key-1")).await.unwrap();
    let second = api.create_payment(&invoice_id, Some("key-1")).await.unwrap();
    assert_eq!(assert_created(&first).id, assert_created(&second).id);
    assert_eq!(store.lock().unwrap().payment_count(), 1);

    let third = api.create_payment(&invoice_id, Some("key-2")).await.unwrap();
    assert_ne!(assert_created(&third).id, assert_created(&first).id);
    assert_eq!(store.lock().unwrap().payment_count(), 2);
}

#[actix_web::test]
async fn test_payment_rejections() {
    let srv = spawn_stub_service(new_store());
    let api = api_client(&srv);

    let unknown = api.create_payment("inv-unknown", None).await.unwrap();
    assert_error_code(&unknown, 404, "invoice_not_found");

    let void = create_invoice_payload(InvoiceOverrides::default().status(InvoiceStatus::Void));
    assert_created(&api.create_invoice(&void).await.unwrap());
    let on_void = api.create_payment(&void.id, None).await.unwrap();
    assert_error_code(&on_void, 422, "invalid_invoice_state");

    let paid = unpaid_invoice(&api, SUCCESSFUL_PAYMENT_AMOUNT).await;
    let created = api.create_payment(&paid, None).await.unwrap();
    assert_ok(&api.confirm_payment(&assert_created(&created).id, None).await.unwrap());
    let on_paid = api.create_payment(&paid, None).await.unwrap();
    assert_error_code(&on_paid, 422, "invalid_invoice_state");
}

#[actix_web::test]
async fn test_confirm_rejections() {
    let srv = spawn_stub_service(new_store());
    let api = api_client(&srv);

    let unknown = api.confirm_payment("pay-unknown", None).await.unwrap();
    assert_error_code(&unknown, 404, "payment_not_found");

    let invoice_id = unpaid_invoice(&api, SUCCESSFUL_PAYMENT_AMOUNT).await;
    let created = api.create_payment(&invoice_id, None).await.unwrap();
    let payment_id = assert_created(&created).id.clone();
    assert_ok(&api.confirm_payment(&payment_id, None).await.unwrap());

    let again = api.confirm_payment(&payment_id, None).await.unwrap();
    assert_error_code(&again, 422, "invalid_payment_state");
}

#[actix_web::test]
async fn test_payment_scenarios_pass_against_stub() {
    use billpay_e2e::scenarios::{payments, run_scenarios, ScenarioContext};

    let srv = spawn_stub_service(new_store());
    let config = harness_config(&srv);
    let ctx = ScenarioContext::new(api_client(&srv), config.clone());

    let summary = run_scenarios(payments::scenarios(), ctx, &config.runner).await;

    let failures: Vec<_> = summary.failures().map(|r| (r.name, r.error.clone())).collect();
    assert!(failures.is_empty(), "failed scenarios: {:?}", failures);
    assert_eq!(summary.passed(), 10);
}

#[actix_web::test]
async fn test_payment_scenarios_require_error_envelope() {
    use billpay_e2e::scenarios::{payments, run_scenarios, ScenarioContext};

    let srv = spawn_stub_service_with_blank_errors(new_store());
    let config = harness_config(&srv);
    let ctx = ScenarioContext::new(api_client(&srv), config.clone());

    // Statuses are still correct; only the envelopes are empty
    let declined = api_client(&srv).confirm_payment("pay-unknown", None).await.unwrap();
    assert_eq!(declined.status, 404);
    assert_eq!(declined.error(), Some(&ErrorResponse::default()));

    let summary = run_scenarios(payments::scenarios(), ctx, &config.runner).await;

    let failed: Vec<_> = summary.failures().map(|r| r.name).collect();
    for name in [
        "forces failure with mock outcome header",
        "returns 404 confirming unknown payment",
        "fails payment for amount ending in 3",
        "rejects payment for unknown invoice",
    ] {
        assert!(failed.contains(&name), "{} passed without an error envelope", name);
    }
    assert_eq!(summary.passed(), 3, "only the success paths should pass: failed {:?}", failed);
}
