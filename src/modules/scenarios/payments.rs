use anyhow::ensure;
use futures_util::FutureExt;

use super::checks::{expect_body, expect_error, expect_status};
use super::context::ScenarioContext;
use super::runner::{Area, Scenario};
use crate::modules::fixtures::{
    create_invoice_payload, failing_payment_amount, generate_unique_id,
    successful_payment_amount, InvoiceOverrides,
};
use crate::modules::invoices::InvoiceStatus;
use crate::modules::payments::{MockOutcome, PaymentAttempt, PaymentStatus};

/// Amount ending in 7, the second failing digit
const FAILING_AMOUNT_ENDING_IN_SEVEN: i64 = 12_777;

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(Area::Payments, "pays invoice with successful amount", |ctx| {
            pays_invoice(ctx).boxed()
        }),
        Scenario::new(Area::Payments, "fails payment for amount ending in 3", |ctx| {
            fails_for_amount(ctx, failing_payment_amount()).boxed()
        }),
        Scenario::new(Area::Payments, "fails payment for amount ending in 7", |ctx| {
            fails_for_amount(ctx, FAILING_AMOUNT_ENDING_IN_SEVEN).boxed()
        }),
        Scenario::new(Area::Payments, "tracks payment attempt lifecycle", |ctx| {
            tracks_lifecycle(ctx).boxed()
        }),
        Scenario::new(Area::Payments, "forces success with mock outcome header", |ctx| {
            forces_success(ctx).boxed()
        }),
        Scenario::new(Area::Payments, "forces failure with mock outcome header", |ctx| {
            forces_failure(ctx).boxed()
        }),
        Scenario::new(Area::Payments, "rejects payment for unknown invoice", |ctx| {
            rejects_unknown_invoice(ctx).boxed()
        }),
        Scenario::new(Area::Payments, "rejects payment for void invoice", |ctx| {
            rejects_void_invoice(ctx).boxed()
        }),
        Scenario::new(Area::Payments, "rejects payment for paid invoice", |ctx| {
            rejects_paid_invoice(ctx).boxed()
        }),
        Scenario::new(Area::Payments, "returns 404 confirming unknown payment", |ctx| {
            unknown_payment_is_not_found(ctx).boxed()
        }),
    ]
}

/// Create an unpaid invoice with this amount and return its id
async fn unpaid_invoice(ctx: &ScenarioContext, amount_minor: i64) -> anyhow::Result<String> {
    let payload = create_invoice_payload(InvoiceOverrides::default().amount_minor(amount_minor));
    expect_status(&ctx.api.create_invoice(&payload).await?, 201, "create invoice")?;
    Ok(payload.id)
}

async fn pending_payment(ctx: &ScenarioContext, invoice_id: &str) -> anyhow::Result<PaymentAttempt> {
    let payment = expect_body(
        ctx.api.create_payment(invoice_id, None).await?,
        201,
        "create payment",
    )?;
    ensure!(
        payment.status == PaymentStatus::Pending,
        "new payment is {:?}, expected pending",
        payment.status
    );
    Ok(payment)
}

async fn invoice_status(ctx: &ScenarioContext, invoice_id: &str) -> anyhow::Result<InvoiceStatus> {
    Ok(expect_body(ctx.api.get_invoice(invoice_id).await?, 200, "get invoice")?.status)
}

async fn pays_invoice(ctx: ScenarioContext) -> anyhow::Result<()> {
    let invoice_id = unpaid_invoice(&ctx, successful_payment_amount()).await?;

    let payment = pending_payment(&ctx, &invoice_id).await?;
    ensure!(
        payment.invoice_id == invoice_id,
        "payment bound to {}, expected {}",
        payment.invoice_id,
        invoice_id
    );

    let confirmed = expect_body(
        ctx.api.confirm_payment(&payment.id, None).await?,
        200,
        "confirm payment",
    )?;
    ensure!(
        confirmed.status == PaymentStatus::Confirmed,
        "payment is {:?} after confirmation",
        confirmed.status
    );

    let status = invoice_status(&ctx, &invoice_id).await?;
    ensure!(status == InvoiceStatus::Paid, "invoice is {} after payment, expected paid", status);
    Ok(())
}

async fn fails_for_amount(ctx: ScenarioContext, amount_minor: i64) -> anyhow::Result<()> {
    let invoice_id = unpaid_invoice(&ctx, amount_minor).await?;
    let payment = pending_payment(&ctx, &invoice_id).await?;

    expect_error(
        ctx.api.confirm_payment(&payment.id, None).await?,
        402,
        "confirm failing payment",
    )?;

    let status = invoice_status(&ctx, &invoice_id).await?;
    ensure!(
        status == InvoiceStatus::Unpaid,
        "invoice is {} after failed payment, expected unpaid",
        status
    );
    Ok(())
}

async fn tracks_lifecycle(ctx: ScenarioContext) -> anyhow::Result<()> {
    let invoice_id = unpaid_invoice(&ctx, successful_payment_amount()).await?;
    let payment = pending_payment(&ctx, &invoice_id).await?;
    ensure!(!payment.id.is_empty(), "payment has no id");
    ensure!(!payment.created_at.is_empty(), "payment has no created_at");

    let confirmed = expect_body(
        ctx.api.confirm_payment(&payment.id, None).await?,
        200,
        "confirm payment",
    )?;
    ensure!(
        confirmed.status == PaymentStatus::Confirmed,
        "payment is {:?} after confirmation",
        confirmed.status
    );
    ensure!(confirmed.id == payment.id, "confirmation changed the payment id");
    Ok(())
}

async fn forces_success(ctx: ScenarioContext) -> anyhow::Result<()> {
    let invoice_id = unpaid_invoice(&ctx, failing_payment_amount()).await?;
    let payment = pending_payment(&ctx, &invoice_id).await?;

    let confirmed = expect_body(
        ctx.api
            .confirm_payment(&payment.id, Some(MockOutcome::Success))
            .await?,
        200,
        "confirm with forced success",
    )?;
    ensure!(
        confirmed.status == PaymentStatus::Confirmed,
        "payment is {:?} after forced success",
        confirmed.status
    );
    Ok(())
}

async fn forces_failure(ctx: ScenarioContext) -> anyhow::Result<()> {
    let invoice_id = unpaid_invoice(&ctx, successful_payment_amount()).await?;
    let payment = pending_payment(&ctx, &invoice_id).await?;

    expect_error(
        ctx.api
            .confirm_payment(&payment.id, Some(MockOutcome::Fail))
            .await?,
        402,
        "confirm with forced failure",
    )?;
    Ok(())
}

async fn rejects_unknown_invoice(ctx: ScenarioContext) -> anyhow::Result<()> {
    let missing = generate_unique_id("incorrect-invoice-id");
    expect_error(ctx.api.create_payment(&missing, None).await?, 404, "pay unknown invoice")?;
    Ok(())
}

async fn rejects_void_invoice(ctx: ScenarioContext) -> anyhow::Result<()> {
    let payload = create_invoice_payload(InvoiceOverrides::default().status(InvoiceStatus::Void));
    expect_status(&ctx.api.create_invoice(&payload).await?, 201, "create void invoice")?;
    expect_error(ctx.api.create_payment(&payload.id, None).await?, 422, "pay void invoice")?;
    Ok(())
}

async fn rejects_paid_invoice(ctx: ScenarioContext) -> anyhow::Result<()> {
    let invoice_id = unpaid_invoice(&ctx, successful_payment_amount()).await?;
    let payment = pending_payment(&ctx, &invoice_id).await?;
    expect_status(
        &ctx.api.confirm_payment(&payment.id, None).await?,
        200,
        "confirm first payment",
    )?;

    expect_error(ctx.api.create_payment(&invoice_id, None).await?, 422, "pay paid invoice")?;
    Ok(())
}

async fn unknown_payment_is_not_found(ctx: ScenarioContext) -> anyhow::Result<()> {
    let missing = generate_unique_id("incorrect-payment-id");
    expect_error(
        ctx.api.confirm_payment(&missing, None).await?,
        404,
        "confirm unknown payment",
    )?;
    Ok(())
}
