use anyhow::ensure;
use futures_util::FutureExt;
use serde_json::json;
use tracing::debug;

use super::checks::{expect_body, expect_error, expect_status};
use super::context::ScenarioContext;
use super::runner::{Area, Scenario};
use crate::modules::fixtures::{
    create_invoice_payload, default_fixture_specs, generate_unique_id, InvoiceOverrides,
};
use crate::modules::invoices::{InvoiceStatus, ListInvoicesQuery};

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(Area::Invoices, "creates invoice with valid data", |ctx| {
            creates_valid_invoice(ctx).boxed()
        }),
        Scenario::new(Area::Invoices, "creates invoice with void status", |ctx| {
            creates_void_invoice(ctx).boxed()
        }),
        Scenario::new(Area::Invoices, "creates invoice with explicit unpaid status", |ctx| {
            creates_explicit_unpaid_invoice(ctx).boxed()
        }),
        Scenario::new(Area::Invoices, "rejects duplicate invoice id", |ctx| {
            rejects_duplicate_id(ctx).boxed()
        }),
        Scenario::new(Area::Invoices, "rejects invalid currency code", |ctx| {
            rejects_invalid_currency(ctx).boxed()
        }),
        Scenario::new(Area::Invoices, "rejects negative amount", |ctx| {
            rejects_negative_amount(ctx).boxed()
        }),
        Scenario::new(Area::Invoices, "rejects short id", |ctx| rejects_short_id(ctx).boxed()),
        Scenario::new(Area::Invoices, "rejects missing required fields", |ctx| {
            rejects_missing_fields(ctx).boxed()
        }),
        Scenario::new(Area::Invoices, "fetches invoice by id", |ctx| {
            fetches_by_id(ctx).boxed()
        }),
        Scenario::new(Area::Invoices, "returns 404 for unknown invoice", |ctx| {
            unknown_invoice_is_not_found(ctx).boxed()
        }),
        Scenario::new(Area::Invoices, "lists invoices", |ctx| lists_invoices(ctx).boxed()),
        Scenario::new(Area::Invoices, "filters invoices by status", |ctx| {
            filters_by_status(ctx).boxed()
        }),
        Scenario::new(Area::Invoices, "respects list limit", |ctx| {
            respects_limit(ctx).boxed()
        }),
    ]
}

async fn creates_valid_invoice(ctx: ScenarioContext) -> anyhow::Result<()> {
    let payload = create_invoice_payload(InvoiceOverrides::default());
    debug!(invoice_id = %payload.id, "Creating invoice");
    let invoice = expect_body(ctx.api.create_invoice(&payload).await?, 201, "create invoice")?;

    ensure!(invoice.id == payload.id, "id {} != {}", invoice.id, payload.id);
    ensure!(
        invoice.customer_id == payload.customer_id,
        "customer_id {} != {}",
        invoice.customer_id,
        payload.customer_id
    );
    ensure!(invoice.currency == payload.currency, "currency {} != {}", invoice.currency, payload.currency);
    ensure!(
        invoice.amount_minor == payload.amount_minor,
        "amount_minor {} != {}",
        invoice.amount_minor,
        payload.amount_minor
    );
    ensure!(
        invoice.status == InvoiceStatus::Unpaid,
        "new invoice is {}, expected unpaid",
        invoice.status
    );
    Ok(())
}

async fn creates_void_invoice(ctx: ScenarioContext) -> anyhow::Result<()> {
    let payload = create_invoice_payload(InvoiceOverrides::default().status(InvoiceStatus::Void));
    let invoice = expect_body(ctx.api.create_invoice(&payload).await?, 201, "create void invoice")?;
    ensure!(invoice.status == InvoiceStatus::Void, "invoice is {}, expected void", invoice.status);
    Ok(())
}

async fn creates_explicit_unpaid_invoice(ctx: ScenarioContext) -> anyhow::Result<()> {
    let payload = create_invoice_payload(InvoiceOverrides::default().status(InvoiceStatus::Unpaid));
    let invoice = expect_body(ctx.api.create_invoice(&payload).await?, 201, "create unpaid invoice")?;
    ensure!(
        invoice.status == InvoiceStatus::Unpaid,
        "invoice is {}, expected unpaid",
        invoice.status
    );
    Ok(())
}

async fn rejects_duplicate_id(ctx: ScenarioContext) -> anyhow::Result<()> {
    let payload = create_invoice_payload(InvoiceOverrides::default());
    expect_status(&ctx.api.create_invoice(&payload).await?, 201, "first create")?;
    expect_error(ctx.api.create_invoice(&payload).await?, 409, "duplicate create")?;
    Ok(())
}

async fn rejects_invalid_currency(ctx: ScenarioContext) -> anyhow::Result<()> {
    let payload = create_invoice_payload(InvoiceOverrides::default().currency("US"));
    expect_error(ctx.api.create_invoice(&payload).await?, 400, "create with 2-letter currency")?;
    Ok(())
}

async fn rejects_negative_amount(ctx: ScenarioContext) -> anyhow::Result<()> {
    let payload = create_invoice_payload(InvoiceOverrides::default().amount_minor(-100));
    expect_error(ctx.api.create_invoice(&payload).await?, 400, "create with negative amount")?;
    Ok(())
}

async fn rejects_short_id(ctx: ScenarioContext) -> anyhow::Result<()> {
    let payload = create_invoice_payload(InvoiceOverrides::default().id("ab"));
    expect_error(ctx.api.create_invoice(&payload).await?, 400, "create with short id")?;
    Ok(())
}

async fn rejects_missing_fields(ctx: ScenarioContext) -> anyhow::Result<()> {
    expect_error(ctx.api.create_invoice(&json!({})).await?, 400, "create with empty body")?;
    Ok(())
}

async fn fetches_by_id(ctx: ScenarioContext) -> anyhow::Result<()> {
    let payload = create_invoice_payload(InvoiceOverrides::default());
    expect_status(&ctx.api.create_invoice(&payload).await?, 201, "create invoice")?;

    let invoice = expect_body(ctx.api.get_invoice(&payload.id).await?, 200, "get invoice")?;
    ensure!(invoice.id == payload.id, "id {} != {}", invoice.id, payload.id);
    ensure!(
        invoice.customer_id == payload.customer_id,
        "customer_id {} != {}",
        invoice.customer_id,
        payload.customer_id
    );
    Ok(())
}

async fn unknown_invoice_is_not_found(ctx: ScenarioContext) -> anyhow::Result<()> {
    let missing = generate_unique_id("incorrect-id");
    expect_error(ctx.api.get_invoice(&missing).await?, 404, "get unknown invoice")?;
    Ok(())
}

async fn lists_invoices(ctx: ScenarioContext) -> anyhow::Result<()> {
    for _ in 0..2 {
        let payload = create_invoice_payload(InvoiceOverrides::default());
        expect_status(&ctx.api.create_invoice(&payload).await?, 201, "create invoice")?;
    }

    let list = expect_body(
        ctx.api.list_invoices(&ListInvoicesQuery::default()).await?,
        200,
        "list invoices",
    )?;
    ensure!(!list.items.is_empty(), "invoice list is empty after two creates");
    let first = &list.items[0];
    ensure!(!first.id.is_empty(), "first listed invoice has no id");
    Ok(())
}

async fn filters_by_status(ctx: ScenarioContext) -> anyhow::Result<()> {
    // Expired cannot be provisioned; its listing is checked over whatever the service holds
    ctx.fixtures(&default_fixture_specs()).await?;

    for status in InvoiceStatus::ALL {
        let list = expect_body(
            ctx.api.list_invoices(&ListInvoicesQuery::with_status(status)).await?,
            200,
            "list invoices by status",
        )?;
        ensure!(
            list.all_have_status(status),
            "listing by {} returned other statuses",
            status
        );
    }
    Ok(())
}

async fn respects_limit(ctx: ScenarioContext) -> anyhow::Result<()> {
    let list = expect_body(
        ctx.api.list_invoices(&ListInvoicesQuery::with_limit(2)).await?,
        200,
        "list invoices with limit",
    )?;
    ensure!(list.items.len() <= 2, "limit 2 returned {} items", list.items.len());
    Ok(())
}
