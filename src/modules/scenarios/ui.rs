use anyhow::{ensure, Context as _};
use futures_util::FutureExt;

use super::context::{ScenarioContext, UiSession};
use super::runner::{Area, Scenario};
use crate::modules::fixtures::{
    failing_payment_amount, future_date, generate_unique_id, successful_payment_amount,
    FixtureSpec,
};
use crate::modules::invoices::InvoiceStatus;
use crate::modules::ui::constants::{
    CREATE_INVOICE_DUPLICATE_ERROR_MESSAGE, CREATE_INVOICE_SUCCESS_MESSAGE, INVALID_DATE,
    PAYMENT_CONFIRMED, PAYMENT_FAILED,
};
use crate::modules::ui::{FormAmount, InvoiceForm};

/// Amount typed into the create form, in minor units
const FORM_AMOUNT_MINOR: i64 = 1100;
const FORM_CURRENCY: &str = "AED";

/// Widest body a 375px mobile viewport may render without horizontal scrolling
pub const MOBILE_MAX_BODY_WIDTH: u32 = 400;

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(Area::Ui, "opens create invoice modal", |ctx| opens_modal(ctx).boxed()),
        Scenario::new(Area::Ui, "creates invoice through the UI", |ctx| {
            creates_invoice(ctx).boxed()
        }),
        Scenario::new(Area::Ui, "closes modal on cancel", |ctx| closes_modal_on_cancel(ctx).boxed()),
        Scenario::new(Area::Ui, "shows error for duplicate invoice id", |ctx| {
            shows_duplicate_error(ctx).boxed()
        }),
        Scenario::new(Area::Ui, "shows Invalid Date for empty due date", |ctx| {
            shows_invalid_date(ctx).boxed()
        }),
        Scenario::new(Area::Ui, "displays invoice list page", |ctx| displays_page(ctx).boxed()),
        Scenario::new(Area::Ui, "displays invoices or empty state", |ctx| {
            displays_rows_or_empty_state(ctx).boxed()
        }),
        Scenario::new(Area::Ui, "has add invoice and load more buttons", |ctx| {
            has_buttons(ctx).boxed()
        }),
        Scenario::new(Area::Ui, "has status filter", |ctx| has_status_filter(ctx).boxed()),
        Scenario::new(Area::Ui, "filters invoices by unpaid status", |ctx| {
            filters_fixture(ctx, InvoiceStatus::Unpaid).boxed()
        }),
        Scenario::new(Area::Ui, "filters invoices by paid status", |ctx| {
            filters_fixture(ctx, InvoiceStatus::Paid).boxed()
        }),
        Scenario::new(Area::Ui, "filters invoices by expired status", |ctx| {
            filters_expired(ctx).boxed()
        }),
        Scenario::new(Area::Ui, "filters invoices by void status", |ctx| {
            filters_fixture(ctx, InvoiceStatus::Void).boxed()
        }),
        Scenario::new(Area::Ui, "pays invoice with successful amount", |ctx| {
            pays_invoice(ctx, successful_payment_amount(), PAYMENT_CONFIRMED, Some(InvoiceStatus::Paid))
                .boxed()
        }),
        Scenario::new(Area::Ui, "fails payment for amount ending in 3", |ctx| {
            pays_invoice(ctx, failing_payment_amount(), PAYMENT_FAILED, None).boxed()
        }),
        Scenario::new(Area::Ui, "renders on mobile viewport", |ctx| renders_on_mobile(ctx).boxed()),
        Scenario::new(Area::Ui, "renders on tablet viewport", |ctx| renders_on_tablet(ctx).boxed()),
    ]
}

fn new_form(id_prefix: &str) -> InvoiceForm {
    InvoiceForm::new(
        generate_unique_id(id_prefix),
        generate_unique_id("cust"),
        FormAmount::Minor(FORM_AMOUNT_MINOR),
    )
    .currency(FORM_CURRENCY)
}

async fn open_dashboard(ui: &UiSession) -> anyhow::Result<()> {
    ui.list.goto().await.context("could not open the dashboard")
}

async fn opens_modal(ctx: ScenarioContext) -> anyhow::Result<()> {
    ctx.with_ui_session(|ui| async move {
        open_dashboard(&ui).await?;
        ui.list.click_add_invoice().await?;
        ui.modal.wait_for_modal().await?;
        ensure!(ui.modal.is_visible().await?, "create modal is not visible");
        Ok(())
    })
    .await
}

async fn creates_invoice(ctx: ScenarioContext) -> anyhow::Result<()> {
    ctx.with_ui_session(|ui| async move {
        open_dashboard(&ui).await?;
        let form = new_form("inv").due_date(future_date(1));

        ui.list.click_add_invoice().await?;
        ui.modal.create_invoice(&form).await?;

        ensure!(
            ui.list.has_toast_message(CREATE_INVOICE_SUCCESS_MESSAGE).await?,
            "no '{}' toast",
            CREATE_INVOICE_SUCCESS_MESSAGE
        );
        let outcome = ui.list.wait_for_invoice_to_appear(&form.id).await?;
        ensure!(outcome.is_found(), "invoice {} never appeared in the list", form.id);
        Ok(())
    })
    .await
}

async fn closes_modal_on_cancel(ctx: ScenarioContext) -> anyhow::Result<()> {
    ctx.with_ui_session(|ui| async move {
        open_dashboard(&ui).await?;
        ui.list.click_add_invoice().await?;
        ui.modal.wait_for_modal().await?;
        ui.modal.cancel().await?;
        ensure!(!ui.modal.is_visible().await?, "create modal still visible after cancel");
        Ok(())
    })
    .await
}

async fn shows_duplicate_error(ctx: ScenarioContext) -> anyhow::Result<()> {
    ctx.with_ui_session(|ui| async move {
        open_dashboard(&ui).await?;
        let form = new_form("inv").due_date(future_date(1));

        ui.list.click_add_invoice().await?;
        ui.modal.create_invoice(&form).await?;
        ensure!(
            ui.list.has_toast_message(CREATE_INVOICE_SUCCESS_MESSAGE).await?,
            "first create did not confirm"
        );

        ui.list.click_add_invoice().await?;
        ui.modal.create_invoice(&form).await?;
        ui.modal.cancel().await?;
        ensure!(
            ui.list.has_toast_message(CREATE_INVOICE_DUPLICATE_ERROR_MESSAGE).await?,
            "no '{}' toast after resubmitting {}",
            CREATE_INVOICE_DUPLICATE_ERROR_MESSAGE,
            form.id
        );
        Ok(())
    })
    .await
}

async fn shows_invalid_date(ctx: ScenarioContext) -> anyhow::Result<()> {
    ctx.with_ui_session(|ui| async move {
        open_dashboard(&ui).await?;
        let form = new_form("invalid-date").due_date("");

        ui.list.click_add_invoice().await?;
        ui.modal.create_invoice(&form).await?;
        ensure!(
            ui.list.has_toast_message(CREATE_INVOICE_SUCCESS_MESSAGE).await?,
            "create without due date did not confirm"
        );

        ui.list.filter_by_status(InvoiceStatus::Unpaid).await?;
        let outcome = ui.list.wait_for_invoice_to_appear(&form.id).await?;
        ensure!(outcome.is_found(), "invoice {} never appeared in the list", form.id);

        let due = ui.list.invoice_due_date(&form.id).await?;
        ensure!(
            due.as_deref() == Some(INVALID_DATE),
            "due date rendered as {:?}, expected '{}'",
            due,
            INVALID_DATE
        );
        Ok(())
    })
    .await
}

async fn displays_page(ctx: ScenarioContext) -> anyhow::Result<()> {
    ctx.with_ui_session(|ui| async move {
        open_dashboard(&ui).await?;
        ensure!(ui.list.is_page_loaded().await?, "dashboard heading does not match");
        Ok(())
    })
    .await
}

async fn displays_rows_or_empty_state(ctx: ScenarioContext) -> anyhow::Result<()> {
    ctx.with_ui_session(|ui| async move {
        open_dashboard(&ui).await?;
        ensure!(
            ui.list.has_invoices_or_empty_state().await?,
            "dashboard shows neither invoices nor an empty state"
        );
        Ok(())
    })
    .await
}

async fn has_buttons(ctx: ScenarioContext) -> anyhow::Result<()> {
    ctx.with_ui_session(|ui| async move {
        open_dashboard(&ui).await?;
        ensure!(ui.list.has_add_invoice_button().await?, "add invoice button missing");
        ensure!(ui.list.has_load_more_button().await?, "load more button missing");
        Ok(())
    })
    .await
}

async fn has_status_filter(ctx: ScenarioContext) -> anyhow::Result<()> {
    ctx.with_ui_session(|ui| async move {
        open_dashboard(&ui).await?;
        ensure!(ui.list.has_status_filter().await?, "status filter missing");
        Ok(())
    })
    .await
}

async fn filters_fixture(ctx: ScenarioContext, status: InvoiceStatus) -> anyhow::Result<()> {
    let fixtures = ctx.fixtures(&[FixtureSpec::new(status)]).await?;
    let invoice_id = fixtures
        .get(status)
        .with_context(|| format!("no {} fixture was provisioned", status))?
        .to_string();

    ctx.with_ui_session(|ui| async move {
        open_dashboard(&ui).await?;
        ui.list.filter_by_status(status).await?;
        let outcome = ui.list.wait_for_invoice_to_appear(&invoice_id).await?;
        ensure!(
            outcome.is_found(),
            "{} invoice {} not listed under its filter",
            status,
            invoice_id
        );
        Ok(())
    })
    .await
}

// Expired invoices are not creatable, only the filter itself is exercised
async fn filters_expired(ctx: ScenarioContext) -> anyhow::Result<()> {
    ctx.with_ui_session(|ui| async move {
        open_dashboard(&ui).await?;
        ui.list.filter_by_status(InvoiceStatus::Expired).await?;
        let count = ui.list.invoice_count().await?;
        tracing::debug!(count, "Expired invoices listed");
        Ok(())
    })
    .await
}

async fn pays_invoice(
    ctx: ScenarioContext,
    amount_minor: i64,
    expected_toast: &'static str,
    status_after: Option<InvoiceStatus>,
) -> anyhow::Result<()> {
    let fixtures = ctx
        .fixtures(&[FixtureSpec::with_amount(InvoiceStatus::Unpaid, amount_minor)])
        .await?;
    let invoice_id = fixtures
        .get(InvoiceStatus::Unpaid)
        .context("no unpaid fixture was provisioned")?
        .to_string();

    ctx.with_ui_session(|ui| async move {
        open_dashboard(&ui).await?;
        ui.list.filter_by_status(InvoiceStatus::Unpaid).await?;
        let outcome = ui.list.wait_for_invoice_to_appear(&invoice_id).await?;
        ensure!(outcome.is_found(), "unpaid invoice {} never appeared", invoice_id);

        ui.list.click_pay_button_for_invoice(&invoice_id).await?;
        ensure!(
            ui.list.has_toast_message(expected_toast).await?,
            "no '{}' toast after paying {}",
            expected_toast,
            invoice_id
        );

        if let Some(status) = status_after {
            ui.list.filter_by_status(status).await?;
            let outcome = ui.list.wait_for_invoice_to_appear(&invoice_id).await?;
            ensure!(
                outcome.is_found(),
                "invoice {} not listed as {} after paying",
                invoice_id,
                status
            );
        }
        Ok(())
    })
    .await
}

async fn renders_on_mobile(ctx: ScenarioContext) -> anyhow::Result<()> {
    ctx.with_ui_session(|ui| async move {
        ui.list.set_viewport(375, 667).await?;
        open_dashboard(&ui).await?;

        let body_width = ui.list.body_scroll_width().await?;
        ensure!(ui.list.has_load_more_button().await?, "load more button missing on mobile");
        ensure!(
            body_width <= MOBILE_MAX_BODY_WIDTH,
            "body is {}px wide on a 375px viewport",
            body_width
        );
        Ok(())
    })
    .await
}

async fn renders_on_tablet(ctx: ScenarioContext) -> anyhow::Result<()> {
    ctx.with_ui_session(|ui| async move {
        ui.list.set_viewport(768, 1024).await?;
        open_dashboard(&ui).await?;
        ensure!(ui.list.has_load_more_button().await?, "load more button missing on tablet");
        ensure!(ui.list.is_page_loaded().await?, "dashboard heading does not match on tablet");
        Ok(())
    })
    .await
}
