// Unit tests for the dashboard locator contract
//
// Page objects address the dashboard through test ids, row selectors and text
// needles. These tests pin the selectors a browser driver will evaluate, and the
// values the create form types into its inputs.

use billpay_e2e::ui::constants::{DATETIME_LOCAL_PLACEHOLDER, TEST_ID_LOAD_MORE};
use billpay_e2e::ui::pages::due_date_input_value;
use billpay_e2e::ui::{CreateInvoiceModal, FormAmount, InvoiceForm, InvoiceListPage, Locator};

#[test]
fn test_static_page_locators() {
    assert_eq!(InvoiceListPage::heading(), Locator::Heading(1));
    assert_eq!(InvoiceListPage::load_more_button(), Locator::test_id(TEST_ID_LOAD_MORE));
    assert_eq!(CreateInvoiceModal::modal(), Locator::test_id("create-modal"));
    assert_eq!(CreateInvoiceModal::cancel_button(), Locator::button("cancel"));
}

#[test]
fn test_row_and_pay_button_selectors() {
    let id = "inv-1760000000000";
    assert_eq!(
        InvoiceListPage::row_selector(id),
        format!("[data-testid=\"invoice-row-{}\"]", id)
    );
    assert_eq!(
        InvoiceListPage::fallback_row_selector(id),
        format!("tr[data-invoice-id=\"{}\"]", id)
    );

    match InvoiceListPage::pay_button(id) {
        Locator::Button { scope, label } => {
            assert_eq!(scope, Some(InvoiceListPage::row_selector(id)));
            assert_eq!(label, "pay");
        }
        other => panic!("unexpected pay button locator {}", other),
    }
}

#[test]
fn test_selectors_survive_quotes_in_ids() {
    let selector = InvoiceListPage::row_selector("inv-\"x\"");
    assert_eq!(selector, "[data-testid=\"invoice-row-inv-\\\"x\\\"\"]");

    let js = Locator::css(selector).to_js();
    assert!(js.starts_with("Array.from(document.querySelectorAll(\""));
    assert!(js.ends_with("\"))"));
}

#[test]
fn test_row_locator_excludes_header() {
    match InvoiceListPage::invoice_rows() {
        Locator::CssWithoutText { css, excluded } => {
            assert!(css.contains("[data-testid^=\"invoice-row-\"]"));
            assert!(css.contains("tr[data-invoice-id]"));
            assert_eq!(excluded, vec!["Status".to_string(), "Amount".to_string()]);
        }
        other => panic!("unexpected row locator {}", other),
    }

    let js = InvoiceListPage::invoice_rows().to_js();
    assert!(js.contains(".filter(el => ![\"Status\", \"Amount\"]"));
}

#[test]
fn test_empty_state_needles_are_lowercased() {
    let js = InvoiceListPage::empty_state().to_js();
    assert!(js.contains("[\"no invoice\", \"empty\", \"no data\"]"));
    assert!(js.contains("toLowerCase()"));
}

#[test]
fn test_heading_matches_aria_headings() {
    let js = Locator::Heading(1).to_js();
    assert!(js.contains("h1, [role=\\\"heading\\\"][aria-level=\\\"1\\\"]"));
}

#[test]
fn test_due_date_input_value() {
    let iso = "2026-10-17T09:30:00.000Z";

    assert_eq!(
        due_date_input_value(iso, Some(DATETIME_LOCAL_PLACEHOLDER)),
        "2026-10-17T09:30"
    );
    assert_eq!(
        due_date_input_value(iso, Some("Due (YYYY-MM-DDTHH:mm)")),
        "2026-10-17T09:30"
    );
    assert_eq!(due_date_input_value(iso, Some("Due date")), iso);
    assert_eq!(due_date_input_value(iso, None), iso);
    assert_eq!(due_date_input_value("2026-10", Some(DATETIME_LOCAL_PLACEHOLDER)), "2026-10");
}

#[test]
fn test_form_builder() {
    let form = InvoiceForm::new("inv-1", "cust-1", FormAmount::Minor(1100))
        .currency("AED")
        .due_date("2026-10-17T09:30:00.000Z");

    assert_eq!(form.amount.input_value(), "11");
    assert_eq!(form.currency.as_deref(), Some("AED"));
    assert!(form.due_date.is_some());

    let bare = InvoiceForm::new("inv-2", "cust-2", FormAmount::Major("12.50".to_string()));
    assert_eq!(bare.amount.input_value(), "12.50");
    assert_eq!(bare.currency, None);
    assert_eq!(bare.due_date, None);
}
