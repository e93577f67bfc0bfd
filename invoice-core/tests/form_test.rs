use chrono::NaiveDate;
use invoice_core::{DisplaySettings, InvoiceForm, InvoiceStatus, ItemField, PartyField, PartyRole};

fn form() -> InvoiceForm {
    InvoiceForm::new(DisplaySettings::default())
}

// -------------------------------------------------------
// Items
// -------------------------------------------------------

#[test]
fn starts_with_one_blank_item() {
    let view = form().view();
    assert_eq!(view.draft.items.len(), 1);
    assert_eq!(view.draft.items[0].quantity, 1.0);
    assert_eq!(view.totals.total, 0.0);
}

#[test]
fn editing_items_updates_totals() {
    let mut form = form();
    form.update_item(0, ItemField::Description, "20L can");
    form.update_item(0, ItemField::Quantity, "4");
    form.update_item(0, ItemField::UnitPrice, "30");
    let idx = form.add_item();
    form.update_item(idx, ItemField::UnitPrice, "15.5");

    let view = form.view();
    assert_eq!(view.draft.items[0].description, "20L can");
    assert_eq!(view.totals.subtotal, 120.0 + 15.5);
}

#[test]
fn junk_numeric_input_is_zero() {
    let mut form = form();
    form.update_item(0, ItemField::Quantity, "two");
    form.update_item(0, ItemField::UnitPrice, "");
    form.set_tax_rate("abc");
    form.set_discount_rate("-10");
    let view = form.view();
    assert_eq!(view.draft.items[0].quantity, 0.0);
    assert_eq!(view.draft.items[0].unit_price, 0.0);
    assert_eq!(view.draft.tax_rate_percent, 0.0);
    assert_eq!(view.draft.discount_rate_percent, 0.0);
    assert!(view.totals.total.is_finite());
}

#[test]
fn removing_only_item_leaves_zero_totals() {
    let mut form = form();
    form.update_item(0, ItemField::UnitPrice, "99");
    let removed = form.remove_item(0);
    assert!(removed.is_some());
    let view = form.view();
    assert!(view.draft.items.is_empty());
    assert_eq!(view.totals.subtotal, 0.0);
    assert_eq!(view.totals.discount, 0.0);
    assert_eq!(view.totals.tax, 0.0);
    assert_eq!(view.totals.total, 0.0);

    // Removing again from an empty list is harmless.
    assert!(form.remove_item(0).is_none());
}

#[test]
fn remove_keeps_order_of_remaining_items() {
    let mut form = form();
    form.update_item(0, ItemField::Description, "first");
    let second = form.add_item();
    form.update_item(second, ItemField::Description, "second");
    let third = form.add_item();
    form.update_item(third, ItemField::Description, "third");

    form.remove_item(1);
    let names: Vec<_> = form
        .draft()
        .items
        .iter()
        .map(|i| i.description.as_str())
        .collect();
    assert_eq!(names, ["first", "third"]);
}

// -------------------------------------------------------
// Rates and totals
// -------------------------------------------------------

#[test]
fn rates_apply_in_order() {
    let mut form = form();
    form.update_item(0, ItemField::UnitPrice, "100");
    form.set_discount_rate("10").set_tax_rate("10");
    let totals = form.totals();
    assert!((totals.discount - 10.0).abs() < 1e-9);
    assert!((totals.tax - 9.0).abs() < 1e-9);
    assert!((totals.total - 99.0).abs() < 1e-9);
}

// -------------------------------------------------------
// Parties and phone validation
// -------------------------------------------------------

#[test]
fn party_fields_are_stored_per_role() {
    let mut form = form();
    form.set_party_field(PartyRole::Buyer, PartyField::Name, "Asha Traders")
        .set_party_field(PartyRole::Seller, PartyField::Name, "Sinha Brothers")
        .set_party_field(PartyRole::Seller, PartyField::Email, "sales@sinha.in")
        .set_party_field(PartyRole::Buyer, PartyField::Address, "12 MG Road");
    let draft = form.draft();
    assert_eq!(draft.buyer.name, "Asha Traders");
    assert_eq!(draft.buyer.address, "12 MG Road");
    assert_eq!(draft.seller.name, "Sinha Brothers");
    assert_eq!(draft.seller.email, "sales@sinha.in");
}

#[test]
fn phone_validation_cases() {
    let mut form = form();

    form.set_party_phone(PartyRole::Buyer, "+91 98765432");
    assert!(form.phone_error(PartyRole::Buyer));
    assert_eq!(
        form.phone_error_message(PartyRole::Buyer),
        Some("Phone number must be 10 digits.")
    );

    form.set_party_phone(PartyRole::Buyer, "+91 9876543210");
    assert!(!form.phone_error(PartyRole::Buyer));
    assert_eq!(form.phone_error_message(PartyRole::Buyer), None);

    form.set_party_phone(PartyRole::Seller, "987-654-3210");
    assert!(!form.phone_error(PartyRole::Seller));
    assert_eq!(form.draft().seller.phone, "987-654-3210");
}

#[test]
fn invalid_phone_does_not_block_other_edits() {
    let mut form = form();
    form.set_party_phone(PartyRole::Seller, "123");
    form.set_notes("Pay within 7 days");
    form.update_item(0, ItemField::UnitPrice, "50");
    assert!(form.phone_error(PartyRole::Seller));
    assert_eq!(form.draft().notes, "Pay within 7 days");
    assert_eq!(form.totals().total, 50.0);
}

#[test]
fn clearing_phone_raises_error() {
    let mut form = form();
    form.set_party_phone(PartyRole::Buyer, "+91 ");
    assert_eq!(form.draft().buyer.phone, "");
    assert!(form.phone_error(PartyRole::Buyer));
}

// -------------------------------------------------------
// Header fields
// -------------------------------------------------------

#[test]
fn header_fields_update() {
    let mut form = form();
    let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
    form.set_date(date)
        .set_status(InvoiceStatus::Completed)
        .set_invoice_number("INV-7");
    let draft = form.into_draft();
    assert_eq!(draft.date, date);
    assert_eq!(draft.status, InvoiceStatus::Completed);
    assert_eq!(draft.invoice_number, "INV-7");
}
