use serde::Serialize;
use tracing::debug;

use crate::coerce::coerce_value;
use crate::model::LineItem;

/// Derived invoice amounts, kept at full precision. Round only when
/// displaying (see [`crate::format_money`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub discount: f64,
    pub tax: f64,
    pub total: f64,
}

/// Compute invoice totals.
///
/// Order of operations is fixed: the discount comes off the subtotal
/// first, then tax is charged on the discounted amount.
pub fn compute_totals(
    items: &[LineItem],
    discount_rate_percent: f64,
    tax_rate_percent: f64,
) -> InvoiceTotals {
    let subtotal: f64 = items.iter().map(LineItem::amount).sum();
    let discount = subtotal * coerce_value(discount_rate_percent) / 100.0;
    let taxable = subtotal - discount;
    let tax = taxable * coerce_value(tax_rate_percent) / 100.0;
    let total = subtotal - discount + tax;

    debug!(
        items = items.len(),
        subtotal,
        discount,
        tax,
        total,
        "recomputed invoice totals"
    );

    InvoiceTotals {
        subtotal,
        discount,
        tax,
        total,
    }
}
