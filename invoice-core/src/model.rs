use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::coerce::{coerce_value, lenient_amount};
use crate::error::DraftError;
use crate::totals::{compute_totals, InvoiceTotals};

/// Notes text a fresh draft starts with.
pub const DEFAULT_NOTES: &str = "Thanks for your business!";

/// One billable row of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub quantity: f64,
    #[serde(default, alias = "price", deserialize_with = "lenient_amount")]
    pub unit_price: f64,
}

impl LineItem {
    /// Build an item, coercing quantity and price through the numeric
    /// boundary.
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        LineItem {
            description: description.into(),
            quantity: coerce_value(quantity),
            unit_price: coerce_value(unit_price),
        }
    }

    /// `quantity × unit_price`, full precision.
    pub fn amount(&self) -> f64 {
        coerce_value(self.quantity) * coerce_value(self.unit_price)
    }
}

impl Default for LineItem {
    fn default() -> Self {
        LineItem {
            description: String::new(),
            quantity: 1.0,
            unit_price: 0.0,
        }
    }
}

/// Buyer or seller contact block. `phone` is stored without the
/// country-code prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Party {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartyRole {
    Buyer,
    Seller,
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartyRole::Buyer => f.write_str("buyer"),
            PartyRole::Seller => f.write_str("seller"),
        }
    }
}

/// Payment status shown on the invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Completed,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single source of truth for an invoice being edited.
///
/// Totals are never stored here; call [`InvoiceDraft::totals`] to derive
/// them from the current items and rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default = "today")]
    pub date: NaiveDate,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub buyer: Party,
    #[serde(default)]
    pub seller: Party,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub tax_rate_percent: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub discount_rate_percent: f64,
    #[serde(default)]
    pub notes: String,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl InvoiceDraft {
    /// A fresh draft dated `date`, with one empty item and zero rates.
    pub fn new(date: NaiveDate) -> Self {
        InvoiceDraft {
            invoice_number: default_invoice_number(date),
            date,
            status: InvoiceStatus::Pending,
            buyer: Party::default(),
            seller: Party::default(),
            items: vec![LineItem::default()],
            tax_rate_percent: 0.0,
            discount_rate_percent: 0.0,
            notes: DEFAULT_NOTES.to_string(),
        }
    }

    /// Derive totals from the current items and rates.
    pub fn totals(&self) -> InvoiceTotals {
        compute_totals(
            &self.items,
            self.discount_rate_percent,
            self.tax_rate_percent,
        )
    }

    /// Parse a draft from JSON. A missing invoice number falls back to
    /// the draft date.
    pub fn from_json(json: &str) -> Result<Self, DraftError> {
        let mut draft: InvoiceDraft = serde_json::from_str(json)?;
        if draft.invoice_number.trim().is_empty() {
            draft.invoice_number = default_invoice_number(draft.date);
        }
        Ok(draft)
    }

    pub fn to_json_pretty(&self) -> Result<String, DraftError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        InvoiceDraft::new(today())
    }
}

fn default_invoice_number(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
