use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::coerce::coerce_amount;
use crate::format::DisplaySettings;
use crate::model::{InvoiceDraft, InvoiceStatus, LineItem, Party, PartyRole};
use crate::phone::{is_valid_phone, strip_phone_prefix, PHONE_ERROR_MESSAGE};
use crate::totals::InvoiceTotals;

/// Editable text fields of a [`Party`]. The phone number has its own
/// entry point because it is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyField {
    Name,
    Address,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Description,
    Quantity,
    UnitPrice,
}

/// Snapshot handed to the preview and export steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceView {
    pub draft: InvoiceDraft,
    pub totals: InvoiceTotals,
}

/// Owns the draft being edited and applies field-level mutations.
///
/// Numeric input arrives as raw text and is coerced on the way in. Phone
/// input is stripped of the display prefix and validated; a failure only
/// raises the per-party flag, it never rejects the edit.
#[derive(Debug, Clone)]
pub struct InvoiceForm {
    draft: InvoiceDraft,
    settings: DisplaySettings,
    buyer_phone_error: bool,
    seller_phone_error: bool,
}

impl InvoiceForm {
    pub fn new(settings: DisplaySettings) -> Self {
        Self::with_draft(InvoiceDraft::default(), settings)
    }

    /// Start from an existing draft. Non-empty phone numbers are
    /// validated immediately.
    pub fn with_draft(draft: InvoiceDraft, settings: DisplaySettings) -> Self {
        let buyer_phone_error = !draft.buyer.phone.is_empty()
            && !is_valid_phone(&draft.buyer.phone);
        let seller_phone_error = !draft.seller.phone.is_empty()
            && !is_valid_phone(&draft.seller.phone);
        InvoiceForm {
            draft,
            settings,
            buyer_phone_error,
            seller_phone_error,
        }
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn into_draft(self) -> InvoiceDraft {
        self.draft
    }

    pub fn set_date(&mut self, date: NaiveDate) -> &mut Self {
        self.draft.date = date;
        self
    }

    pub fn set_status(&mut self, status: InvoiceStatus) -> &mut Self {
        self.draft.status = status;
        self
    }

    pub fn set_invoice_number(&mut self, number: &str) -> &mut Self {
        self.draft.invoice_number = number.to_string();
        self
    }

    pub fn set_notes(&mut self, notes: &str) -> &mut Self {
        self.draft.notes = notes.to_string();
        self
    }

    pub fn set_party_field(
        &mut self,
        role: PartyRole,
        field: PartyField,
        value: &str,
    ) -> &mut Self {
        let party = self.party_mut(role);
        let slot = match field {
            PartyField::Name => &mut party.name,
            PartyField::Address => &mut party.address,
            PartyField::Email => &mut party.email,
        };
        *slot = value.to_string();
        self
    }

    /// Store a phone number typed into the prefixed field and refresh the
    /// party's error flag.
    pub fn set_party_phone(&mut self, role: PartyRole, raw: &str) -> &mut Self {
        let phone = strip_phone_prefix(raw, &self.settings.phone_prefix);
        let invalid = !is_valid_phone(&phone);
        if invalid {
            debug!(%role, "phone number failed validation");
        }
        self.party_mut(role).phone = phone;
        match role {
            PartyRole::Buyer => self.buyer_phone_error = invalid,
            PartyRole::Seller => self.seller_phone_error = invalid,
        }
        self
    }

    /// Append a blank item and return its index.
    pub fn add_item(&mut self) -> usize {
        self.draft.items.push(LineItem::default());
        self.draft.items.len() - 1
    }

    /// Remove the item at `index`. Out-of-range indices are ignored.
    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        if index < self.draft.items.len() {
            Some(self.draft.items.remove(index))
        } else {
            warn!(
                index,
                len = self.draft.items.len(),
                "ignoring removal of missing line item"
            );
            None
        }
    }

    /// Update one field of an item from raw input. Returns `false` when
    /// there is no item at `index`.
    pub fn update_item(&mut self, index: usize, field: ItemField, raw: &str) -> bool {
        let Some(item) = self.draft.items.get_mut(index) else {
            warn!(index, "ignoring edit of missing line item");
            return false;
        };
        match field {
            ItemField::Description => item.description = raw.to_string(),
            ItemField::Quantity => item.quantity = coerce_amount(raw),
            ItemField::UnitPrice => item.unit_price = coerce_amount(raw),
        }
        true
    }

    pub fn set_tax_rate(&mut self, raw: &str) -> &mut Self {
        self.draft.tax_rate_percent = coerce_amount(raw);
        self
    }

    pub fn set_discount_rate(&mut self, raw: &str) -> &mut Self {
        self.draft.discount_rate_percent = coerce_amount(raw);
        self
    }

    pub fn phone_error(&self, role: PartyRole) -> bool {
        match role {
            PartyRole::Buyer => self.buyer_phone_error,
            PartyRole::Seller => self.seller_phone_error,
        }
    }

    pub fn phone_error_message(&self, role: PartyRole) -> Option<&'static str> {
        self.phone_error(role).then_some(PHONE_ERROR_MESSAGE)
    }

    /// Current totals, derived on every call.
    pub fn totals(&self) -> InvoiceTotals {
        self.draft.totals()
    }

    /// Current draft plus freshly computed totals.
    pub fn view(&self) -> InvoiceView {
        InvoiceView {
            draft: self.draft.clone(),
            totals: self.draft.totals(),
        }
    }

    fn party_mut(&mut self, role: PartyRole) -> &mut Party {
        match role {
            PartyRole::Buyer => &mut self.draft.buyer,
            PartyRole::Seller => &mut self.draft.seller,
        }
    }
}

impl Default for InvoiceForm {
    fn default() -> Self {
        InvoiceForm::new(DisplaySettings::default())
    }
}
