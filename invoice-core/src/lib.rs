pub mod coerce;
pub mod error;
pub mod form;
pub mod format;
pub mod model;
pub mod phone;
pub mod totals;

pub use coerce::{coerce_amount, coerce_value};
pub use error::DraftError;
pub use form::{InvoiceForm, InvoiceView, ItemField, PartyField};
pub use format::{format_money, DisplaySettings};
pub use model::{InvoiceDraft, InvoiceStatus, LineItem, Party, PartyRole};
pub use phone::{format_phone, is_valid_phone};
pub use totals::{compute_totals, InvoiceTotals};
