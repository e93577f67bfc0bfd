//! Vector rendering of an invoice preview.
//!
//! Lays the draft out top to bottom: seller and amount due, billed-to party
//! with invoice number and date, the items table, totals and notes. Content
//! that runs past the bottom margin continues on a fresh page.

use std::io::{self, Write};

use invoice_core::{format_money, format_phone, InvoiceDraft, Party};
use tracing::debug;

use crate::document::PdfDocument;
use crate::fonts::{wrap_text, TextStyle};
use crate::graphics::Color;
use crate::paginate::Size;
use crate::writer::format_number;

const TITLE_COLOR: u32 = 0x295F98;
const AMOUNT_COLOR: u32 = 0x2E7D32;
const DIVIDER_GRAY: f64 = 0.8;

const BODY_SIZE: f64 = 10.0;
const HEADING_SIZE: f64 = 13.0;
const AMOUNT_SIZE: f64 = 22.0;
const TITLE_SIZE: f64 = 18.0;
const SECTION_GAP: f64 = 12.0;
const ROW_GAP: f64 = 4.0;

/// Presentation options for [`render_preview`].
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewStyle {
    /// Heading drawn above the invoice; empty to omit.
    pub title: String,
    /// Currency prefix. Builtin fonts only cover Latin-1, so the default
    /// spells the rupee out.
    pub currency_symbol: String,
    pub phone_prefix: String,
    pub page: Size,
    pub margin: f64,
}

impl Default for PreviewStyle {
    fn default() -> Self {
        PreviewStyle {
            title: String::new(),
            currency_symbol: "Rs. ".to_string(),
            phone_prefix: "+91 ".to_string(),
            page: Size::A4,
            margin: 40.0,
        }
    }
}

impl PreviewStyle {
    fn money(&self, amount: f64) -> String {
        format_money(amount, &self.currency_symbol)
    }

    fn content_width(&self) -> f64 {
        self.page.width - 2.0 * self.margin
    }
}

/// Draw `draft` onto new pages of `doc`. Every page opened here is closed
/// before returning.
pub fn render_preview<W: Write>(
    doc: &mut PdfDocument<W>,
    draft: &InvoiceDraft,
    style: &PreviewStyle,
) -> io::Result<()> {
    let first_page = doc.page_count();
    let mut cursor = Cursor::start(doc, style)?;
    let totals = draft.totals();

    if !style.title.is_empty() {
        let text = TextStyle::bold(TITLE_SIZE);
        cursor.reserve(text.line_height())?;
        let x = style.margin + (style.content_width() - text.measure(&style.title)) / 2.0;
        cursor.colored(Color::hex(TITLE_COLOR), |c| c.text(&style.title, x, &text));
        cursor.advance(text.line_height() + SECTION_GAP);
    }

    // Seller on the left, amount due on the right.
    let top = cursor.y;
    let heading = TextStyle::bold(HEADING_SIZE);
    let amount = TextStyle::bold(AMOUNT_SIZE);
    let right = style.page.width - style.margin;
    cursor.reserve(heading.line_height() + amount.line_height())?;
    cursor.text_right("Amount Due:", right, &heading);
    cursor.advance(heading.line_height());
    let due = style.money(totals.total);
    cursor.colored(Color::hex(AMOUNT_COLOR), |c| c.text_right(&due, right, &amount));
    let below_amount = cursor.y - amount.line_height();
    cursor.y = top;
    let start = cursor.doc.page_count();
    cursor.party(&draft.seller, None)?;
    cursor.settle(start, below_amount);
    cursor.divider()?;

    // Buyer on the left, invoice reference on the right.
    let top = cursor.y;
    let body = TextStyle::regular(BODY_SIZE);
    cursor.reserve(2.0 * body.line_height())?;
    let number = format!("Invoice Number: {}", draft.invoice_number);
    let date = format!("Date Of Issue: {}", draft.date.format("%d/%m/%Y"));
    cursor.text_right(&number, right, &body);
    cursor.advance(body.line_height());
    cursor.text_right(&date, right, &body);
    let below_reference = cursor.y - body.line_height();
    cursor.y = top;
    let start = cursor.doc.page_count();
    cursor.party(&draft.buyer, Some("Billed to:"))?;
    cursor.settle(start, below_reference);
    cursor.divider()?;

    cursor.items(draft)?;
    cursor.divider()?;

    let half = style.margin + style.content_width() / 2.0;
    for (label, value) in [
        ("SUBTOTAL:", totals.subtotal),
        ("DISCOUNT:", totals.discount),
        ("TAX:", totals.tax),
    ] {
        cursor.reserve(body.line_height())?;
        cursor.text(label, half, &body);
        cursor.text_right(&style.money(value), right, &body);
        cursor.advance(body.line_height() + ROW_GAP);
    }
    cursor.reserve(heading.line_height())?;
    cursor.text("TOTAL:", half, &heading);
    cursor.text_right(&style.money(totals.total), right, &heading);
    cursor.advance(heading.line_height());
    cursor.divider()?;

    let label = TextStyle::bold(BODY_SIZE + 1.0);
    cursor.reserve(label.line_height())?;
    cursor.text("Notes", style.margin, &label);
    cursor.advance(label.line_height());
    for line in wrap_text(&draft.notes, body.font, body.font_size, style.content_width()) {
        cursor.reserve(body.line_height())?;
        cursor.text(&line, style.margin, &body);
        cursor.advance(body.line_height());
    }

    cursor.doc.end_page()?;
    debug!(
        pages = doc.page_count() - first_page,
        items = draft.items.len(),
        "rendered invoice preview"
    );
    Ok(())
}

/// Vertical layout position on the open page. `y` is the top of the next
/// line in PDF coordinates.
struct Cursor<'a, W: Write> {
    doc: &'a mut PdfDocument<W>,
    style: &'a PreviewStyle,
    y: f64,
}

impl<'a, W: Write> Cursor<'a, W> {
    fn start(doc: &'a mut PdfDocument<W>, style: &'a PreviewStyle) -> io::Result<Self> {
        doc.begin_page(style.page.width, style.page.height)?;
        Ok(Cursor {
            doc,
            style,
            y: style.page.height - style.margin,
        })
    }

    fn top(&self) -> f64 {
        self.style.page.height - self.style.margin
    }

    /// Break to a new page unless `height` fits above the bottom margin.
    /// A block taller than a whole page is drawn anyway.
    fn reserve(&mut self, height: f64) -> io::Result<()> {
        if self.y - height < self.style.margin && self.y < self.top() {
            self.doc
                .begin_page(self.style.page.width, self.style.page.height)?;
            self.y = self.top();
        }
        Ok(())
    }

    fn advance(&mut self, dy: f64) {
        self.y -= dy;
    }

    /// Drop below a right-hand column that ended at `right_bottom` on the
    /// page that was open when `closed_pages` pages were finished. Once the
    /// left column has broken onto a later page the right column is above
    /// it already.
    fn settle(&mut self, closed_pages: usize, right_bottom: f64) {
        if self.doc.page_count() == closed_pages {
            self.y = self.y.min(right_bottom);
        }
    }

    /// Left-hand column width when a right-hand column shares the rows.
    fn half_width(&self) -> f64 {
        self.style.content_width() / 2.0 - ROW_GAP
    }

    fn baseline(&self, style: &TextStyle) -> f64 {
        self.y - style.font_size
    }

    fn text(&mut self, text: &str, x: f64, style: &TextStyle) {
        let y = self.baseline(style);
        self.doc.place_text_styled(text, x, y, style);
    }

    fn text_right(&mut self, text: &str, right: f64, style: &TextStyle) {
        self.text(text, right - style.measure(text), style);
    }

    fn colored(&mut self, color: Color, draw: impl FnOnce(&mut Self)) {
        self.doc.save_state().set_fill_color(color);
        draw(self);
        self.doc.restore_state();
    }

    fn divider(&mut self) -> io::Result<()> {
        self.reserve(SECTION_GAP * 2.0)?;
        self.advance(SECTION_GAP);
        let (left, right) = (self.style.margin, self.style.page.width - self.style.margin);
        let y = self.y;
        self.doc
            .save_state()
            .set_stroke_color(Color::gray(DIVIDER_GRAY))
            .set_line_width(0.75)
            .move_to(left, y)
            .line_to(right, y)
            .stroke()
            .restore_state();
        self.advance(SECTION_GAP);
        Ok(())
    }

    /// Name in bold, then address, phone and email, skipping blanks. Each
    /// line wraps within the left half of the content width.
    fn party(&mut self, party: &Party, label: Option<&str>) -> io::Result<()> {
        let body = TextStyle::regular(BODY_SIZE);
        if let Some(label) = label {
            self.wrapped(label, &TextStyle::bold(BODY_SIZE))?;
        }
        self.wrapped(&party.name, &TextStyle::bold(HEADING_SIZE))?;
        let phone = format_phone(&party.phone, &self.style.phone_prefix);
        for line in [party.address.as_str(), phone.as_str(), party.email.as_str()] {
            self.wrapped(line, &body)?;
        }
        Ok(())
    }

    fn wrapped(&mut self, text: &str, style: &TextStyle) -> io::Result<()> {
        let x = self.style.margin;
        for line in wrap_text(text, style.font, style.font_size, self.half_width()) {
            self.reserve(style.line_height())?;
            self.text(&line, x, style);
            self.advance(style.line_height());
        }
        Ok(())
    }

    /// QTY | DESCRIPTION | PRICE | AMOUNT on a 2/6/2/2 grid. Long
    /// descriptions wrap inside their column.
    fn items(&mut self, draft: &InvoiceDraft) -> io::Result<()> {
        let width = self.style.content_width();
        let left = self.style.margin;
        let desc_x = left + width * 2.0 / 12.0;
        let price_right = left + width * 10.0 / 12.0;
        let amount_right = left + width;
        let desc_width = width * 6.0 / 12.0 - ROW_GAP;

        let head = TextStyle::bold(BODY_SIZE);
        self.reserve(head.line_height())?;
        self.text("QTY", left, &head);
        self.text("DESCRIPTION", desc_x, &head);
        self.text_right("PRICE", price_right, &head);
        self.text_right("AMOUNT", amount_right, &head);
        self.advance(head.line_height() + ROW_GAP);

        let body = TextStyle::regular(BODY_SIZE);
        for item in &draft.items {
            let mut lines = wrap_text(&item.description, body.font, body.font_size, desc_width);
            if lines.is_empty() {
                lines.push(String::new());
            }
            self.reserve(lines.len() as f64 * body.line_height())?;
            self.text(&format_number(item.quantity), left, &body);
            self.text_right(&self.style.money(item.unit_price), price_right, &body);
            self.text_right(&self.style.money(item.amount()), amount_right, &body);
            for line in &lines {
                self.text(line, desc_x, &body);
                self.advance(body.line_height());
            }
            self.advance(ROW_GAP);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_is_latin1_safe() {
        let style = PreviewStyle::default();
        assert!(style.currency_symbol.is_ascii());
        assert_eq!(style.money(12.5), "Rs. 12.50");
        assert_eq!(style.page, Size::A4);
    }

    #[test]
    fn content_width_excludes_margins() {
        let style = PreviewStyle {
            page: Size::new(500.0, 700.0),
            margin: 50.0,
            ..PreviewStyle::default()
        };
        assert_eq!(style.content_width(), 400.0);
    }

    fn long_party() -> Party {
        Party {
            name: "Sinha Brothers Water Supply".into(),
            address: "Plot 7, Industrial Area Phase Two, Near Old Railway Crossing, Ranchi"
                .into(),
            phone: "9876543210".into(),
            email: "orders@example.com".into(),
        }
    }

    #[test]
    fn party_lines_wrap_within_left_half() {
        let style = PreviewStyle::default();
        let mut doc = PdfDocument::new(Vec::new()).unwrap();
        let mut cursor = Cursor::start(&mut doc, &style).unwrap();
        let top = cursor.y;
        cursor.party(&long_party(), None).unwrap();
        let body = TextStyle::regular(BODY_SIZE);
        let name = TextStyle::bold(HEADING_SIZE);
        // name, at least two address lines, phone, email
        let unwrapped = name.line_height() + 3.0 * body.line_height();
        assert!(top - cursor.y >= unwrapped + body.line_height() - 1e-9);
    }

    #[test]
    fn settle_keeps_position_after_page_break() {
        let style = PreviewStyle {
            page: Size::new(300.0, 120.0),
            margin: 20.0,
            ..PreviewStyle::default()
        };
        let mut doc = PdfDocument::new(Vec::new()).unwrap();
        let mut cursor = Cursor::start(&mut doc, &style).unwrap();
        cursor.y = 40.0;
        let right_bottom = 5.0;
        let start = cursor.doc.page_count();
        cursor.party(&long_party(), None).unwrap();
        assert!(cursor.doc.page_count() > start);
        let after_party = cursor.y;
        cursor.settle(start, right_bottom);
        assert_eq!(cursor.y, after_party);
        assert!(cursor.y > right_bottom);
    }

    #[test]
    fn settle_clamps_on_same_page() {
        let style = PreviewStyle::default();
        let mut doc = PdfDocument::new(Vec::new()).unwrap();
        let mut cursor = Cursor::start(&mut doc, &style).unwrap();
        let start = cursor.doc.page_count();
        cursor.advance(20.0);
        let right_bottom = cursor.y - 50.0;
        cursor.settle(start, right_bottom);
        assert_eq!(cursor.y, right_bottom);
    }
}
