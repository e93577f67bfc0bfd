/// The builtin PDF fonts the invoice layouts use. Builtin fonts need no
/// embedding; every viewer ships them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl BuiltinFont {
    pub const ALL: [BuiltinFont; 3] = [
        BuiltinFont::Helvetica,
        BuiltinFont::HelveticaBold,
        BuiltinFont::HelveticaOblique,
    ];

    /// Resource name used in content streams (e.g. "F1").
    pub fn pdf_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "F1",
            BuiltinFont::HelveticaBold => "F2",
            BuiltinFont::HelveticaOblique => "F3",
        }
    }

    /// PDF BaseFont name.
    pub fn pdf_base_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
        }
    }
}

/// Font and size for a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: BuiltinFont,
    pub font_size: f64,
}

impl TextStyle {
    pub fn regular(font_size: f64) -> Self {
        TextStyle { font: BuiltinFont::Helvetica, font_size }
    }

    pub fn bold(font_size: f64) -> Self {
        TextStyle { font: BuiltinFont::HelveticaBold, font_size }
    }

    pub fn oblique(font_size: f64) -> Self {
        TextStyle { font: BuiltinFont::HelveticaOblique, font_size }
    }

    /// Width of `text` in points in this style.
    pub fn measure(&self, text: &str) -> f64 {
        FontMetrics::measure_text(text, self.font, self.font_size)
    }

    pub fn line_height(&self) -> f64 {
        FontMetrics::line_height(self.font_size)
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle::regular(12.0)
    }
}

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em (Adobe AFM).
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for ASCII 32..=126 (Adobe AFM).
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for anything outside printable ASCII.
const FALLBACK_WIDTH: u16 = 556;

pub struct FontMetrics;

impl FontMetrics {
    /// Advance width of `ch` in 1/1000 em.
    pub fn char_width(font: BuiltinFont, ch: char) -> u16 {
        let code = ch as u32;
        if !(32..=126).contains(&code) {
            return FALLBACK_WIDTH;
        }
        let index = (code - 32) as usize;
        match font {
            BuiltinFont::Helvetica | BuiltinFont::HelveticaOblique => {
                HELVETICA_WIDTHS[index]
            }
            BuiltinFont::HelveticaBold => HELVETICA_BOLD_WIDTHS[index],
        }
    }

    /// Width of `text` in points.
    pub fn measure_text(text: &str, font: BuiltinFont, font_size: f64) -> f64 {
        let units: u32 = text
            .chars()
            .map(|ch| Self::char_width(font, ch) as u32)
            .sum();
        units as f64 * font_size / 1000.0
    }

    /// Baseline-to-baseline distance (1.2 × size).
    pub fn line_height(font_size: f64) -> f64 {
        font_size * 1.2
    }
}

/// Greedy word wrap of `text` into lines no wider than `max_width`.
/// Explicit newlines are kept; a single word wider than the line is
/// placed on its own line rather than split.
pub fn wrap_text(text: &str, font: BuiltinFont, font_size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if current.is_empty()
                || FontMetrics::measure_text(&candidate, font, font_size) <= max_width
            {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_names_are_distinct() {
        let names: Vec<_> = BuiltinFont::ALL.iter().map(|f| f.pdf_name()).collect();
        assert_eq!(names, ["F1", "F2", "F3"]);
    }

    #[test]
    fn bold_is_wider() {
        let regular = FontMetrics::measure_text("TOTAL", BuiltinFont::Helvetica, 12.0);
        let bold = FontMetrics::measure_text("TOTAL", BuiltinFont::HelveticaBold, 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn measure_known_width() {
        // "0" is 556 units in Helvetica.
        let w = FontMetrics::measure_text("00", BuiltinFont::Helvetica, 10.0);
        assert!((w - 11.12).abs() < 1e-9);
    }

    #[test]
    fn wrap_respects_width_and_newlines() {
        let lines = wrap_text(
            "Thanks for your business!\nPay by UPI",
            BuiltinFont::Helvetica,
            10.0,
            60.0,
        );
        assert!(lines.len() >= 3);
        assert_eq!(lines.last().unwrap(), "Pay by UPI");
        for line in &lines {
            let w = FontMetrics::measure_text(line, BuiltinFont::Helvetica, 10.0);
            assert!(w <= 60.0 || !line.contains(' '));
        }
    }

    #[test]
    fn wrap_empty_text_is_empty() {
        assert!(wrap_text("", BuiltinFont::Helvetica, 10.0, 100.0).is_empty());
    }
}
