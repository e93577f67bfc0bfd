/// RGB color, each component 0.0–1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b }
    }

    pub fn gray(level: f64) -> Self {
        Color::rgb(level, level, level)
    }

    /// Build from a `0xRRGGBB` value.
    pub fn hex(value: u32) -> Self {
        let channel = |shift: u32| ((value >> shift) & 0xFF) as f64 / 255.0;
        Color::rgb(channel(16), channel(8), channel(0))
    }

    pub fn black() -> Self {
        Color::gray(0.0)
    }

    pub fn white() -> Self {
        Color::gray(1.0)
    }
}
