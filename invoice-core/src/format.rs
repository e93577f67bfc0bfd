use serde::Deserialize;

/// Fixed presentation settings: one currency symbol and one phone prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub currency_symbol: String,
    pub phone_prefix: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: "₹".to_string(),
            phone_prefix: "+91 ".to_string(),
        }
    }
}

impl DisplaySettings {
    pub fn money(&self, amount: f64) -> String {
        format_money(amount, &self.currency_symbol)
    }
}

/// Currency symbol followed by the amount rounded to two decimals.
pub fn format_money(amount: f64, symbol: &str) -> String {
    // Rounding can produce "-0.00" for tiny negative noise.
    let rounded = (amount * 100.0).round() / 100.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}{:.2}", symbol, rounded)
}
