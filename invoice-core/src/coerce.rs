//! Numeric input boundary.
//!
//! Every number that enters the model (form keystrokes, JSON drafts) goes
//! through here. Anything that is not a finite, non-negative number becomes
//! `0.0`, so the totals never see `NaN`.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Parse raw form input into a finite, non-negative number.
/// Empty, unparsable, non-finite or negative input yields `0.0`.
pub fn coerce_amount(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) => coerce_value(v),
        Err(_) => 0.0,
    }
}

/// Apply the same rule as [`coerce_amount`] to an already-numeric value.
pub fn coerce_value(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Serde adapter for numeric fields that may arrive as numbers, numeric
/// strings, empty strings, `null`, or anything else.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Raw::Number(v)) => coerce_value(v),
        Some(Raw::Text(s)) => coerce_amount(&s),
        Some(Raw::Other(_)) | None => 0.0,
    })
}
