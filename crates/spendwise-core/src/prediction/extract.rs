//! Number extraction from free-form estimator text

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"));

/// Return the leftmost unsigned decimal number in `raw`
///
/// Signs, thousands separators and exponents are not recognised: `"-5"`
/// yields 5 and `"1,200"` yields 1.
pub fn extract_number(raw: &str) -> Result<f64> {
    let found = NUMBER_RE
        .find(raw)
        .ok_or_else(|| Error::NoNumberFound(truncate(raw, 80)))?;

    found
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| Error::NoNumberFound(truncate(raw, 80)))
}

fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
