//! Plausibility gate around the current total

use crate::config::PlausibilityRatios;

/// Inclusive range of acceptable predicted totals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibilityBounds {
    pub min: f64,
    pub max: f64,
}

impl PlausibilityBounds {
    /// `[lower × total, upper × total]`
    pub fn around(total: f64, ratios: PlausibilityRatios) -> Self {
        Self {
            min: total * ratios.lower,
            max: total * ratios.upper,
        }
    }

    pub fn contains(&self, candidate: f64) -> bool {
        candidate.is_finite() && candidate >= self.min && candidate <= self.max
    }
}
