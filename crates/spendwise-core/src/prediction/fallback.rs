//! Local fallback estimates
//!
//! Used whenever the estimator is missing, unreachable, or untrustworthy.
//! Both estimates always produce a finite, non-negative value.

use rand::Rng;

use crate::config::FallbackTier;

/// Keyword families for description estimates: (keywords, base, spread)
const DESCRIPTION_RULES: &[(&[&str], usize, usize)] = &[
    (&["food", "restaurant", "grocery", "cafe", "meal"], 15, 35),
    (&["bus", "train", "taxi", "transport", "fuel", "gas"], 20, 40),
    (&["electric", "water", "internet", "phone", "bill"], 50, 100),
    (&["movie", "game", "entertainment", "netflix", "spotify"], 10, 30),
    (&["doctor", "medical", "pharmacy", "hospital"], 30, 70),
    (&["shop", "store", "market", "mall", "clothing"], 25, 60),
];

const DEFAULT_DESCRIPTION_RULE: (usize, usize) = (25, 50);

/// Banded multiplier estimator
#[derive(Debug, Clone)]
pub struct FallbackEstimator {
    tiers: Vec<FallbackTier>,
}

impl FallbackEstimator {
    /// Tiers are checked in order; the first one that applies wins
    pub fn new(tiers: Vec<FallbackTier>) -> Self {
        Self { tiers }
    }

    /// Multiplier band `(min, max)` for a total
    pub fn band_for(&self, total: f64) -> (f64, f64) {
        self.tiers
            .iter()
            .find(|t| t.applies_to(total))
            .map(|t| (t.min_multiplier, t.max_multiplier))
            .unwrap_or((1.0, 1.0))
    }

    /// `total × m` with `m` drawn uniformly from the total's band
    ///
    /// Non-positive or non-finite totals yield 0.
    pub fn estimate<R: Rng + ?Sized>(&self, total: f64, rng: &mut R) -> f64 {
        if !total.is_finite() || total <= 0.0 {
            return 0.0;
        }

        let (min, max) = self.band_for(total);
        let u: f64 = rng.random();
        total * (min + u * (max - min))
    }

    /// Keyword heuristic for a free-text description
    pub fn estimate_description(&self, description: &str) -> f64 {
        let len = description.chars().count();
        let lowered = description.to_lowercase();

        let (base, spread) = DESCRIPTION_RULES
            .iter()
            .find(|(keywords, _, _)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(_, base, spread)| (*base, *spread))
            .unwrap_or(DEFAULT_DESCRIPTION_RULE);

        (base + len % spread) as f64
    }
}
