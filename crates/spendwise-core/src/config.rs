//! Predictor configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/spendwise/config/predictor.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Every key is optional in the override file; missing keys keep the
//! embedded defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/predictor.toml");

/// Settings for the external estimator call
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorSettings {
    /// Model identifier sent with every generate request
    pub model: String,
    /// Decoding temperature (low = near-deterministic)
    pub temperature: f64,
    /// Request timeout for a single generate call
    pub timeout: Duration,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            model: "mistral".to_string(),
            temperature: 0.1,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Ratios defining the plausibility band around the current total
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibilityRatios {
    pub lower: f64,
    pub upper: f64,
}

impl PlausibilityRatios {
    /// Symmetric band `[1 - variance, 1 + variance]`
    ///
    /// `variance` must lie in `(0, 1]`.
    pub fn symmetric(variance: f64) -> Result<Self> {
        if !variance.is_finite() || variance <= 0.0 || variance > 1.0 {
            return Err(Error::InvalidData(format!(
                "max_variance must be in (0, 1], got {}",
                variance
            )));
        }
        Ok(Self {
            lower: 1.0 - variance,
            upper: 1.0 + variance,
        })
    }
}

impl Default for PlausibilityRatios {
    fn default() -> Self {
        Self {
            lower: 0.5,
            upper: 1.5,
        }
    }
}

/// Rounding applied to assembled results
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundingPolicy {
    pub amount_decimals: u32,
    pub percent_decimals: u32,
}

impl RoundingPolicy {
    pub fn amount(&self, value: f64) -> f64 {
        round_to(value, self.amount_decimals)
    }

    pub fn percent(&self, value: f64) -> f64 {
        round_to(value, self.percent_decimals)
    }
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self {
            amount_decimals: 2,
            percent_decimals: 1,
        }
    }
}

/// Most fractional digits an `f64` amount can meaningfully carry
pub const MAX_DECIMALS: u32 = 15;

/// Round to a fixed number of fractional digits
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// One fallback multiplier band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackTier {
    /// Exclusive upper bound on the total; `None` for the open-ended last tier
    pub up_to: Option<f64>,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
}

impl FallbackTier {
    pub fn applies_to(&self, total: f64) -> bool {
        self.up_to.map_or(true, |limit| total < limit)
    }
}

/// Full predictor configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorConfig {
    pub estimator: EstimatorSettings,
    pub plausibility: PlausibilityRatios,
    pub rounding: RoundingPolicy,
    /// Fallback bands, narrowing as totals grow
    pub fallback_tiers: Vec<FallbackTier>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            estimator: EstimatorSettings::default(),
            plausibility: PlausibilityRatios::default(),
            rounding: RoundingPolicy::default(),
            fallback_tiers: vec![
                FallbackTier {
                    up_to: Some(100.0),
                    min_multiplier: 0.7,
                    max_multiplier: 1.4,
                },
                FallbackTier {
                    up_to: Some(500.0),
                    min_multiplier: 0.8,
                    max_multiplier: 1.3,
                },
                FallbackTier {
                    up_to: None,
                    min_multiplier: 0.9,
                    max_multiplier: 1.2,
                },
            ],
        }
    }
}

impl PredictorConfig {
    /// Load from the default override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        load_config(default_config_path().as_deref())
    }

    /// Load from an explicit override path (embedded defaults if it doesn't exist)
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Check invariants the pipeline relies on
    pub fn validate(&self) -> Result<()> {
        let ratios = &self.plausibility;
        if !(ratios.lower.is_finite() && ratios.upper.is_finite())
            || ratios.lower < 0.0
            || ratios.lower > ratios.upper
        {
            return Err(Error::Config(format!(
                "plausibility ratios must satisfy 0 <= lower <= upper (got {} / {})",
                ratios.lower, ratios.upper
            )));
        }

        let rounding = &self.rounding;
        if rounding.amount_decimals > MAX_DECIMALS || rounding.percent_decimals > MAX_DECIMALS {
            return Err(Error::Config(format!(
                "rounding decimals must be at most {} (got {} / {})",
                MAX_DECIMALS, rounding.amount_decimals, rounding.percent_decimals
            )));
        }

        if self.estimator.temperature < 0.0 {
            return Err(Error::Config("temperature must not be negative".into()));
        }

        let Some(last) = self.fallback_tiers.last() else {
            return Err(Error::Config("at least one fallback tier is required".into()));
        };
        if last.up_to.is_some() {
            return Err(Error::Config(
                "the last fallback tier must not set up_to".into(),
            ));
        }
        for tier in &self.fallback_tiers {
            if tier.min_multiplier < 0.0 || tier.min_multiplier > tier.max_multiplier {
                return Err(Error::Config(format!(
                    "fallback tier multipliers must satisfy 0 <= min <= max (got {} / {})",
                    tier.min_multiplier, tier.max_multiplier
                )));
            }
        }

        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendwise").join("config").join("predictor.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<PredictorConfig> {
    let content = match override_path {
        Some(path) if path.exists() => fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?,
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    estimator: Option<RawEstimator>,
    plausibility: Option<RawPlausibility>,
    rounding: Option<RawRounding>,
    fallback: Option<RawFallback>,
}

#[derive(Debug, Deserialize)]
struct RawEstimator {
    model: Option<String>,
    temperature: Option<f64>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawPlausibility {
    lower_ratio: Option<f64>,
    upper_ratio: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawRounding {
    amount_decimals: Option<u32>,
    percent_decimals: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawFallback {
    tiers: Option<Vec<RawTier>>,
}

#[derive(Debug, Deserialize)]
struct RawTier {
    up_to: Option<f64>,
    min_multiplier: f64,
    max_multiplier: f64,
}

fn parse_config(content: &str) -> Result<PredictorConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = PredictorConfig::default();

    if let Some(estimator) = raw.estimator {
        if let Some(model) = estimator.model {
            config.estimator.model = model;
        }
        if let Some(temperature) = estimator.temperature {
            config.estimator.temperature = temperature;
        }
        if let Some(timeout) = estimator.timeout_secs {
            config.estimator.timeout = Duration::from_secs(timeout);
        }
    }

    if let Some(plausibility) = raw.plausibility {
        if let Some(lower) = plausibility.lower_ratio {
            config.plausibility.lower = lower;
        }
        if let Some(upper) = plausibility.upper_ratio {
            config.plausibility.upper = upper;
        }
    }

    if let Some(rounding) = raw.rounding {
        if let Some(decimals) = rounding.amount_decimals {
            config.rounding.amount_decimals = decimals;
        }
        if let Some(decimals) = rounding.percent_decimals {
            config.rounding.percent_decimals = decimals;
        }
    }

    if let Some(tiers) = raw.fallback.and_then(|f| f.tiers) {
        config.fallback_tiers = tiers
            .into_iter()
            .map(|t| FallbackTier {
                up_to: t.up_to,
                min_multiplier: t.min_multiplier,
                max_multiplier: t.max_multiplier,
            })
            .collect();
    }

    config.validate()?;
    Ok(config)
}
