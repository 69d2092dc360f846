//! Prediction result records

use serde::{Deserialize, Serialize};

use crate::config::RoundingPolicy;

/// Where a predicted value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    /// Accepted estimator answer
    Estimator,
    /// Local fallback estimate
    Fallback,
    /// Expenses were present but summed to zero
    ZeroTotal,
}

impl PredictionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Estimator => "estimator",
            Self::Fallback => "fallback",
            Self::ZeroTotal => "zero_total",
        }
    }
}

/// Why the estimator answer was not used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Not configured, unreachable, timed out, or returned an error status
    EstimatorUnavailable,
    /// Answer contained no number
    NoNumberFound,
    /// Number fell outside the plausibility band
    Implausible,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EstimatorUnavailable => "estimator_unavailable",
            Self::NoNumberFound => "no_number_found",
            Self::Implausible => "implausible",
        }
    }
}

/// Projected next-period total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub predicted_total: f64,
    pub current_total: f64,
    pub difference: f64,
    pub percentage_change: f64,
    pub source: PredictionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
}

impl PredictionResult {
    /// Round, clamp, and derive the difference fields
    ///
    /// `difference` and `percentage_change` are computed from the rounded
    /// values so the record is always self-consistent.
    pub fn assemble(
        current_total: f64,
        predicted_total: f64,
        source: PredictionSource,
        fallback_reason: Option<FallbackReason>,
        rounding: &RoundingPolicy,
    ) -> Self {
        let current = sanitize(current_total, rounding);
        let predicted = sanitize(predicted_total, rounding);
        let difference = rounding.amount(predicted - current);
        let percentage_change = if current == 0.0 {
            0.0
        } else {
            rounding.percent(100.0 * (predicted - current) / current)
        };

        Self {
            predicted_total: predicted,
            current_total: current,
            difference,
            percentage_change,
            source,
            fallback_reason,
        }
    }

    /// Zero-valued result for a list whose amounts sum to 0
    pub fn zero_total() -> Self {
        Self {
            predicted_total: 0.0,
            current_total: 0.0,
            difference: 0.0,
            percentage_change: 0.0,
            source: PredictionSource::ZeroTotal,
            fallback_reason: None,
        }
    }
}

fn sanitize(value: f64, rounding: &RoundingPolicy) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        0.0
    } else {
        rounding.amount(value)
    }
}

/// Amount estimated for a single described expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionEstimate {
    pub predicted_amount: f64,
    pub description: String,
    pub source: PredictionSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_is_consistent() {
        let rounding = RoundingPolicy::default();
        let result = PredictionResult::assemble(
            940.0,
            950.0,
            PredictionSource::Estimator,
            None,
            &rounding,
        );
        assert_eq!(result.predicted_total, 950.0);
        assert_eq!(result.difference, 10.0);
        assert_eq!(result.percentage_change, 1.1);
    }

    #[test]
    fn test_assemble_rounds_before_deriving() {
        let rounding = RoundingPolicy::default();
        let result = PredictionResult::assemble(
            100.0,
            123.456,
            PredictionSource::Fallback,
            Some(FallbackReason::Implausible),
            &rounding,
        );
        assert_eq!(result.predicted_total, 123.46);
        assert_eq!(result.difference, 23.46);
        assert_eq!(result.percentage_change, 23.5);
    }

    #[test]
    fn test_assemble_zero_current() {
        let result = PredictionResult::assemble(
            0.0,
            12.0,
            PredictionSource::Fallback,
            None,
            &RoundingPolicy::default(),
        );
        assert_eq!(result.percentage_change, 0.0);
        assert_eq!(result.difference, 12.0);
    }

    #[test]
    fn test_assemble_clamps_bad_prediction() {
        let rounding = RoundingPolicy::default();
        let negative =
            PredictionResult::assemble(50.0, -4.0, PredictionSource::Fallback, None, &rounding);
        assert_eq!(negative.predicted_total, 0.0);
        assert_eq!(negative.difference, -50.0);
        assert_eq!(negative.percentage_change, -100.0);

        let nan = PredictionResult::assemble(
            50.0,
            f64::NAN,
            PredictionSource::Fallback,
            None,
            &rounding,
        );
        assert_eq!(nan.predicted_total, 0.0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = PredictionResult::assemble(
            100.0,
            110.0,
            PredictionSource::Fallback,
            Some(FallbackReason::NoNumberFound),
            &RoundingPolicy::default(),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["predictedTotal"], 110.0);
        assert_eq!(json["currentTotal"], 100.0);
        assert_eq!(json["percentageChange"], 10.0);
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["fallbackReason"], "no_number_found");

        let zero = serde_json::to_value(PredictionResult::zero_total()).unwrap();
        assert_eq!(zero["source"], "zero_total");
        assert!(zero.get("fallbackReason").is_none());
    }
}
