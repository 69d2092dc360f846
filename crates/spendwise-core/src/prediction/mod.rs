//! Expense-to-prediction pipeline
//!
//! Turns a list of expenses (or a free-text description) into one
//! projected amount:
//!
//! ```text
//! build prompt -> call estimator -> extract number -> plausibility gate
//!                       |                 |                 |
//!                       +-----------------+-------> fallback estimate
//! ```
//!
//! Every path ends with an assembled result. The only errors returned are
//! input validation failures (`EmptyInput`, `InvalidData`); estimator
//! problems are recovered locally and recorded on the result.

mod extract;
mod fallback;
mod gate;
mod prompt;
mod result;

pub use extract::extract_number;
pub use fallback::FallbackEstimator;
pub use gate::PlausibilityBounds;
pub use prompt::{expense_total, Prompt, PromptBuilder, PromptKind, PromptMetadata, PromptTemplate};
pub use result::{DescriptionEstimate, FallbackReason, PredictionResult, PredictionSource};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{PlausibilityRatios, PredictorConfig};
use crate::error::{Error, Result};
use crate::estimator::{Estimator, EstimatorClient};
use crate::models::ExpenseRecord;

/// What to predict
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionRequest {
    /// Next-period total for a list of expenses
    ByExpenseList {
        expenses: Vec<ExpenseRecord>,
        /// Symmetric plausibility band `[1 - v, 1 + v]`, `0 < v <= 1`
        max_variance: Option<f64>,
    },
    /// Amount for a single described expense
    ByDescription { text: String },
}

/// Result of `Predictor::predict`, one variant per request kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionOutcome {
    Total(PredictionResult),
    Description(DescriptionEstimate),
}

/// Runs the prediction pipeline
///
/// Holds no per-call state; share it behind an `Arc`.
#[derive(Clone)]
pub struct Predictor {
    estimator: Option<EstimatorClient>,
    config: PredictorConfig,
    prompts: PromptBuilder,
    fallback: FallbackEstimator,
    seed: Option<u64>,
}

impl Predictor {
    /// Create a predictor; `None` means every prediction uses the fallback
    pub fn new(estimator: Option<EstimatorClient>, config: PredictorConfig) -> Result<Self> {
        config.validate()?;
        let fallback = FallbackEstimator::new(config.fallback_tiers.clone());

        Ok(Self {
            estimator,
            config,
            prompts: PromptBuilder::embedded()?,
            fallback,
            seed: None,
        })
    }

    /// Create a predictor whose estimator comes from the environment
    pub fn from_env(config: PredictorConfig) -> Result<Self> {
        let estimator = EstimatorClient::from_env(&config.estimator);
        match &estimator {
            Some(client) => info!(
                host = client.host(),
                model = client.model(),
                "Estimator configured"
            ),
            None => info!("No estimator configured (OLLAMA_HOST not set), using fallback only"),
        }
        Self::new(estimator, config)
    }

    /// Pin the fallback randomness (each call reseeds with `seed`)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn estimator(&self) -> Option<&EstimatorClient> {
        self.estimator.as_ref()
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Run whichever pipeline the request asks for
    pub async fn predict(&self, request: PredictionRequest) -> Result<PredictionOutcome> {
        match request {
            PredictionRequest::ByExpenseList {
                expenses,
                max_variance,
            } => self
                .predict_total(&expenses, max_variance)
                .await
                .map(PredictionOutcome::Total),
            PredictionRequest::ByDescription { text } => self
                .predict_amount(&text)
                .await
                .map(PredictionOutcome::Description),
        }
    }

    /// Project the next-period total for `expenses`
    pub async fn predict_total(
        &self,
        expenses: &[ExpenseRecord],
        max_variance: Option<f64>,
    ) -> Result<PredictionResult> {
        let ratios = match max_variance {
            Some(variance) => PlausibilityRatios::symmetric(variance)?,
            None => self.config.plausibility,
        };
        let total = expense_total(expenses)?;

        if total == 0.0 {
            info!(count = expenses.len(), "Expenses sum to zero, skipping estimator");
            return Ok(PredictionResult::zero_total());
        }

        let prompt = self.prompts.expense_prompt(expenses)?;
        let bounds = PlausibilityBounds::around(total, ratios);

        let candidate = match self.ask_estimator(&prompt).await {
            Ok(value) if bounds.contains(value) => Ok(value),
            Ok(value) => {
                warn!(
                    candidate = value,
                    min = bounds.min,
                    max = bounds.max,
                    "Estimator prediction implausible, using fallback"
                );
                Err(FallbackReason::Implausible)
            }
            Err(reason) => Err(reason),
        };

        let result = match candidate {
            Ok(value) => PredictionResult::assemble(
                total,
                value,
                PredictionSource::Estimator,
                None,
                &self.config.rounding,
            ),
            Err(reason) => {
                let value = self.fallback.estimate(total, &mut self.rng());
                PredictionResult::assemble(
                    total,
                    value,
                    PredictionSource::Fallback,
                    Some(reason),
                    &self.config.rounding,
                )
            }
        };

        info!(
            current = result.current_total,
            predicted = result.predicted_total,
            source = result.source.as_str(),
            "Prediction complete"
        );
        Ok(result)
    }

    /// Estimate the amount of a single expense from its description
    ///
    /// No plausibility band applies; any number the estimator returns is
    /// accepted.
    pub async fn predict_amount(&self, description: &str) -> Result<DescriptionEstimate> {
        let prompt = self.prompts.description_prompt(description)?;
        let description = description.trim();

        let (amount, source) = match self.ask_estimator(&prompt).await {
            Ok(value) => (value, PredictionSource::Estimator),
            Err(_) => (
                self.fallback.estimate_description(description),
                PredictionSource::Fallback,
            ),
        };

        Ok(DescriptionEstimate {
            predicted_amount: self.config.rounding.amount(amount),
            description: description.to_string(),
            source,
        })
    }

    /// One estimator round trip, reduced to a number or the reason there isn't one
    async fn ask_estimator(&self, prompt: &Prompt) -> std::result::Result<f64, FallbackReason> {
        let Some(estimator) = &self.estimator else {
            debug!("No estimator configured, using fallback");
            return Err(FallbackReason::EstimatorUnavailable);
        };

        let raw = match estimator
            .generate(prompt, self.config.estimator.timeout)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Estimator call failed, using fallback");
                return Err(FallbackReason::EstimatorUnavailable);
            }
        };
        debug!(prompt = prompt.kind().as_str(), raw = %raw, "Estimator raw response");

        extract_number(&raw).map_err(|e: Error| {
            warn!(error = %e, "No usable number in estimator response, using fallback");
            FallbackReason::NoNumberFound
        })
    }
}
