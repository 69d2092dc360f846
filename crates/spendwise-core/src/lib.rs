//! Spendwise Core Library
//!
//! Shared functionality for the Spendwise expense tracker:
//! - Database access and migrations (users, categories, expenses)
//! - Password hashing for the login endpoint
//! - Expense-to-prediction pipeline with a local fallback
//! - Pluggable estimator backends (Ollama, mock)
//! - Predictor configuration with embedded defaults

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod estimator;
pub mod models;
pub mod prediction;

/// Test utilities including mock Ollama server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{
    EstimatorSettings, FallbackTier, PlausibilityRatios, PredictorConfig, RoundingPolicy,
};
pub use db::Database;
pub use error::{Error, Result};
pub use estimator::{Estimator, EstimatorClient, MockEstimator, OllamaEstimator};
pub use models::{Category, CategoryTotal, Expense, ExpenseRecord, NewExpense, User};
pub use prediction::{
    DescriptionEstimate, FallbackReason, PredictionOutcome, PredictionRequest, PredictionResult,
    PredictionSource, Predictor,
};
