//! Pluggable external estimator abstraction
//!
//! The estimator is a text-generation service asked for a single number.
//! Its answer is never trusted directly: the prediction pipeline extracts,
//! bounds-checks, and falls back when needed.
//!
//! # Architecture
//!
//! - `Estimator` trait: one non-streaming generate call plus health/info
//! - `EstimatorClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OllamaEstimator`, `MockEstimator`
//!
//! # Configuration
//!
//! Environment variables:
//! - `ESTIMATOR_BACKEND`: Backend to use (ollama, mock). Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Overrides the model from predictor.toml

mod mock;
mod ollama;

pub use mock::MockEstimator;
pub use ollama::OllamaEstimator;

use std::time::Duration;

use async_trait::async_trait;

use crate::config::EstimatorSettings;
use crate::error::Result;
use crate::prediction::Prompt;

/// Interface for text-generation backends
#[async_trait]
pub trait Estimator: Send + Sync {
    /// Send one prompt and return the full response text
    ///
    /// Fails with `Error::EstimatorUnavailable` on connection failure,
    /// non-success status, timeout, or an unreadable response.
    async fn generate(&self, prompt: &Prompt, timeout: Duration) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete estimator client enum
#[derive(Clone)]
pub enum EstimatorClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaEstimator),
    /// Mock backend for testing
    Mock(MockEstimator),
}

impl EstimatorClient {
    /// Create an estimator client from environment variables
    ///
    /// Returns None if the required environment variables are not set, in
    /// which case every prediction uses the fallback estimator.
    pub fn from_env(settings: &EstimatorSettings) -> Option<Self> {
        let backend = std::env::var("ESTIMATOR_BACKEND").unwrap_or_else(|_| "ollama".to_string());

        match backend.to_lowercase().as_str() {
            "ollama" => OllamaEstimator::from_env(settings).map(EstimatorClient::Ollama),
            "mock" => Some(EstimatorClient::Mock(MockEstimator::unavailable())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown ESTIMATOR_BACKEND, falling back to ollama");
                OllamaEstimator::from_env(settings).map(EstimatorClient::Ollama)
            }
        }
    }

    /// Create an Ollama estimator directly
    pub fn ollama(host: &str, settings: &EstimatorSettings) -> Self {
        EstimatorClient::Ollama(OllamaEstimator::new(host, settings))
    }

    /// Create a mock estimator that always answers with `response`
    pub fn mock(response: &str) -> Self {
        EstimatorClient::Mock(MockEstimator::responding(response))
    }
}

#[async_trait]
impl Estimator for EstimatorClient {
    async fn generate(&self, prompt: &Prompt, timeout: Duration) -> Result<String> {
        match self {
            EstimatorClient::Ollama(b) => b.generate(prompt, timeout).await,
            EstimatorClient::Mock(b) => b.generate(prompt, timeout).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            EstimatorClient::Ollama(b) => b.health_check().await,
            EstimatorClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            EstimatorClient::Ollama(b) => b.model(),
            EstimatorClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            EstimatorClient::Ollama(b) => b.host(),
            EstimatorClient::Mock(b) => b.host(),
        }
    }
}
