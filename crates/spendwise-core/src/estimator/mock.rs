//! Mock estimator for testing
//!
//! Answers every prompt with a fixed text, or behaves as an unreachable
//! service. Counts calls so tests can assert no request was made.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::prediction::Prompt;

use super::Estimator;

/// Mock estimator backend
#[derive(Clone, Debug, Default)]
pub struct MockEstimator {
    /// Text returned by `generate`; `None` means unavailable
    response: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl MockEstimator {
    /// Mock that always answers with `response`
    pub fn responding(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock that fails every call with `EstimatorUnavailable`
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Number of `generate` calls made so far (shared across clones)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Estimator for MockEstimator {
    async fn generate(&self, _prompt: &Prompt, _timeout: Duration) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .clone()
            .ok_or_else(|| Error::EstimatorUnavailable("mock estimator is offline".into()))
    }

    async fn health_check(&self) -> bool {
        self.response.is_some()
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://estimator"
    }
}
