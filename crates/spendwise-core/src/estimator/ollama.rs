//! Ollama estimator backend
//!
//! HTTP client for the Ollama `/api/generate` endpoint. One non-streaming
//! request per prediction; no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EstimatorSettings;
use crate::error::{Error, Result};
use crate::prediction::Prompt;

use super::Estimator;

/// Ollama backend
#[derive(Clone)]
pub struct OllamaEstimator {
    http_client: Client,
    base_url: String,
    model: String,
    temperature: f64,
}

impl OllamaEstimator {
    /// Create a new Ollama estimator
    pub fn new(base_url: &str, settings: &EstimatorSettings) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }

    /// Create from environment variables
    ///
    /// `OLLAMA_HOST` is required; `OLLAMA_MODEL` overrides the configured model.
    pub fn from_env(settings: &EstimatorSettings) -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok().filter(|h| !h.is_empty())?;
        let mut estimator = Self::new(&host, settings);
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            if !model.is_empty() {
                estimator.model = model;
            }
        }
        Some(estimator)
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

fn unavailable(context: &str, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::EstimatorUnavailable(format!("{}: request timed out", context))
    } else {
        Error::EstimatorUnavailable(format!("{}: {}", context, err))
    }
}

#[async_trait]
impl Estimator for OllamaEstimator {
    async fn generate(&self, prompt: &Prompt, timeout: Duration) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: prompt.text(),
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| unavailable("Ollama request failed", e))?;

        if !response.status().is_success() {
            return Err(Error::EstimatorUnavailable(format!(
                "Ollama API error: {}",
                response.status()
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| unavailable("Invalid Ollama response", e))?;
        debug!(prompt = prompt.kind().as_str(), "Ollama response: {}", generated.response);

        Ok(generated.response)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::PromptBuilder;
    use crate::test_utils::{MockOllamaServer, MockReply};

    fn settings() -> EstimatorSettings {
        EstimatorSettings {
            model: "test-model".to_string(),
            temperature: 0.1,
            timeout: Duration::from_secs(5),
        }
    }

    fn prompt() -> Prompt {
        PromptBuilder::embedded()
            .unwrap()
            .description_prompt("coffee")
            .unwrap()
    }

    #[tokio::test]
    async fn test_generate_sends_contract_body() {
        let mut server = MockOllamaServer::start(MockReply::Text("42".into())).await;
        let estimator = OllamaEstimator::new(&server.url(), &settings());

        let text = estimator
            .generate(&prompt(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(text, "42");

        let body = server.last_request().unwrap();
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["temperature"], 0.1);
        assert!(body["prompt"].as_str().unwrap().contains("coffee"));

        server.stop();
    }

    #[tokio::test]
    async fn test_generate_error_status_is_unavailable() {
        let server = MockOllamaServer::start(MockReply::Status(500)).await;
        let estimator = OllamaEstimator::new(&server.url(), &settings());

        let result = estimator.generate(&prompt(), Duration::from_secs(5)).await;
        assert!(matches!(result, Err(Error::EstimatorUnavailable(_))));
    }

    #[tokio::test]
    async fn test_generate_timeout_is_unavailable() {
        let server = MockOllamaServer::start(MockReply::Delayed(
            Duration::from_secs(2),
            "42".into(),
        ))
        .await;
        let estimator = OllamaEstimator::new(&server.url(), &settings());

        let result = estimator
            .generate(&prompt(), Duration::from_millis(100))
            .await;
        match result {
            Err(Error::EstimatorUnavailable(msg)) => assert!(msg.contains("timed out")),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        // Nothing listens on port 9 locally
        let estimator = OllamaEstimator::new("http://127.0.0.1:9", &settings());
        let result = estimator.generate(&prompt(), Duration::from_secs(2)).await;
        assert!(matches!(result, Err(Error::EstimatorUnavailable(_))));
        assert!(!estimator.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockOllamaServer::start(MockReply::Text("1".into())).await;
        let estimator = OllamaEstimator::new(&format!("{}/", server.url()), &settings());
        assert_eq!(estimator.host(), server.url());
        assert!(estimator.health_check().await);
    }
}
