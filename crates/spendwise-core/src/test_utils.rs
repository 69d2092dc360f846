//! Test utilities for spendwise-core
//!
//! A mock Ollama server speaking just enough of the API (`/api/generate`,
//! `/api/tags`) to exercise the estimator client over real HTTP.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// How the mock answers `/api/generate`
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 200 with `{"response": text}`
    Text(String),
    /// Bare status code, no body
    Status(u16),
    /// Wait, then answer like `Text`
    Delayed(Duration, String),
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    last_request: Arc<Mutex<Option<Value>>>,
}

/// Mock Ollama server for testing and development
pub struct MockOllamaServer {
    addr: SocketAddr,
    last_request: Arc<Mutex<Option<Value>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOllamaServer {
    /// Start the mock server on an available port
    pub async fn start(reply: MockReply) -> Self {
        let last_request = Arc::new(Mutex::new(None));
        let state = MockState {
            reply,
            last_request: last_request.clone(),
        };

        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            last_request,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// JSON body of the most recent `/api/generate` request
    pub fn last_request(&self) -> Option<Value> {
        self.last_request.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOllamaServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Ollama tags endpoint response (health check)
async fn handle_tags() -> Json<Value> {
    Json(json!({
        "models": [{
            "name": "mistral:latest",
            "modified_at": "2024-01-01T00:00:00Z",
            "size": 4_000_000_000u64
        }]
    }))
}

/// Ollama generate endpoint
async fn handle_generate(State(state): State<MockState>, Json(request): Json<Value>) -> Response {
    let model = request["model"].as_str().unwrap_or_default().to_string();
    *state.last_request.lock().unwrap() = Some(request);

    let text = match state.reply {
        MockReply::Text(text) => text,
        MockReply::Status(code) => {
            return StatusCode::from_u16(code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response();
        }
        MockReply::Delayed(delay, text) => {
            tokio::time::sleep(delay).await;
            text
        }
    };

    Json(json!({
        "model": model,
        "response": text,
        "done": true
    }))
    .into_response()
}
