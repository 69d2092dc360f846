//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use spendwise_core::estimator::Estimator;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct EstimatorStatus {
    pub configured: bool,
    pub available: bool,
    pub host: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub estimator: EstimatorStatus,
}

/// GET /api/health - Server and estimator status
///
/// An unavailable estimator does not make the server unhealthy; predictions
/// still work through the fallback.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let estimator = match state.predictor.estimator() {
        Some(client) => EstimatorStatus {
            configured: true,
            available: client.health_check().await,
            host: Some(client.host().to_string()),
            model: Some(client.model().to_string()),
        },
        None => EstimatorStatus {
            configured: false,
            available: false,
            host: None,
            model: None,
        },
    };

    Json(HealthResponse {
        status: "ok",
        estimator,
    })
}
