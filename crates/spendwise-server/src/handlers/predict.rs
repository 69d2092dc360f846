//! Prediction handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use spendwise_core::models::ExpenseRecord;
use spendwise_core::{DescriptionEstimate, PredictionResult};

use crate::{AppError, AppState};

const PREDICTION_MESSAGE: &str = "Projected total for the next period";

/// Body of POST /api/predict
///
/// `expenses` takes precedence; `description` is only read without it.
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    pub expenses: Option<Vec<ExpenseRecord>>,
    pub description: Option<String>,
    pub max_variance: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct TotalPredictionResponse {
    pub success: bool,
    pub prediction: PredictionResult,
    pub message: String,
}

/// Response of POST /api/predict, shaped by which input was given
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Total(TotalPredictionResponse),
    Description(DescriptionEstimate),
}

fn total_response(prediction: PredictionResult) -> TotalPredictionResponse {
    TotalPredictionResponse {
        success: true,
        prediction,
        message: PREDICTION_MESSAGE.to_string(),
    }
}

/// POST /api/predict - Predict from posted expenses or a description
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    if let Some(expenses) = req.expenses {
        let prediction = state
            .predictor
            .predict_total(&expenses, req.max_variance)
            .await?;
        return Ok(Json(PredictResponse::Total(total_response(prediction))));
    }

    let description = req.description.unwrap_or_default();
    if description.trim().is_empty() {
        return Err(AppError::bad_request(
            "Description is required for prediction",
        ));
    }

    let estimate = state.predictor.predict_amount(&description).await?;
    Ok(Json(PredictResponse::Description(estimate)))
}

/// GET /api/predict - Predict from every stored expense
pub async fn predict_from_store(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TotalPredictionResponse>, AppError> {
    let records = state.db.expense_records()?;
    let prediction = state.predictor.predict_total(&records, None).await?;
    Ok(Json(total_response(prediction)))
}
