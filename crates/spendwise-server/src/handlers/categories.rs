//! Category handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use spendwise_core::models::Category;

use crate::{AppError, AppState};

/// GET /api/categories - All categories, ordered by name
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = state.db.list_categories()?;
    Ok(Json(categories))
}
