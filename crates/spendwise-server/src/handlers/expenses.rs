//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use spendwise_core::models::{CategoryTotal, Expense, NewExpense};

use crate::{AppError, AppState, MAX_LIST_LIMIT};

/// Body of POST /api/expenses
#[derive(Debug, Deserialize)]
pub struct AddExpenseRequest {
    pub title: String,
    pub amount: f64,
    pub category_id: Option<i64>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AddExpenseResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct TotalResponse {
    pub total: f64,
}

/// Query parameters for the expense listing
#[derive(Debug, Deserialize)]
pub struct ListExpensesQuery {
    /// Number of expenses to return (default 100, max 1000)
    pub limit: Option<i64>,
}

/// POST /api/expenses - Record an expense
pub async fn add_expense(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddExpenseRequest>,
) -> Result<Json<AddExpenseResponse>, AppError> {
    let id = state.db.insert_expense(&NewExpense {
        description: req.title,
        amount: req.amount,
        category_id: req.category_id,
        user_id: req.user_id,
    })?;

    info!(id, amount = req.amount, "Expense added");

    Ok(Json(AddExpenseResponse {
        message: "Expense added".to_string(),
        id,
    }))
}

/// GET /api/expenses - Sum of all expenses
pub async fn expense_total(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TotalResponse>, AppError> {
    let total = state.db.total_expenses()?;
    Ok(Json(TotalResponse {
        total: state.predictor.config().rounding.amount(total),
    }))
}

/// GET /api/expenses/list - Stored expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListExpensesQuery>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let limit = params.limit.unwrap_or(100).clamp(1, MAX_LIST_LIMIT);
    let expenses = state.db.list_expenses(limit)?;
    Ok(Json(expenses))
}

/// GET /api/expenses/by-category - Totals per category
pub async fn expenses_by_category(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryTotal>>, AppError> {
    let totals = state.db.category_totals()?;
    Ok(Json(totals))
}
