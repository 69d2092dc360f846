//! Authentication-related handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use spendwise_core::auth::new_session_token;

use crate::{AppError, AppState};

/// Body of POST /api/auth/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of the logged-in user
#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: i64,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Opaque session token (not persisted)
    pub token: String,
    pub user: LoginUser,
}

/// POST /api/auth/login - Check credentials and hand out a token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .db
        .verify_credentials(&req.email, &req.password)?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        token: new_session_token(),
        user: LoginUser {
            id: user.id,
            email: user.email,
            name: user.name,
        },
    }))
}
