//! Spendwise Web Server
//!
//! Axum-based REST API for the Spendwise expense tracker.
//!
//! - Login, categories, expenses, and prediction endpoints under `/api`
//! - Restrictive CORS policy (origins from `SPENDWISE_ALLOWED_ORIGINS`)
//! - Security headers on every response
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use spendwise_core::db::Database;
use spendwise_core::estimator::Estimator;
use spendwise_core::{Predictor, PredictorConfig};

mod handlers;

/// Maximum number of expenses returned by the list endpoint
pub const MAX_LIST_LIMIT: i64 = 1000;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read `SPENDWISE_ALLOWED_ORIGINS` (comma-separated)
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var("SPENDWISE_ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        Self { allowed_origins }
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub predictor: Predictor,
}

/// Create the application router
pub fn create_router(db: Database, predictor: Predictor, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        predictor,
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Auth
        .route("/auth/login", post(handlers::login))
        // Categories
        .route("/categories", get(handlers::list_categories))
        // Expenses
        .route(
            "/expenses",
            get(handlers::expense_total).post(handlers::add_expense),
        )
        .route("/expenses/list", get(handlers::list_expenses))
        .route("/expenses/by-category", get(handlers::expenses_by_category))
        // Prediction
        .route(
            "/predict",
            get(handlers::predict_from_store).post(handlers::predict),
        );

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server with the estimator taken from the environment
pub async fn serve(db: Database, host: &str, port: u16) -> anyhow::Result<()> {
    let predictor = Predictor::from_env(PredictorConfig::load()?)?;
    serve_with_config(db, predictor, host, port, ServerConfig::from_env()).await
}

/// Start the server with an explicit predictor and configuration
pub async fn serve_with_config(
    db: Database,
    predictor: Predictor,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    check_estimator_connection(&predictor).await;

    let app = create_router(db, predictor, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log estimator connection status
async fn check_estimator_connection(predictor: &Predictor) {
    match predictor.estimator() {
        Some(client) => {
            if client.health_check().await {
                info!(
                    "Estimator connected: {} (model: {})",
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "Estimator configured but not responding: {} (predictions will use the fallback)",
                    client.host()
                );
            }
        }
        None => {
            info!("Estimator not configured (set OLLAMA_HOST to enable), using fallback only");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Caller mistakes surface as 400 with the core error text
        if let Some(core) = err.downcast_ref::<spendwise_core::Error>() {
            if core.is_client_error() {
                return Self::bad_request(&core.to_string());
            }
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
