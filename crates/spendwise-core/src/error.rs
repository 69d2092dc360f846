//! Error types for Spendwise

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt frontmatter error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Required input was missing (no expenses, blank description)
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The text-generation endpoint could not produce a response
    #[error("Estimator unavailable: {0}")]
    EstimatorUnavailable(String),

    /// The estimator answered, but without any numeric token
    #[error("No number found in estimator response: {0}")]
    NoNumberFound(String),
}

impl Error {
    /// Whether this error was caused by the caller's input (maps to 4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput(_) | Self::InvalidData(_) | Self::NotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
