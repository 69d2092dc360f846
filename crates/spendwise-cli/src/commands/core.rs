//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `build_predictor` - Predictor from config file and environment
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use spendwise_core::db::Database;
use spendwise_core::{Estimator, Predictor, PredictorConfig};

/// Open (or create) the database at `db_path`
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Load predictor config and pick up the estimator from the environment
pub fn build_predictor(seed: Option<u64>) -> Result<Predictor> {
    let config = PredictorConfig::load().context("Failed to load predictor config")?;
    let predictor = Predictor::from_env(config).context("Failed to build predictor")?;
    match predictor.estimator() {
        Some(client) => tracing::debug!("Using estimator {} ({})", client.host(), client.model()),
        None => tracing::debug!("No estimator configured, predictions use the fallback"),
    }
    Ok(match seed {
        Some(seed) => predictor.with_seed(seed),
        None => predictor,
    })
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;

    let created = db
        .seed_default_categories()
        .context("Failed to seed categories")?;
    println!("   Seeded {} default categories", created);

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record an expense: spendwise expenses add --title Lunch --amount 12.5 --category Food");
    println!("  2. Forecast spending: spendwise predict");
    println!("  3. Start the API: spendwise serve");

    Ok(())
}
