//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendwise - Track expenses and forecast next-period spending
#[derive(Parser)]
#[command(name = "spendwise")]
#[command(about = "Personal expense tracker with spending prediction", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "spendwise.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and seed default categories
    Init,

    /// Manage users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// List categories
    Categories,

    /// Manage expenses (list, add, total)
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Predict next-period spending from stored expenses
    Predict {
        /// Estimate a single expense from its description instead
        #[arg(short, long)]
        description: Option<String>,

        /// Accept estimator answers within this fraction of the total (0 < v <= 1)
        #[arg(long, conflicts_with = "description")]
        max_variance: Option<f64>,

        /// Seed the fallback estimate (for reproducible output)
        #[arg(long)]
        seed: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// Register a user
    Add {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List recent expenses
    List {
        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Record an expense
    Add {
        /// What the money was spent on
        #[arg(short, long)]
        title: String,

        /// Amount spent
        #[arg(short, long)]
        amount: f64,

        /// Category name (see `spendwise categories`)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show the total of all expenses
    Total,
}
