//! Spendwise CLI - Expense tracker with spending prediction
//!
//! Usage:
//!   spendwise init                        Initialize database
//!   spendwise expenses add --title T --amount N --category C
//!   spendwise predict                     Predict next-period spending
//!   spendwise serve --port 3000           Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                UsersAction::Add {
                    email,
                    name,
                    password,
                } => commands::cmd_users_add(&db, &email, &name, &password),
            }
        }
        Commands::Categories => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_categories_list(&db)
        }
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_expenses_list(&db, 20),
                Some(ExpensesAction::List { limit }) => commands::cmd_expenses_list(&db, limit),
                Some(ExpensesAction::Add {
                    title,
                    amount,
                    category,
                }) => commands::cmd_expenses_add(&db, &title, amount, category.as_deref())
                    .map(|_| ()),
                Some(ExpensesAction::Total) => commands::cmd_expenses_total(&db),
            }
        }
        Commands::Predict {
            description,
            max_variance,
            seed,
            json,
        } => {
            let db = commands::open_db(&cli.db)?;
            let predictor = commands::build_predictor(seed)?;
            commands::cmd_predict(
                &db,
                &predictor,
                description.as_deref(),
                max_variance,
                json,
            )
            .await
            .map(|_| ())
        }
        Commands::Serve { port, host } => commands::cmd_serve(&cli.db, &host, port).await,
    }
}
