//! Prediction command implementation

use anyhow::{Context, Result};
use spendwise_core::db::Database;
use spendwise_core::{
    PredictionOutcome, PredictionRequest, PredictionResult, PredictionSource, Predictor,
};

pub async fn cmd_predict(
    db: &Database,
    predictor: &Predictor,
    description: Option<&str>,
    max_variance: Option<f64>,
    json: bool,
) -> Result<PredictionOutcome> {
    let request = match description {
        Some(text) => PredictionRequest::ByDescription {
            text: text.to_string(),
        },
        None => {
            let expenses = db.expense_records()?;
            if expenses.is_empty() {
                anyhow::bail!(
                    "No expenses recorded yet. Add some with 'spendwise expenses add' first"
                );
            }
            PredictionRequest::ByExpenseList {
                expenses,
                max_variance,
            }
        }
    };

    let outcome = predictor
        .predict(request)
        .await
        .context("Prediction failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(outcome);
    }

    match &outcome {
        PredictionOutcome::Total(result) => print_total(result),
        PredictionOutcome::Description(estimate) => {
            println!();
            println!(
                "🔮 \"{}\" is likely to cost ${:.2}",
                estimate.description, estimate.predicted_amount
            );
            println!("   Source: {}", estimate.source.as_str());
        }
    }

    Ok(outcome)
}

fn print_total(result: &PredictionResult) {
    let arrow = if result.difference >= 0.0 { "▲" } else { "▼" };

    println!();
    println!("🔮 Spending Forecast");
    println!("   ──────────────────────────────");
    println!("   Current total:   ${:>10.2}", result.current_total);
    println!("   Predicted total: ${:>10.2}", result.predicted_total);
    println!(
        "   Change:          {} ${:.2} ({:+.1}%)",
        arrow,
        result.difference.abs(),
        result.percentage_change
    );

    match (result.source, result.fallback_reason) {
        (PredictionSource::Fallback, Some(reason)) => {
            println!("   Source: local fallback ({})", reason.as_str());
        }
        (source, _) => println!("   Source: {}", source.as_str()),
    }
}
