//! Integration tests for spendwise-core
//!
//! These tests exercise the full store -> prediction workflow.

use std::time::Duration;

use spendwise_core::{
    db::Database,
    models::{ExpenseRecord, NewExpense},
    Error, EstimatorClient, FallbackReason, MockEstimator, PredictionOutcome, PredictionRequest,
    PredictionSource, Predictor, PredictorConfig,
};

/// Store seeded with three expenses totalling 940
fn seeded_store() -> Database {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    db.seed_default_categories().expect("Failed to seed categories");

    let bills = db.find_category("Bills").unwrap().unwrap().id;
    let food = db.find_category("Food").unwrap().unwrap().id;

    for (description, amount, category) in [
        ("Rent share", 600.0, Some(bills)),
        ("Groceries", 300.0, Some(food)),
        ("Gift", 40.0, None),
    ] {
        db.insert_expense(&NewExpense {
            description: description.to_string(),
            amount,
            category_id: category,
            user_id: None,
        })
        .expect("Failed to insert expense");
    }

    db
}

fn mock_predictor(mock: &MockEstimator) -> Predictor {
    Predictor::new(
        Some(EstimatorClient::Mock(mock.clone())),
        PredictorConfig::default(),
    )
    .expect("Failed to build predictor")
    .with_seed(2024)
}

// =============================================================================
// Store -> Prediction
// =============================================================================

#[tokio::test]
async fn test_stored_expenses_feed_prediction() {
    let db = seeded_store();
    let records = db.expense_records().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].category, "Other");

    let mock = MockEstimator::responding("950");
    let result = mock_predictor(&mock)
        .predict_total(&records, None)
        .await
        .unwrap();

    assert_eq!(result.current_total, 940.0);
    assert_eq!(result.current_total, db.total_expenses().unwrap());
    assert_eq!(mock.calls(), 1);
}

// =============================================================================
// Scenario A: estimator unreachable
// =============================================================================

#[tokio::test]
async fn test_unreachable_estimator_falls_back_within_band() {
    let db = seeded_store();
    let records = db.expense_records().unwrap();

    let mut config = PredictorConfig::default();
    config.estimator.timeout = Duration::from_secs(2);
    // Nothing listens on the discard port
    let client = EstimatorClient::ollama("http://127.0.0.1:9", &config.estimator);

    for seed in 0..5 {
        let predictor = Predictor::new(Some(client.clone()), config.clone())
            .unwrap()
            .with_seed(seed);
        let result = predictor.predict_total(&records, None).await.unwrap();

        assert_eq!(result.source, PredictionSource::Fallback);
        assert_eq!(
            result.fallback_reason,
            Some(FallbackReason::EstimatorUnavailable)
        );
        assert!(
            (846.0..=1128.0).contains(&result.predicted_total),
            "fallback {} outside band",
            result.predicted_total
        );
        assert!(
            (result.difference - (result.predicted_total - result.current_total)).abs() < 0.011
        );
    }
}

// =============================================================================
// Scenario B: empty expense list
// =============================================================================

#[tokio::test]
async fn test_empty_list_rejected_before_estimator_call() {
    let db = Database::in_memory().unwrap();
    let records = db.expense_records().unwrap();
    assert!(records.is_empty());

    let mock = MockEstimator::responding("950");
    let result = mock_predictor(&mock).predict_total(&records, None).await;

    assert!(matches!(result, Err(Error::EmptyInput(_))));
    assert_eq!(mock.calls(), 0);
}

// =============================================================================
// Scenario C: plausible estimator answer
// =============================================================================

#[tokio::test]
async fn test_plausible_answer_is_used() {
    let records = vec![
        ExpenseRecord::new("Rent share", 600.0, "Bills"),
        ExpenseRecord::new("Groceries", 340.0, "Food"),
    ];

    let mock = MockEstimator::responding("950");
    let outcome = mock_predictor(&mock)
        .predict(PredictionRequest::ByExpenseList {
            expenses: records,
            max_variance: None,
        })
        .await
        .unwrap();

    let PredictionOutcome::Total(result) = outcome else {
        panic!("expected a total prediction");
    };
    assert_eq!(result.source, PredictionSource::Estimator);
    assert_eq!(result.predicted_total, 950.0);
    assert_eq!(result.difference, 10.0);
    assert!((result.percentage_change - 1.1).abs() < 1e-9);
}

#[tokio::test]
async fn test_description_prediction_without_estimator() {
    let predictor = Predictor::new(None, PredictorConfig::default()).unwrap();

    let outcome = predictor
        .predict(PredictionRequest::ByDescription {
            text: "Doctor visit".to_string(),
        })
        .await
        .unwrap();

    let PredictionOutcome::Description(estimate) = outcome else {
        panic!("expected a description estimate");
    };
    // medical family: 30 + (12 % 70)
    assert_eq!(estimate.predicted_amount, 42.0);
    assert_eq!(estimate.source, PredictionSource::Fallback);
}
