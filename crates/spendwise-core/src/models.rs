//! Domain models for Spendwise

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category name reported for expenses without a category
pub const UNCATEGORIZED: &str = "Other";

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// An expense category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A stored expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub category_id: Option<i64>,
    /// Category name, joined in when listing
    pub category: Option<String>,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a new expense
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category_id: Option<i64>,
    pub user_id: Option<i64>,
}

impl NewExpense {
    /// Reject amounts the store should never hold
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.amount.is_finite() {
            return Err("Amount must be a finite number".to_string());
        }
        if self.amount < 0.0 {
            return Err(format!("Amount must not be negative (got {})", self.amount));
        }
        Ok(())
    }
}

/// Spending total for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: i64,
}

/// One expense line as fed to the prediction pipeline
///
/// Ephemeral: supplied with each prediction call, either by the caller or
/// built from stored expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(default)]
    pub title: String,
    pub amount: f64,
    #[serde(default = "default_category")]
    pub category: String,
}

impl ExpenseRecord {
    pub fn new(title: &str, amount: f64, category: &str) -> Self {
        Self {
            title: title.to_string(),
            amount,
            category: category.to_string(),
        }
    }
}

impl From<&Expense> for ExpenseRecord {
    fn from(expense: &Expense) -> Self {
        Self {
            title: expense.description.clone(),
            amount: expense.amount,
            category: expense
                .category
                .clone()
                .unwrap_or_else(default_category),
        }
    }
}

fn default_category() -> String {
    UNCATEGORIZED.to_string()
}
