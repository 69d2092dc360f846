//! Expense operations

use rusqlite::{params, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{CategoryTotal, Expense, ExpenseRecord, NewExpense, UNCATEGORIZED};

const EXPENSE_COLUMNS: &str = r#"
    e.id, e.description, e.amount, e.category_id, c.name, e.user_id, e.created_at
"#;

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let created_at_str: String = row.get(6)?;
    Ok(Expense {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        category_id: row.get(3)?,
        category: row.get(4)?,
        user_id: row.get(5)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Record a new expense, returning its ID
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        expense.validate().map_err(Error::InvalidData)?;

        if let Some(category_id) = expense.category_id {
            if self.get_category(category_id)?.is_none() {
                return Err(Error::NotFound(format!("Category {}", category_id)));
            }
        }
        if let Some(user_id) = expense.user_id {
            if self.get_user(user_id)?.is_none() {
                return Err(Error::NotFound(format!("User {}", user_id)));
            }
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (description, amount, category_id, user_id) VALUES (?, ?, ?, ?)",
            params![
                expense.description,
                expense.amount,
                expense.category_id,
                expense.user_id
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Sum of all recorded expenses (0 when there are none)
    pub fn total_expenses(&self) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 =
            conn.query_row("SELECT COALESCE(SUM(amount), 0) FROM expenses", [], |row| {
                row.get(0)
            })?;
        Ok(total)
    }

    /// List expenses, newest first
    pub fn list_expenses(&self, limit: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT {}
            FROM expenses e
            LEFT JOIN categories c ON c.id = e.category_id
            ORDER BY e.created_at DESC, e.id DESC
            LIMIT ?
            "#,
            EXPENSE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let expenses = stmt
            .query_map(params![limit], expense_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// All stored expenses as prediction input, in recording order
    pub fn expense_records(&self) -> Result<Vec<ExpenseRecord>> {
        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT {}
            FROM expenses e
            LEFT JOIN categories c ON c.id = e.category_id
            ORDER BY e.id ASC
            "#,
            EXPENSE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let records = stmt
            .query_map([], expense_from_row)?
            .map(|row| row.map(|expense| ExpenseRecord::from(&expense)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Spending per category, largest first
    pub fn category_totals(&self) -> Result<Vec<CategoryTotal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT COALESCE(c.name, ?), SUM(e.amount), COUNT(*)
            FROM expenses e
            LEFT JOIN categories c ON c.id = e.category_id
            GROUP BY COALESCE(c.name, ?)
            ORDER BY SUM(e.amount) DESC
            "#,
        )?;

        let totals = stmt
            .query_map(params![UNCATEGORIZED, UNCATEGORIZED], |row| {
                Ok(CategoryTotal {
                    category: row.get(0)?,
                    total: row.get(1)?,
                    count: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(totals)
    }
}
