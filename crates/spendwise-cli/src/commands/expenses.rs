//! Expense command implementations

use anyhow::{Context, Result};
use spendwise_core::db::Database;
use spendwise_core::models::{NewExpense, UNCATEGORIZED};

use super::truncate;

pub fn cmd_expenses_add(
    db: &Database,
    title: &str,
    amount: f64,
    category: Option<&str>,
) -> Result<i64> {
    let category_id = match category {
        Some(name) => {
            let found = db.find_category(name)?.with_context(|| {
                format!(
                    "Unknown category '{}'. Run 'spendwise categories' to see the list",
                    name
                )
            })?;
            Some(found.id)
        }
        None => None,
    };

    let id = db.insert_expense(&NewExpense {
        description: title.to_string(),
        amount,
        category_id,
        user_id: None,
    })?;

    println!(
        "✅ Added expense #{}: {} ${:.2} ({})",
        id,
        title,
        amount,
        category.unwrap_or(UNCATEGORIZED)
    );

    Ok(id)
}

pub fn cmd_expenses_list(db: &Database, limit: i64) -> Result<()> {
    let expenses = db.list_expenses(limit)?;

    if expenses.is_empty() {
        println!("No expenses found. Add one with:");
        println!("  spendwise expenses add --title Lunch --amount 12.5 --category Food");
        return Ok(());
    }

    println!();
    println!("📝 Recent Expenses");
    println!("   ─────────────────────────────────────────────────────────────");

    for expense in expenses {
        println!(
            "   {} │ {:>10} │ {:<13} │ {}",
            expense.created_at.format("%Y-%m-%d"),
            format!("${:.2}", expense.amount),
            expense.category.as_deref().unwrap_or(UNCATEGORIZED),
            truncate(&expense.description, 40)
        );
    }

    Ok(())
}

pub fn cmd_expenses_total(db: &Database) -> Result<()> {
    let total = db.total_expenses()?;
    let by_category = db.category_totals()?;

    println!();
    println!("💰 Total spent: ${:.2}", total);
    for row in by_category {
        println!(
            "   {:<13} ${:>10.2}  ({} expense{})",
            row.category,
            row.total,
            row.count,
            if row.count == 1 { "" } else { "s" }
        );
    }

    Ok(())
}
