//! Category command implementations

use anyhow::Result;
use spendwise_core::db::Database;

pub fn cmd_categories_list(db: &Database) -> Result<()> {
    let categories = db.list_categories()?;

    if categories.is_empty() {
        println!("No categories found. Seed the defaults with:");
        println!("  spendwise init");
        return Ok(());
    }

    println!();
    println!("🏷️  Categories");
    println!("   ──────────────────────────");
    for category in categories {
        println!("   [{:>3}] {}", category.id, category.name);
    }

    Ok(())
}
