//! User command implementations

use anyhow::Result;
use spendwise_core::db::Database;

pub fn cmd_users_add(db: &Database, email: &str, name: &str, password: &str) -> Result<()> {
    let id = db.create_user(email, name, password)?;
    println!("✅ Created user {} <{}> (id {})", name, email.trim(), id);
    Ok(())
}
