//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db, build_predictor)
//! - `categories` - Category listing
//! - `expenses` - Expense commands (add, list, total)
//! - `predict` - Spending prediction
//! - `serve` - Web server command
//! - `users` - User registration

pub mod categories;
pub mod core;
pub mod expenses;
pub mod predict;
pub mod serve;
pub mod users;

// Re-export command functions for main.rs
pub use categories::*;
pub use core::*;
pub use expenses::*;
pub use predict::*;
pub use serve::*;
pub use users::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
