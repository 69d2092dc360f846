//! Category operations

use rusqlite::{params, OptionalExtension};

use super::{Database, DEFAULT_CATEGORIES};
use crate::error::Result;
use crate::models::Category;

impl Database {
    /// Create the default categories if they don't exist yet (idempotent)
    pub fn seed_default_categories(&self) -> Result<usize> {
        let conn = self.conn()?;
        let mut created = 0;
        for name in DEFAULT_CATEGORIES {
            created += conn.execute(
                "INSERT OR IGNORE INTO categories (name) VALUES (?)",
                params![name],
            )?;
        }
        Ok(created)
    }

    /// Create or get a category by name
    pub fn upsert_category(&self, name: &str) -> Result<i64> {
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM categories WHERE name = ?",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        conn.execute("INSERT INTO categories (name) VALUES (?)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    /// List all categories ordered by name
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY name ASC")?;

        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Get a category by ID
    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, name FROM categories WHERE id = ?",
                params![id],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(category)
    }

    /// Look up a category by name (case-insensitive)
    pub fn find_category(&self, name: &str) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, name FROM categories WHERE name = ? COLLATE NOCASE",
                params![name],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(category)
    }
}
