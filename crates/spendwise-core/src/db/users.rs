//! User operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::auth::{hash_password, verify_password};
use crate::error::{Error, Result};
use crate::models::User;

impl Database {
    /// Register a user with a hashed password
    pub fn create_user(&self, email: &str, name: &str, password: &str) -> Result<i64> {
        let email = email.trim();
        if email.is_empty() {
            return Err(Error::InvalidData("Email is required".into()));
        }
        if password.is_empty() {
            return Err(Error::InvalidData("Password is required".into()));
        }

        let password_hash = hash_password(password)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (email, name, password_hash) VALUES (?, ?, ?)",
            params![email, name, password_hash],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::InvalidData(format!("User {} already exists", email))
            }
            other => Error::Database(other),
        })?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, email, name, created_at FROM users WHERE id = ?",
                params![id],
                |row| {
                    let created_at_str: String = row.get(3)?;
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        name: row.get(2)?,
                        created_at: parse_datetime(&created_at_str),
                    })
                },
            )
            .optional()?;

        Ok(user)
    }

    /// Check an email/password pair, returning the user on success
    ///
    /// Unknown emails and wrong passwords both yield `None`.
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, email, name, created_at, password_hash FROM users WHERE email = ?",
                params![email.trim()],
                |row| {
                    let created_at_str: String = row.get(3)?;
                    let password_hash: String = row.get(4)?;
                    Ok((
                        User {
                            id: row.get(0)?,
                            email: row.get(1)?,
                            name: row.get(2)?,
                            created_at: parse_datetime(&created_at_str),
                        },
                        password_hash,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((user, hash)) if verify_password(password, &hash)? => Ok(Some(user)),
            _ => Ok(None),
        }
    }
}
