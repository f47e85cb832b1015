//! Database operations for the CRM `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - CRM accounts (admin-managed, argon2 password hashes)
//! - `customers` - Customer companies
//! - `contacts` - People at customers (cascade with their customer)
//! - `deals` - Sales deals (cascade with their customer)
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run at server startup
//! or via `sf-cli migrate`.
//!
//! # Errors
//!
//! Driver errors are classified once, here, into [`RepositoryError`] kinds so
//! handlers never match on `PostgreSQL` error codes themselves.

pub mod contacts;
pub mod customers;
pub mod deals;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The referenced row does not exist.
    #[error("entity not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A foreign key constraint was violated.
    #[error("invalid reference: {0}")]
    ForeignKey(String),

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Classify a write-path driver error into a repository error kind.
///
/// Unique violations become [`RepositoryError::Conflict`], foreign key
/// violations become [`RepositoryError::ForeignKey`]; everything else stays a
/// database error.
pub(crate) fn classify_write_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepositoryError::Conflict("unique constraint violated".to_owned())
        }
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            RepositoryError::ForeignKey("referenced row does not exist".to_owned())
        }
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        other => RepositoryError::Database(other),
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
