//! Database operations for the storefront `PostgreSQL`.
//!
//! # Tables
//!
//! - `users` - Customers keyed by LINE identity
//! - `brands`, `categories`, `products`, `reviews` - Catalog (read-only here,
//!   except review aggregates feeding the product list)
//! - `orders`, `order_items` - Checkout results
//! - `user_favorites` - (user, product) favorite pairs
//! - `line_messages` - Product assistant exchange log
//!
//! # Migrations
//!
//! Stored in `crates/api/migrations/` and embedded via `sqlx::migrate!`;
//! they run at startup before the listener binds.
//!
//! All queries use runtime `query_as` binding (no live database at build time).

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod favorites;
pub mod messages;
pub mod orders;
pub mod products;
pub mod users;

pub use favorites::FavoriteRepository;
pub use messages::MessageLogRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate favorite pair).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Whether the underlying database error is a permission rejection
    /// (`insufficient_privilege`, SQLSTATE 42501). The user-create path falls
    /// back to the `create_user_from_api` stored function in that case.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        let Self::Database(sqlx::Error::Database(db_err)) = self else {
            return false;
        };
        db_err.code().as_deref() == Some("42501")
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
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
