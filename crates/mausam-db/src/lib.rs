//! MySQL persistence for readings and alert thresholds
//!
//! Tables are created on startup if missing (see [`schema::migrate`]).
//! [`DbClient`] implements the core `ReadingStore` and `ThresholdStore`
//! traits and is cheap to clone; every clone shares one pool.

pub mod client;
pub mod queries;
pub mod schema;
pub mod store;

pub use client::*;
pub use schema::*;

use mausam_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionError(
                e @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)),
            ) => StoreError::Unavailable(e.to_string()),
            other => StoreError::Backend(other.to_string()),
        }
    }
}
