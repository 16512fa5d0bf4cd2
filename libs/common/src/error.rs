//! Custom error types for the common library
//!
//! This module defines the database error type shared by the BarterLink
//! services, together with helpers for telling server-side rejections apart
//! from transport failures.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Message reported by the PostgreSQL server, if the server rejected the statement
    ///
    /// Constraint violations, permission failures and invalid input all land
    /// here. Pool exhaustion, I/O and TLS failures return `None`.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            DatabaseError::Connection(e) | DatabaseError::Query(e) => match e {
                SqlxError::Database(db) => Some(db.message()),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether the failure happened before the server could answer
    pub fn is_transport(&self) -> bool {
        match self {
            DatabaseError::Connection(_) => true,
            DatabaseError::Query(e) => matches!(
                e,
                SqlxError::Io(_)
                    | SqlxError::Tls(_)
                    | SqlxError::PoolTimedOut
                    | SqlxError::PoolClosed
                    | SqlxError::WorkerCrashed
            ),
            _ => false,
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
