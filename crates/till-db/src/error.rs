//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       │  inside InvoiceRepository::commit:                              │
//! │       │  NotFound / InsufficientStock / QueryFailed                     │
//! │       │       └──► CommitFailed(Box<cause>)  (after rollback)           │
//! │       ▼                                                                 │
//! │  ApiError (in register app) ← code + message for the cashier           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use till_core::ValidationError;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - ID doesn't exist (or the product was deleted after being billed)
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The conditional stock decrement refused to go below zero.
    ///
    /// ## When This Occurs
    /// - Stock changed between adding to the bill and checkout
    /// - The same product was added to one bill more than once
    #[error("Insufficient stock for {product} (id {product_id}): {available} available, {requested} requested")]
    InsufficientStock {
        product_id: i64,
        product: String,
        available: i64,
        requested: i64,
    },

    /// Commit was attempted with no line items.
    #[error("Cannot commit an invoice without items")]
    EmptyBill,

    /// The invoice commit transaction was rolled back.
    ///
    /// Nothing was written: no header, no items, no stock change.
    #[error("Invoice commit failed: {0}")]
    CommitFailed(Box<DbError>),

    /// Unique constraint violation.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created or opened
    /// - File permissions issue
    /// - Pool already closed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed (including constraint and trigger aborts).
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Input rejected before reaching SQLite.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Wraps a failure that caused the commit transaction to roll back.
    pub fn commit_failed(cause: DbError) -> Self {
        DbError::CommitFailed(Box::new(cause))
    }

    /// The underlying cause for `CommitFailed`, otherwise `self`.
    pub fn root_cause(&self) -> &DbError {
        match self {
            DbError::CommitFailed(inner) => inner.root_cause(),
            other => other,
        }
    }

    /// Whether the store itself is unreachable (as opposed to a bad request).
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self.root_cause(),
            DbError::ConnectionFailed(_) | DbError::PoolExhausted | DbError::MigrationFailed(_)
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(io_err) => DbError::ConnectionFailed(io_err.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_failed_message_includes_cause() {
        let err = DbError::commit_failed(DbError::not_found("Product", 42));
        assert_eq!(
            err.to_string(),
            "Invoice commit failed: Product not found: 42"
        );
        assert!(matches!(err.root_cause(), DbError::NotFound { .. }));
    }

    #[test]
    fn test_unavailable_classification() {
        assert!(DbError::PoolExhausted.is_unavailable());
        assert!(DbError::commit_failed(DbError::ConnectionFailed("gone".into())).is_unavailable());
        assert!(!DbError::EmptyBill.is_unavailable());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
