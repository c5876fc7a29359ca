//! # Register Error Types
//!
//! `ApiError` is what a command hands back to the cashier; `StartupError`
//! is what stops the register from starting at all.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Till                                   │
//! │                                                                         │
//! │  Cashier types "checkout"                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<String, ApiError>                                        │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bill rejected?  ─── CoreError::EmptyBill ───────────┐          │  │
//! │  │         │                                            │          │  │
//! │  │         ▼                                            ▼          │  │
//! │  │  Commit rolled back? ─ DbError::CommitFailed ──── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  error [COMMIT_FAILED]: Invoice commit failed: Insufficient stock ...   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use till_core::{CoreError, ValidationError};
use till_db::DbError;

/// Error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 42"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message for the cashier
    pub message: String,
}

/// Error codes for command results.
///
/// Every failure kind of the catalog, bill and commit paths maps to its own
/// code so the front end can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product or invoice does not exist
    NotFound,

    /// Input rejected before any mutation
    ValidationError,

    /// Requested quantity exceeds available stock
    OutOfStock,

    /// Checkout on a bill with no items
    EmptyBill,

    /// The invoice transaction was rolled back
    CommitFailed,

    /// The store can't be reached
    StorageUnavailable,

    /// Any other database failure
    DatabaseError,

    /// Bug or unexpected state
    Internal,
}

impl ErrorCode {
    /// The wire name, as printed in front of error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::OutOfStock => "OUT_OF_STOCK",
            ErrorCode::EmptyBill => "EMPTY_BILL",
            ErrorCode::CommitFailed => "COMMIT_FAILED",
            ErrorCode::StorageUnavailable => "STORAGE_UNAVAILABLE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        if err.is_unavailable() {
            tracing::error!(error = %err, "Storage unavailable");
            return ApiError::new(ErrorCode::StorageUnavailable, err.to_string());
        }

        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::OutOfStock, err.to_string())
            }
            DbError::EmptyBill => ApiError::new(ErrorCode::EmptyBill, err.to_string()),
            DbError::CommitFailed(_) => ApiError::new(ErrorCode::CommitFailed, err.to_string()),
            DbError::Validation(e) => ApiError::validation(e.to_string()),
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                ApiError::new(ErrorCode::ValidationError, err.to_string())
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::internal("Database operation failed")
            }
            other => {
                tracing::error!(error = %other, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, other.to_string())
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::OutOfStock { .. } => ApiError::new(ErrorCode::OutOfStock, err.to_string()),
            CoreError::IndexOutOfRange { .. } | CoreError::AmountTooLarge { .. } => {
                ApiError::validation(err.to_string())
            }
            CoreError::EmptyBill => ApiError::new(ErrorCode::EmptyBill, err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Startup Errors
// =============================================================================

/// Failures that keep the register from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Config file exists but can't be read.
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for `AppConfig`.
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Config parsed but holds values the register can't use.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No database path configured and no platform data directory.
    #[error("Could not determine app data directory")]
    NoDataDirectory,

    /// The store can't be opened or migrated.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] DbError),

    /// Terminal I/O failed.
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_failure_keeps_its_own_code() {
        let cause = DbError::InsufficientStock {
            product_id: 1,
            product: "Laptop".to_string(),
            available: 1,
            requested: 2,
        };
        let api: ApiError = DbError::commit_failed(cause).into();
        assert_eq!(api.code, ErrorCode::CommitFailed);
        assert!(api.message.contains("Laptop"));
    }

    #[test]
    fn test_unavailable_store_maps_to_storage_unavailable() {
        let api: ApiError = DbError::ConnectionFailed("pool closed".to_string()).into();
        assert_eq!(api.code, ErrorCode::StorageUnavailable);

        let wrapped = DbError::commit_failed(DbError::PoolExhausted);
        let api: ApiError = wrapped.into();
        assert_eq!(api.code, ErrorCode::StorageUnavailable);
    }

    #[test]
    fn test_core_errors_map_to_distinct_codes() {
        let out_of_stock: ApiError = CoreError::OutOfStock {
            product: "Mouse".to_string(),
            available: 0,
            requested: 1,
        }
        .into();
        assert_eq!(out_of_stock.code, ErrorCode::OutOfStock);

        let empty: ApiError = CoreError::EmptyBill.into();
        assert_eq!(empty.code, ErrorCode::EmptyBill);

        let bad_index: ApiError = CoreError::IndexOutOfRange { position: 3, len: 1 }.into();
        assert_eq!(bad_index.code, ErrorCode::ValidationError);

        let too_large: ApiError = CoreError::AmountTooLarge {
            product: "Gold".to_string(),
            quantity: 3,
        }
        .into();
        assert_eq!(too_large.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_not_found_message() {
        let api: ApiError = DbError::not_found("Invoice", 7).into();
        assert_eq!(api.code, ErrorCode::NotFound);
        assert_eq!(api.message, "Invoice not found: 7");
        assert_eq!(api.to_string(), "[NOT_FOUND] Invoice not found: 7");
    }

    #[test]
    fn test_serializes_screaming_snake_code() {
        let json = serde_json::to_string(&ApiError::validation("bad")).unwrap();
        assert_eq!(json, r#"{"code":"VALIDATION_ERROR","message":"bad"}"#);
    }
}
