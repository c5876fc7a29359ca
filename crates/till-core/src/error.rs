//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Bill assembly and finalization failures        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  till-db errors (separate crate)                                       │
//! │  └── DbError          - Storage failures, CommitFailed, NotFound       │
//! │                                                                         │
//! │  Register app errors                                                   │
//! │  └── ApiError         - What the cashier sees (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError                          │
//! │        ValidationError → DbError   → ApiError                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, position, etc.)
//! 3. Errors are enum variants, never String
//! 4. Every failure is detected before any state changes

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while assembling or finalizing a bill.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested quantity cannot be sold.
    ///
    /// ## When This Occurs
    /// - Quantity is zero or negative
    /// - Quantity exceeds the stock read from the catalog at add time
    ///
    /// ## User Workflow
    /// ```text
    /// add 1 5      (Laptop, stock 3)
    ///      │
    ///      ▼
    /// OutOfStock { product: "Laptop", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Register prints: "Cannot sell 5 x Laptop: 3 in stock"
    /// ```
    #[error("Cannot sell {requested} x {product}: {available} in stock")]
    OutOfStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Adding the line would push the bill's totals past what `i64` holds.
    #[error("Adding {quantity} x {product} would make the bill total too large")]
    AmountTooLarge { product: String, quantity: i64 },

    /// No bill entry at the given position.
    #[error("No bill item at position {position} (bill has {len} items)")]
    IndexOutOfRange { position: usize, len: usize },

    /// Finalization was attempted on a bill without items.
    #[error("Bill has no items")]
    EmptyBill,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
