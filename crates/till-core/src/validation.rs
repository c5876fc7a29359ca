//! # Validation Module
//!
//! Input validation utilities for Till.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Register command parsing                                     │
//! │  ├── Argument count, integer and amount syntax                         │
//! │  └── Immediate cashier feedback                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rule validation (lengths, ranges)                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product or customer name accepted.
pub const MAX_NAME_LEN: usize = 255;

/// Longest customer phone accepted.
pub const MAX_PHONE_LEN: usize = 20;

/// Longest catalog search query accepted.
pub const MAX_QUERY_LEN: usize = 100;

/// Highest tax rate accepted, in basis points (100%).
pub const MAX_TAX_RATE_BPS: u32 = 10_000;

/// Highest unit price accepted, in minor units (RS10,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

/// Highest stock level accepted.
pub const MAX_STOCK: i64 = 1_000_000_000;

fn check_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 255 characters
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Monitor 24\"").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    check_len("name", name, MAX_NAME_LEN)
}

/// Validates a customer name. Blank is fine (walk-in).
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    check_len("customer name", name.trim(), MAX_NAME_LEN)
}

/// Validates a customer phone. Blank is fine.
pub fn validate_customer_phone(phone: &str) -> ValidationResult<()> {
    check_len("customer phone", phone.trim(), MAX_PHONE_LEN)
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (lists the whole catalog)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();
    check_len("query", query, MAX_QUERY_LEN)?;
    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in minor units.
///
/// ## Rules
/// - Between 0 and [`MAX_PRICE_CENTS`]
/// - Zero is allowed (free items)
///
/// With both caps, one line total (price × stock) stays far inside `i64`.
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(89999).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(i64::MAX / 2).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a stock level. Between 0 and [`MAX_STOCK`].
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK).contains(&stock) {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > MAX_TAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: MAX_TAX_RATE_BPS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("External SSD 1TB").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(255)).is_ok());
        assert!(validate_product_name(&"A".repeat(256)).is_err());
    }

    #[test]
    fn test_lengths_count_characters() {
        // 255 two-byte characters is 510 bytes but still fits
        assert!(validate_product_name(&"é".repeat(255)).is_ok());
        assert!(validate_customer_phone(&"٣".repeat(20)).is_ok());
    }

    #[test]
    fn test_validate_customer_fields() {
        assert!(validate_customer_name("").is_ok());
        assert!(validate_customer_name(&"B".repeat(256)).is_err());
        assert!(validate_customer_phone("").is_ok());
        assert!(validate_customer_phone("+91 98765 43210").is_ok());
        assert!(validate_customer_phone(&"9".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  mouse ").unwrap(), "mouse");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-5).is_err());
    }

    #[test]
    fn test_price_and_stock_have_ceilings() {
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert!(validate_price_cents(MAX_PRICE_CENTS + 1).is_err());
        assert!(validate_price_cents(i64::MAX).is_err());
        assert!(validate_stock(MAX_STOCK).is_ok());
        assert!(validate_stock(MAX_STOCK + 1).is_err());

        // Largest reachable line total fits easily
        assert!(MAX_PRICE_CENTS.checked_mul(MAX_STOCK).is_some());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(1000).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }
}
