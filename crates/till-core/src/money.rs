//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floats:                                                    │
//! │    899.99 × 2 × 0.10 = 179.99800000000002  ❌ WRONG!                    │
//! │                                                                         │
//! │  Summing a long bill of such values drifts by fractions of a cent,     │
//! │  and the drift changes with the order the lines were added.            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    89999 × 2 = 179998 (exact)                                          │
//! │    tax = 179998 × 1000 bps / 10000 = 17999.8 → 18000 (rounded ONCE)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::money::Money;
//!
//! // Create from minor units (preferred)
//! let price = Money::from_cents(89999); // RS899.99
//!
//! // Or parse what the cashier typed, exactly
//! let typed: Money = "899.99".parse().unwrap();
//! assert_eq!(typed, price);
//!
//! // Arithmetic operations
//! let doubled = price * 2;
//! assert_eq!(doubled.to_string(), "RS1799.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::pricing::TaxRate;

/// Prefix printed in front of every amount on screen and on receipts.
pub const CURRENCY_PREFIX: &str = "RS";

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: Stock corrections and reports may go negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON export
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price_cents ──► LineItem.unit_price ──► LineItem.line_total    │
/// │                                                                         │
/// │  Bill.subtotal ──► compute_tax ──► compute_grand_total ──► Invoice      │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents RS10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a tax rate, rounding once to the minor unit.
    ///
    /// ## Rounding
    /// Half away from zero: `17999.5` minor units becomes `18000`,
    /// `-0.5` becomes `-1`. The product is computed in `i128`, so there is
    /// no intermediate rounding and no overflow for any `i64` amount.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    /// use till_core::pricing::TaxRate;
    ///
    /// let subtotal = Money::from_cents(179_998); // RS1799.98
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(1000));
    /// // 179.998 → 180.00
    /// assert_eq!(tax.cents(), 18_000);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let product = self.0 as i128 * rate.bps() as i128;
        let rounded = if product >= 0 {
            (product + 5000) / 10000
        } else {
            (product - 5000) / 10000
        };
        Money::from_cents(rounded as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2999); // Wireless Mouse
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 8997);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Like [`Self::multiply_quantity`], but `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Formats the amount with two decimals and no currency prefix.
    ///
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(89999).format_amount(), "899.99");
    /// assert_eq!(Money::from_cents(-550).format_amount(), "-5.50");
    /// ```
    pub fn format_amount(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal amount such as `"899.99"`, `"12.5"` or `"40"`.
///
/// ## Rules
/// - Optional leading `-`
/// - At most two fractional digits (no silent rounding of typed prices)
/// - No exponent, no thousands separators, no currency prefix
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (major_str, minor_str) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major_str.is_empty() && minor_str.is_empty() {
            return Err(invalid("must contain digits"));
        }
        if !major_str.chars().all(|c| c.is_ascii_digit())
            || !minor_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("must be a plain decimal number like 12.50"));
        }
        if minor_str.len() > 2 {
            return Err(invalid("must have at most two decimal places"));
        }

        let major: i64 = if major_str.is_empty() {
            0
        } else {
            major_str.parse().map_err(|_| invalid("is too large"))?
        };
        let minor: i64 = match minor_str.len() {
            0 => 0,
            1 => minor_str.parse::<i64>().map_err(|_| invalid("is malformed"))? * 10,
            _ => minor_str.parse().map_err(|_| invalid("is malformed"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount the way the register and receipts print it.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}{}.{:02}",
            sign,
            CURRENCY_PREFIX,
            self.major().abs(),
            self.minor()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(89999)), "RS899.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "RS5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-RS5.50");
        assert_eq!(format!("{}", Money::zero()), "RS0.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!("899.99".parse::<Money>().unwrap().cents(), 89999);
        assert_eq!("12.5".parse::<Money>().unwrap().cents(), 1250);
        assert_eq!("40".parse::<Money>().unwrap().cents(), 4000);
        assert_eq!(".99".parse::<Money>().unwrap().cents(), 99);
        assert_eq!(" -5.50 ".parse::<Money>().unwrap().cents(), -550);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
        assert!("1.999".parse::<Money>().is_err());
        assert!("1e3".parse::<Money>().is_err());
        assert!("RS10.00".parse::<Money>().is_err());
        assert!("1,000.00".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let mut c = a;
        c += b;
        c -= Money::from_cents(100);
        assert_eq!(c.cents(), 1400);
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_cents(2999);
        assert_eq!(price.checked_multiply_quantity(3), Some(Money::from_cents(8997)));
        assert_eq!(price.checked_add(price), Some(Money::from_cents(5998)));

        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.checked_multiply_quantity(3), None);
        assert_eq!(huge.checked_add(huge).map(|m| m.cents()), Some(i64::MAX - 1));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_cents(89999), Money::from_cents(2999)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 92998);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        let rate = TaxRate::from_bps(1000);
        // 0.5 minor units rounds up
        assert_eq!(Money::from_cents(5).calculate_tax(rate).cents(), 1);
        // 0.4 minor units rounds down
        assert_eq!(Money::from_cents(4).calculate_tax(rate).cents(), 0);
        // Negative amounts mirror positive ones
        assert_eq!(Money::from_cents(-5).calculate_tax(rate).cents(), -1);
    }

    #[test]
    fn test_tax_on_laptop_pair() {
        let subtotal = Money::from_cents(179_998);
        let tax = subtotal.calculate_tax(TaxRate::from_bps(1000));
        assert_eq!(tax.cents(), 18_000);
    }

    #[test]
    fn test_tax_no_overflow_on_huge_amounts() {
        let huge = Money::from_cents(i64::MAX / 2);
        let tax = huge.calculate_tax(TaxRate::from_bps(1000));
        assert!(tax.is_positive());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }
}
