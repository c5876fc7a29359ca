//! # Pricing
//!
//! Subtotal → tax → grand total.
//!
//! ```text
//! Bill subtotal: RS1799.98
//!      │
//!      ▼
//! compute_tax(10%)          179.998 → RS180.00 (rounded once)
//!      │
//!      ▼
//! compute_grand_total       RS1799.98 + RS180.00 = RS1979.98
//! ```
//!
//! Rounding happens exactly once, inside [`compute_tax`]. Subtotals and grand
//! totals are sums of exact minor units, so `subtotal + tax == grand_total`
//! holds by construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

/// The register's fixed tax rate: 10%.
pub const DEFAULT_TAX_RATE: TaxRate = TaxRate::from_bps(1000);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        DEFAULT_TAX_RATE
    }
}

/// Prints `10%`, `8.25%`, `12.5%` (no trailing zeros).
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

// =============================================================================
// Pure Functions
// =============================================================================

/// Tax owed on `subtotal` at `rate`, rounded to the minor unit.
#[inline]
pub fn compute_tax(subtotal: Money, rate: TaxRate) -> Money {
    subtotal.calculate_tax(rate)
}

/// Grand total owed: `subtotal + tax`.
#[inline]
pub fn compute_grand_total(subtotal: Money, tax: Money) -> Money {
    subtotal + tax
}

// =============================================================================
// Totals
// =============================================================================

/// The three figures printed at the bottom of every bill and invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Money,
    pub tax: Money,
    pub grand_total: Money,
}

impl Totals {
    /// Derives tax and grand total from a subtotal.
    pub fn from_subtotal(subtotal: Money, rate: TaxRate) -> Self {
        let tax = compute_tax(subtotal, rate);
        Totals {
            subtotal,
            tax,
            grand_total: compute_grand_total(subtotal, tax),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_display() {
        assert_eq!(TaxRate::from_bps(1000).to_string(), "10%");
        assert_eq!(TaxRate::from_bps(825).to_string(), "8.25%");
        assert_eq!(TaxRate::from_bps(1250).to_string(), "12.5%");
        assert_eq!(TaxRate::zero().to_string(), "0%");
    }

    #[test]
    fn test_default_rate_is_ten_percent() {
        assert_eq!(TaxRate::default().bps(), 1000);
    }

    #[test]
    fn test_laptop_example() {
        let totals = Totals::from_subtotal(Money::from_cents(179_998), DEFAULT_TAX_RATE);
        assert_eq!(totals.subtotal.cents(), 179_998);
        assert_eq!(totals.tax.cents(), 18_000);
        assert_eq!(totals.grand_total.cents(), 197_998);
    }

    #[test]
    fn test_grand_total_matches_subtotal_times_one_plus_rate() {
        // grand_total == s × (1 + r) within half a minor unit, for a spread
        // of subtotals and rates.
        for &bps in &[0u32, 500, 825, 1000, 1750, 10000] {
            for cents in (0..50_000i64).step_by(37) {
                let s = Money::from_cents(cents);
                let grand = compute_grand_total(s, compute_tax(s, TaxRate::from_bps(bps)));
                // exact value scaled by 10000 to stay in integers
                let exact = cents as i128 * (10_000 + bps as i128);
                let diff = (grand.cents() as i128 * 10_000 - exact).abs();
                assert!(diff <= 5_000, "cents={} bps={} grand={}", cents, bps, grand);
            }
        }
    }

    #[test]
    fn test_no_drift_on_repeated_invocation() {
        let s = Money::from_cents(12_345);
        let rate = TaxRate::from_bps(825);
        let first = compute_tax(s, rate);
        for _ in 0..1000 {
            assert_eq!(compute_tax(s, rate), first);
        }
    }

    #[test]
    fn test_zero_subtotal() {
        let totals = Totals::from_subtotal(Money::zero(), DEFAULT_TAX_RATE);
        assert_eq!(totals, Totals::default());
    }
}
