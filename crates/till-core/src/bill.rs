//! # Bill Assembly
//!
//! The in-progress bill: an ordered list of line items plus the customer.
//!
//! ## Bill Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Bill Operations                                      │
//! │                                                                         │
//! │  Cashier Action           Bill Method             State Change          │
//! │  ──────────────           ───────────             ────────────          │
//! │                                                                         │
//! │  add 1 2 ────────────────► add_item() ──────────► items.push(snapshot) │
//! │                                                                         │
//! │  remove 3 ───────────────► remove_item(2) ──────► items.remove(2)      │
//! │                                                                         │
//! │  customer Asha ──────────► set_customer() ──────► customer = ...       │
//! │                                                                         │
//! │  clear ──────────────────► clear() ─────────────► empty, walk-in       │
//! │                                                                         │
//! │  checkout ───────────────► finalize() ──────────► (read only) → Draft  │
//! │                                                                         │
//! │  NOTE: Every failing call leaves the bill exactly as it was.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items keep insertion order.
//! - Adding the same product twice appends a second entry (no merging).
//! - Each entry's quantity was positive and within the stock read at add
//!   time. Stock is not reserved; the commit re-checks it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{TaxRate, Totals};
use crate::types::{Customer, InvoiceDraft, LineItem, Product};

/// The bill currently being rung up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    items: Vec<LineItem>,
    customer: Customer,
}

impl Bill {
    /// Creates an empty bill for a walk-in customer.
    pub fn new() -> Self {
        Bill::default()
    }

    /// Appends `quantity` units of `product` as a price/name snapshot.
    ///
    /// `product` should be the row just read from the catalog; its `stock`
    /// is the limit checked here.
    ///
    /// ## Errors
    /// - [`CoreError::OutOfStock`] if `quantity <= 0` or `quantity > stock`
    /// - [`CoreError::AmountTooLarge`] if the line total, the new subtotal
    ///   or the grand total at up to 100% tax would overflow
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<&LineItem> {
        if !product.can_sell(quantity) {
            return Err(CoreError::OutOfStock {
                product: product.name.clone(),
                available: product.stock,
                requested: quantity,
            });
        }

        let item = LineItem::from_product(product, quantity);
        let fits = item
            .checked_line_total()
            .and_then(|line| self.subtotal().checked_add(line))
            .and_then(|subtotal| subtotal.checked_add(subtotal))
            .is_some();
        if !fits {
            return Err(CoreError::AmountTooLarge {
                product: product.name.clone(),
                quantity,
            });
        }

        self.items.push(item);
        let len = self.items.len();
        Ok(&self.items[len - 1])
    }

    /// Removes and returns the entry at zero-based `position`.
    pub fn remove_item(&mut self, position: usize) -> CoreResult<LineItem> {
        if position >= self.items.len() {
            return Err(CoreError::IndexOutOfRange {
                position,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(position))
    }

    /// Empties the bill and resets the customer to walk-in.
    pub fn clear(&mut self) {
        self.items.clear();
        self.customer = Customer::walk_in();
    }

    /// Sets the customer from raw cashier input.
    pub fn set_customer(&mut self, name: &str, phone: &str) -> CoreResult<()> {
        self.customer = Customer::new(name, phone)?;
        Ok(())
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all entries.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of line totals. Zero for an empty bill.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    pub fn totals(&self, rate: TaxRate) -> Totals {
        Totals::from_subtotal(self.subtotal(), rate)
    }

    /// Freezes the bill into a draft ready for commit.
    ///
    /// The bill itself is left untouched; the caller clears it once the
    /// commit has succeeded.
    pub fn finalize(&self, rate: TaxRate, issued_at: DateTime<Utc>) -> CoreResult<InvoiceDraft> {
        if self.is_empty() {
            return Err(CoreError::EmptyBill);
        }

        Ok(InvoiceDraft {
            customer: self.customer.clone(),
            issued_at,
            tax_rate: rate,
            totals: self.totals(rate),
            items: self.items.clone(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
