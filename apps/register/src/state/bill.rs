//! # Bill State
//!
//! The single active bill of the session, behind a `Mutex`.
//!
//! ## Locking Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. await the database (look up product, commit draft)   ◄── no lock   │
//! │  2. with_bill_mut(|bill| ...)                            ◄── sync only │
//! │                                                                         │
//! │  The guard lives only inside the closure, so it can never be held      │
//! │  across an .await.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use till_core::Bill;

/// Shared handle to the active bill.
#[derive(Debug, Clone)]
pub struct BillState {
    bill: Arc<Mutex<Bill>>,
}

impl BillState {
    /// Creates a new empty bill state.
    pub fn new() -> Self {
        BillState {
            bill: Arc::new(Mutex::new(Bill::new())),
        }
    }

    /// Executes a function with read access to the bill.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = bill_state.with_bill(|bill| bill.totals(rate));
    /// ```
    pub fn with_bill<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Bill) -> R,
    {
        // Bill methods never panic mid-mutation; a poisoned Bill is still valid
        let bill = self.bill.lock().unwrap_or_else(PoisonError::into_inner);
        f(&bill)
    }

    /// Executes a function with write access to the bill.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// bill_state.with_bill_mut(|bill| bill.add_item(&product, 2).map(|_| ()))?;
    /// ```
    pub fn with_bill_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Bill) -> R,
    {
        let mut bill = self.bill.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut bill)
    }
}

impl Default for BillState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use till_core::{Money, Product};

    fn product(stock: i64) -> Product {
        Product {
            id: 1,
            name: "Keyboard".to_string(),
            price_cents: 4999,
            stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_clones_share_one_bill() {
        let state = BillState::new();
        let other = state.clone();

        state
            .with_bill_mut(|bill| bill.add_item(&product(5), 2).map(|_| ()))
            .unwrap();

        assert_eq!(other.with_bill(|bill| bill.len()), 1);
        assert_eq!(
            other.with_bill(|bill| bill.subtotal()),
            Money::from_cents(9998)
        );
    }

    #[test]
    fn test_survives_poisoned_lock() {
        let state = BillState::new();
        let poisoner = state.clone();

        let _ = std::thread::spawn(move || {
            poisoner.with_bill_mut::<_, ()>(|_| panic!("boom"));
        })
        .join();

        assert!(state.with_bill(|bill| bill.is_empty()));
    }
}
