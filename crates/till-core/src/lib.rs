//! # till-core: Pure Business Logic for Till
//!
//! This crate is the **heart** of Till. It contains the billing logic as
//! pure functions and plain data with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Register (terminal front end)                   │   │
//! │  │     search ──► add ──► customer ──► checkout ──► receipt        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ till-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  money  │ │  bill   │ │ pricing │ │ receipt │  │   │
//! │  │   │ Product │ │  Money  │ │  Bill   │ │ TaxRate │ │  text   │  │   │
//! │  │   │ Invoice │ │         │ │LineItem │ │ Totals  │ │         │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-db (Database Layer)                     │   │
//! │  │        Catalog store, invoice commit, invoice archive           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LineItem, Customer, Invoice)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`bill`] - The in-progress bill and its finalization
//! - [`pricing`] - Tax rate, tax and grand total computation
//! - [`receipt`] - Fixed-width receipt rendering
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::money::Money;
//! use till_core::pricing::{compute_grand_total, compute_tax, TaxRate};
//!
//! let subtotal = Money::from_cents(179_998); // RS1799.98
//! let tax = compute_tax(subtotal, TaxRate::from_bps(1000)); // 10%
//!
//! // 179.998 rounds to 180.00
//! assert_eq!(tax.cents(), 18_000);
//! assert_eq!(compute_grand_total(subtotal, tax).cents(), 197_998);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill;
pub mod error;
pub mod money;
pub mod pricing;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Money` instead of
// `use till_core::money::Money`

pub use bill::Bill;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{TaxRate, Totals, DEFAULT_TAX_RATE};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Customer name recorded when the cashier leaves the name blank.
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";
