//! # Domain Types
//!
//! Core domain types used throughout Till.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    LineItem     │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (store)     │──►│  product_id     │   │  name           │       │
//! │  │  name           │   │  product_name   │   │  phone          │       │
//! │  │  price_cents    │   │  unit_price     │   └────────┬────────┘       │
//! │  │  stock          │   │  quantity       │            │                │
//! │  └─────────────────┘   └────────┬────────┘            │                │
//! │                                 │                     │                │
//! │                        ┌────────▼─────────────────────▼──┐             │
//! │                        │  InvoiceDraft  ──commit──►  Invoice │          │
//! │                        │  (no id yet)              (id, created_at)     │
//! │                        └─────────────────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A [`LineItem`] copies the product's name and price at the moment it is
//! added to the bill. Later catalog edits never change a bill or an invoice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::pricing::{TaxRate, Totals};
use crate::validation::{
    validate_customer_name, validate_customer_phone, validate_price_cents, validate_product_name,
    validate_stock, validate_tax_rate_bps,
};
use crate::WALK_IN_CUSTOMER;

// =============================================================================
// Product
// =============================================================================

/// A catalog entry available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Store-assigned identifier, unique and never reused.
    pub id: i64,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    /// Unit price in minor units.
    pub price_cents: i64,

    /// Units on hand. Never negative after a committed sale.
    pub stock: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether `quantity` units can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity > 0 && quantity <= self.stock
    }
}

/// Fields the cashier supplies when creating or editing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Money, stock: i64) -> Self {
        NewProduct {
            name: name.into(),
            price_cents: price.cents(),
            stock,
        }
    }

    /// Checks name, price and stock before anything touches the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_product_name(&self.name)?;
        validate_price_cents(self.price_cents)?;
        validate_stock(self.stock)?;
        Ok(())
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One entry on a bill: a product snapshot and a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LineItem {
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Unit price in minor units at time of sale (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
}

impl LineItem {
    /// Snapshots the product's current name and price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        LineItem {
            product_id: product.id,
            product_name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// `unit_price × quantity`, always derived, never stored independently.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// [`Self::line_total`], or `None` if it does not fit in `i64`.
    #[inline]
    pub fn checked_line_total(&self) -> Option<Money> {
        self.unit_price().checked_multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Who the bill is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    /// May be empty.
    pub phone: String,
}

impl Customer {
    /// Builds a customer from what the cashier typed.
    ///
    /// Input is trimmed; a blank name becomes [`WALK_IN_CUSTOMER`].
    pub fn new(name: &str, phone: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        let phone = phone.trim();
        validate_customer_name(name)?;
        validate_customer_phone(phone)?;

        Ok(Customer {
            name: if name.is_empty() {
                WALK_IN_CUSTOMER.to_string()
            } else {
                name.to_string()
            },
            phone: phone.to_string(),
        })
    }

    /// The anonymous customer.
    pub fn walk_in() -> Self {
        Customer {
            name: WALK_IN_CUSTOMER.to_string(),
            phone: String::new(),
        }
    }
}

impl Default for Customer {
    fn default() -> Self {
        Customer::walk_in()
    }
}

// =============================================================================
// Invoice Draft
// =============================================================================

/// A finalized bill that has not been committed yet.
///
/// Produced by [`crate::Bill::finalize`]. Has no id: the store assigns one
/// on commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub customer: Customer,
    pub issued_at: DateTime<Utc>,
    pub tax_rate: TaxRate,
    pub totals: Totals,
    pub items: Vec<LineItem>,
}

impl InvoiceDraft {
    /// Sum of quantities across all items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Recomputes the totals from the items and the tax rate.
    ///
    /// `None` if the subtotal, or twice the subtotal, overflows. At rates up
    /// to 100% the tax never exceeds the subtotal, so the grand total fits.
    pub fn derived_totals(&self) -> Option<Totals> {
        let subtotal = self.items.iter().try_fold(Money::zero(), |acc, item| {
            acc.checked_add(item.checked_line_total()?)
        })?;
        subtotal.checked_add(subtotal)?;
        Some(Totals::from_subtotal(subtotal, self.tax_rate))
    }

    /// Checks that the draft is one [`crate::Bill::finalize`] could have built.
    ///
    /// ## Rules
    /// - Every quantity is positive
    /// - Tax rate is within 0% to 100%
    /// - `totals` equal the totals derived from `items` and `tax_rate`
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.items.iter().any(|item| item.quantity <= 0) {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }
        validate_tax_rate_bps(self.tax_rate.bps())?;

        if self.derived_totals() != Some(self.totals) {
            return Err(ValidationError::InvalidFormat {
                field: "totals".to_string(),
                reason: "do not match the line items".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A committed, immutable record of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Invoice {
    /// Store-assigned identifier.
    pub id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub issued_at: DateTime<Utc>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub grand_total_cents: i64,
    /// Rate the tax was computed at, kept so old invoices stay reproducible.
    pub tax_rate_bps: u32,
    pub created_at: DateTime<Utc>,
    /// Items in the order they were added to the bill.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<LineItem>,
}

impl Invoice {
    /// Assembles a committed invoice from its draft and store-assigned fields.
    pub fn from_draft(draft: &InvoiceDraft, id: i64, created_at: DateTime<Utc>) -> Self {
        Invoice {
            id,
            customer_name: draft.customer.name.clone(),
            customer_phone: draft.customer.phone.clone(),
            issued_at: draft.issued_at,
            subtotal_cents: draft.totals.subtotal.cents(),
            tax_cents: draft.totals.tax.cents(),
            grand_total_cents: draft.totals.grand_total.cents(),
            tax_rate_bps: draft.tax_rate.bps(),
            created_at,
            items: draft.items.clone(),
        }
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn grand_total(&self) -> Money {
        Money::from_cents(self.grand_total_cents)
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Sum of quantities across all items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::DEFAULT_TAX_RATE;

    fn laptop() -> Product {
        Product {
            id: 1,
            name: "Laptop".to_string(),
            price_cents: 89999,
            stock: 15,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_line_item_snapshots_product() {
        let mut product = laptop();
        let item = LineItem::from_product(&product, 2);

        product.name = "Gaming Laptop".to_string();
        product.price_cents = 129999;

        assert_eq!(item.product_name, "Laptop");
        assert_eq!(item.unit_price().cents(), 89999);
        assert_eq!(item.line_total().cents(), 179998);
    }

    #[test]
    fn test_can_sell() {
        let product = laptop();
        assert!(product.can_sell(1));
        assert!(product.can_sell(15));
        assert!(!product.can_sell(16));
        assert!(!product.can_sell(0));
        assert!(!product.can_sell(-1));
    }

    #[test]
    fn test_blank_customer_is_walk_in() {
        let customer = Customer::new("   ", "").unwrap();
        assert_eq!(customer.name, WALK_IN_CUSTOMER);
        assert_eq!(customer, Customer::default());
    }

    #[test]
    fn test_customer_is_trimmed() {
        let customer = Customer::new("  Asha Rao ", " 555-0101 ").unwrap();
        assert_eq!(customer.name, "Asha Rao");
        assert_eq!(customer.phone, "555-0101");
    }

    #[test]
    fn test_customer_phone_too_long() {
        let result = Customer::new("Asha", "123456789012345678901");
        assert!(matches!(result, Err(ValidationError::TooLong { .. })));
    }

    #[test]
    fn test_new_product_validation() {
        assert!(NewProduct::new("Desk Lamp", Money::from_cents(3499), 40)
            .validate()
            .is_ok());
        assert!(NewProduct::new("", Money::from_cents(3499), 40)
            .validate()
            .is_err());
        assert!(NewProduct::new("Lamp", Money::from_cents(-1), 40)
            .validate()
            .is_err());
        assert!(NewProduct::new("Lamp", Money::from_cents(100), -1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_invoice_from_draft() {
        let items = vec![LineItem::from_product(&laptop(), 2)];
        let draft = InvoiceDraft {
            customer: Customer::walk_in(),
            issued_at: Utc::now(),
            tax_rate: DEFAULT_TAX_RATE,
            totals: Totals::from_subtotal(Money::from_cents(179998), DEFAULT_TAX_RATE),
            items,
        };

        let invoice = Invoice::from_draft(&draft, 7, Utc::now());
        assert_eq!(invoice.id, 7);
        assert_eq!(invoice.customer_name, WALK_IN_CUSTOMER);
        assert_eq!(invoice.tax().cents(), 18000);
        assert_eq!(invoice.grand_total().cents(), 197998);
        assert_eq!(invoice.tax_rate(), DEFAULT_TAX_RATE);
        assert_eq!(invoice.total_quantity(), 2);
        assert_eq!(draft.total_quantity(), 2);
    }

    #[test]
    fn test_draft_validate_rejects_tampered_totals() {
        let items = vec![LineItem::from_product(&laptop(), 2)];
        let mut draft = InvoiceDraft {
            customer: Customer::walk_in(),
            issued_at: Utc::now(),
            tax_rate: DEFAULT_TAX_RATE,
            totals: Totals::from_subtotal(Money::from_cents(179998), DEFAULT_TAX_RATE),
            items,
        };
        assert!(draft.validate().is_ok());

        draft.totals.grand_total = Money::from_cents(1);
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::InvalidFormat { .. })
        ));

        draft.totals = Totals::from_subtotal(Money::from_cents(179998), DEFAULT_TAX_RATE);
        draft.items[0].quantity = -2;
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_derived_totals_overflow_is_none() {
        let mut item = LineItem::from_product(&laptop(), 3);
        item.unit_price_cents = i64::MAX / 2;
        let draft = InvoiceDraft {
            customer: Customer::walk_in(),
            issued_at: Utc::now(),
            tax_rate: DEFAULT_TAX_RATE,
            totals: Totals::from_subtotal(Money::zero(), DEFAULT_TAX_RATE),
            items: vec![item],
        };
        assert_eq!(draft.derived_totals(), None);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_invoice_serializes_to_json() {
        let invoice = Invoice {
            id: 3,
            customer_name: "Asha".to_string(),
            customer_phone: String::new(),
            issued_at: Utc::now(),
            subtotal_cents: 2999,
            tax_cents: 300,
            grand_total_cents: 3299,
            tax_rate_bps: 1000,
            created_at: Utc::now(),
            items: vec![],
        };
        let json = serde_json::to_string(&invoice).unwrap();
        assert!(json.contains("\"grand_total_cents\":3299"));
    }
}
