//! # Bill Commands
//!
//! Ringing up the active bill: add, remove, customer, clear, view.
//!
//! ## Add Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add 1 2                                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductRepository::get_by_id(1)        ◄── await, no lock held         │
//! │       │   None → NOT_FOUND                                              │
//! │       ▼                                                                 │
//! │  with_bill_mut(|bill| bill.add_item(&product, 2))                       │
//! │       │   quantity > stock → OUT_OF_STOCK, bill unchanged               │
//! │       ▼                                                                 │
//! │  LineItem snapshot (name + price frozen now)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::commands::product::get_product;
use crate::error::ApiError;
use crate::state::{BillState, DbState};
use till_core::{Bill, LineItem, TaxRate};

/// One row of the bill as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillLineDto {
    /// 1-based, as shown to the cashier.
    pub position: usize,
    pub product_id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

/// Snapshot of the active bill with totals at the store's tax rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDto {
    pub customer_name: String,
    pub customer_phone: String,
    pub lines: Vec<BillLineDto>,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub grand_total_cents: i64,
    pub tax_rate_bps: u32,
}

impl BillDto {
    pub fn from_bill(bill: &Bill, rate: TaxRate) -> Self {
        let totals = bill.totals(rate);

        BillDto {
            customer_name: bill.customer().name.clone(),
            customer_phone: bill.customer().phone.clone(),
            lines: bill
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| BillLineDto::new(index + 1, item))
                .collect(),
            total_quantity: bill.total_quantity(),
            subtotal_cents: totals.subtotal.cents(),
            tax_cents: totals.tax.cents(),
            grand_total_cents: totals.grand_total.cents(),
            tax_rate_bps: rate.bps(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl BillLineDto {
    fn new(position: usize, item: &LineItem) -> Self {
        BillLineDto {
            position,
            product_id: item.product_id,
            name: item.product_name.clone(),
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
            line_total_cents: item.line_total().cents(),
        }
    }
}

/// Returns the active bill.
pub fn get_bill(bill: &BillState, rate: TaxRate) -> BillDto {
    bill.with_bill(|bill| BillDto::from_bill(bill, rate))
}

/// Adds `quantity` units of a catalog product to the bill.
///
/// Stock is checked against the row just read; a second entry for the same
/// product is checked on its own and caught again at commit.
pub async fn add_to_bill(
    db: &DbState,
    bill: &BillState,
    product_id: i64,
    quantity: i64,
) -> Result<BillLineDto, ApiError> {
    let product = get_product(db, product_id).await?;

    let line = bill.with_bill_mut(|bill| {
        let position = bill.len() + 1;
        bill.add_item(&product, quantity)
            .map(|item| BillLineDto::new(position, item))
    })?;

    debug!(
        product_id = product_id,
        quantity = quantity,
        position = line.position,
        "Added to bill"
    );

    Ok(line)
}

/// Removes the entry at 1-based `position`.
pub fn remove_from_bill(bill: &BillState, position: usize) -> Result<BillLineDto, ApiError> {
    if position == 0 {
        return Err(ApiError::validation("Positions start at 1"));
    }

    let removed = bill.with_bill_mut(|bill| bill.remove_item(position - 1))?;
    debug!(position = position, product_id = removed.product_id, "Removed from bill");

    Ok(BillLineDto::new(position, &removed))
}

/// Sets the customer. A blank name means a walk-in customer.
pub fn set_customer(bill: &BillState, name: &str, phone: &str) -> Result<(), ApiError> {
    bill.with_bill_mut(|bill| bill.set_customer(name, phone))?;
    Ok(())
}

/// Empties the bill and resets the customer.
pub fn clear_bill(bill: &BillState) {
    bill.with_bill_mut(Bill::clear);
    info!("Bill cleared");
}
