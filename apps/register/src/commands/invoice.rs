//! # Invoice Commands
//!
//! Checkout and the invoice archive.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout                                        │
//! │                                                                         │
//! │  with_bill(|bill| bill.finalize(rate, now))  ──► InvoiceDraft           │
//! │       │   empty → EMPTY_BILL                                            │
//! │       ▼   (lock released)                                               │
//! │  InvoiceRepository::commit(&draft)                                      │
//! │       │                                                                 │
//! │       ├── Err ──► COMMIT_FAILED, bill kept for the cashier to fix       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  with_bill_mut(Bill::clear)  ──► Invoice (rendered as a receipt)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::state::{BillState, DbState};
use till_core::{Bill, Invoice, Money, TaxRate};

/// Totals across the whole archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub invoice_count: i64,
    pub total_sales_cents: i64,
}

impl SalesReport {
    pub fn total_sales(&self) -> Money {
        Money::from_cents(self.total_sales_cents)
    }
}

/// Commits the active bill as an invoice.
///
/// ## Returns
/// * `Ok(Invoice)` - Committed; the bill is now empty
/// * `Err(EMPTY_BILL)` - Nothing to commit
/// * `Err(COMMIT_FAILED | STORAGE_UNAVAILABLE)` - Nothing written; bill unchanged
pub async fn checkout(db: &DbState, bill: &BillState, rate: TaxRate) -> Result<Invoice, ApiError> {
    let draft = bill.with_bill(|bill| bill.finalize(rate, Utc::now()))?;

    let invoice = db.inner().invoices().commit(&draft).await?;

    bill.with_bill_mut(Bill::clear);

    info!(
        invoice_id = invoice.id,
        grand_total = %invoice.grand_total(),
        "Checkout complete"
    );

    Ok(invoice)
}

/// All invoices, newest first.
pub async fn list_invoices(db: &DbState) -> Result<Vec<Invoice>, ApiError> {
    Ok(db.inner().invoices().list().await?)
}

/// One invoice with its items.
pub async fn get_invoice(db: &DbState, id: i64) -> Result<Invoice, ApiError> {
    Ok(db.inner().invoices().get(id).await?)
}

/// One invoice as pretty-printed JSON.
pub async fn export_invoice(db: &DbState, id: i64) -> Result<String, ApiError> {
    let invoice = get_invoice(db, id).await?;
    serde_json::to_string_pretty(&invoice)
        .map_err(|e| ApiError::internal(format!("Failed to serialize invoice {}: {}", id, e)))
}

/// Invoice count and the sum of grand totals.
pub async fn sales_report(db: &DbState) -> Result<SalesReport, ApiError> {
    let invoices = db.inner().invoices();

    Ok(SalesReport {
        invoice_count: invoices.count().await?,
        total_sales_cents: invoices.total_sales().await?.cents(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::bill::{add_to_bill, get_bill, set_customer};
    use crate::error::ErrorCode;
    use till_core::{NewProduct, DEFAULT_TAX_RATE};
    use till_db::{Database, DbConfig};

    async fn setup() -> (DbState, BillState, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let laptop = db
            .products()
            .insert(&NewProduct::new("Laptop", Money::from_cents(89999), 15))
            .await
            .unwrap();
        (DbState::new(db), BillState::new(), laptop.id)
    }

    #[tokio::test]
    async fn test_checkout_laptop_example() {
        let (db, bill, laptop) = setup().await;
        add_to_bill(&db, &bill, laptop, 2).await.unwrap();
        set_customer(&bill, "Ayesha Khan", "0300-1234567").unwrap();

        let invoice = checkout(&db, &bill, DEFAULT_TAX_RATE).await.unwrap();
        assert_eq!(invoice.subtotal_cents, 179998);
        assert_eq!(invoice.tax_cents, 18000);
        assert_eq!(invoice.grand_total_cents, 197998);
        assert_eq!(invoice.customer_name, "Ayesha Khan");

        assert!(get_bill(&bill, DEFAULT_TAX_RATE).is_empty());

        let stock = db.inner().products().get_by_id(laptop).await.unwrap().unwrap().stock;
        assert_eq!(stock, 13);

        let archive = list_invoices(&db).await.unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[0].items.len(), 1);
        assert_eq!(archive[0].items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_checkout_empty_bill() {
        let (db, bill, _) = setup().await;
        let err = checkout(&db, &bill, DEFAULT_TAX_RATE).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyBill);
        assert_eq!(sales_report(&db).await.unwrap().invoice_count, 0);
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_bill() {
        let (db, bill, laptop) = setup().await;
        add_to_bill(&db, &bill, laptop, 10).await.unwrap();
        add_to_bill(&db, &bill, laptop, 10).await.unwrap();

        let err = checkout(&db, &bill, DEFAULT_TAX_RATE).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CommitFailed);

        assert_eq!(get_bill(&bill, DEFAULT_TAX_RATE).lines.len(), 2);
        let stock = db.inner().products().get_by_id(laptop).await.unwrap().unwrap().stock;
        assert_eq!(stock, 15);
        assert!(list_invoices(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_after_close_is_storage_unavailable() {
        let (db, bill, laptop) = setup().await;
        add_to_bill(&db, &bill, laptop, 1).await.unwrap();
        db.close().await;

        let err = checkout(&db, &bill, DEFAULT_TAX_RATE).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageUnavailable);
        assert_eq!(get_bill(&bill, DEFAULT_TAX_RATE).lines.len(), 1);
    }

    #[tokio::test]
    async fn test_export_and_report() {
        let (db, bill, laptop) = setup().await;
        add_to_bill(&db, &bill, laptop, 1).await.unwrap();
        let invoice = checkout(&db, &bill, DEFAULT_TAX_RATE).await.unwrap();

        let json = export_invoice(&db, invoice.id).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["grand_total_cents"], 98999);
        assert_eq!(value["items"][0]["product_name"], "Laptop");

        let report = sales_report(&db).await.unwrap();
        assert_eq!(report.invoice_count, 1);
        assert_eq!(report.total_sales(), Money::from_cents(98999));

        assert_eq!(
            export_invoice(&db, invoice.id + 1).await.unwrap_err().code,
            ErrorCode::NotFound
        );
    }
}
