//! # Invoice Repository
//!
//! The invoice commit transaction and the invoice archive.
//!
//! ## Commit Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Invoice Commit                                    │
//! │                                                                         │
//! │  InvoiceDraft (from Bill::finalize)                                    │
//! │       │                                                                 │
//! │       ├── no items? ──► DbError::EmptyBill   (nothing touched)          │
//! │       ├── totals ≠ items? ──► DbError::Validation (nothing touched)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │   1. INSERT invoices ............................ id = last_insert_rowid│
//! │   2. INSERT invoice_items × N                                           │
//! │   3. UPDATE products SET stock = stock - qty                            │
//! │        WHERE id = ? AND stock >= qty                 × N                │
//! │       │                                                                 │
//! │       ├── any step fails ──► ROLLBACK ──► DbError::CommitFailed(cause)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ──► Invoice { id, items, totals, ... }                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conditional decrement re-checks stock inside the transaction, so a
//! bill that was valid when assembled can still fail here if stock moved.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::product::decrement_stock_checked;
use till_core::{Invoice, InvoiceDraft, LineItem, Money};

/// Repository for committing and reading invoices.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Persists a finalized bill and decrements stock, all or nothing.
    ///
    /// ## Returns
    /// * `Ok(Invoice)` - Committed; readable through [`Self::get`]
    /// * `Err(DbError::EmptyBill)` - Draft had no items; storage untouched
    /// * `Err(DbError::Validation)` - Stored totals disagree with the items,
    ///   or a quantity is not positive; storage untouched
    /// * `Err(DbError::CommitFailed)` - Rolled back; wraps `NotFound`,
    ///   `InsufficientStock` or the storage error
    pub async fn commit(&self, draft: &InvoiceDraft) -> DbResult<Invoice> {
        if draft.items.is_empty() {
            return Err(DbError::EmptyBill);
        }
        draft.validate()?;

        debug!(
            customer = %draft.customer.name,
            items = draft.items.len(),
            grand_total = %draft.totals.grand_total,
            "Committing invoice"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::commit_failed(e.into()))?;

        let created_at = Utc::now();
        match write_invoice(&mut tx, draft, created_at).await {
            Ok(id) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::commit_failed(e.into()))?;

                info!(
                    invoice_id = id,
                    items = draft.items.len(),
                    grand_total = %draft.totals.grand_total,
                    "Invoice committed"
                );
                Ok(Invoice::from_draft(draft, id, created_at))
            }
            Err(cause) => {
                warn!(error = %cause, "Invoice commit failed, rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(DbError::commit_failed(cause))
            }
        }
    }

    /// Lists all invoices, newest first, each with its items.
    ///
    /// Ties on `issued_at` are broken by id, newest first. Timestamps are
    /// compared as instants (`julianday`), not as text, since fractional
    /// seconds don't sort lexically.
    pub async fn list(&self) -> DbResult<Vec<Invoice>> {
        debug!("Listing invoices");

        let mut invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, customer_name, customer_phone, issued_at,
                   subtotal_cents, tax_cents, grand_total_cents,
                   tax_rate_bps, created_at
            FROM invoices
            ORDER BY julianday(issued_at) DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        for invoice in &mut invoices {
            invoice.items = self.items_for(invoice.id).await?;
        }

        Ok(invoices)
    }

    /// Gets one invoice with its items.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No invoice with this id
    pub async fn get(&self, id: i64) -> DbResult<Invoice> {
        debug!(id = id, "Fetching invoice");

        let mut invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, customer_name, customer_phone, issued_at,
                   subtotal_cents, tax_cents, grand_total_cents,
                   tax_rate_bps, created_at
            FROM invoices
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Invoice", id))?;

        invoice.items = self.items_for(id).await?;
        Ok(invoice)
    }

    /// Sum of all grand totals. Zero when there are no invoices.
    pub async fn total_sales(&self) -> DbResult<Money> {
        let cents: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(grand_total_cents), 0) FROM invoices")
                .fetch_one(&self.pool)
                .await?;

        Ok(Money::from_cents(cents))
    }

    /// Number of committed invoices.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn items_for(&self, invoice_id: i64) -> DbResult<Vec<LineItem>> {
        let items = sqlx::query_as::<_, LineItem>(
            r#"
            SELECT product_id, product_name, unit_price_cents, quantity
            FROM invoice_items
            WHERE invoice_id = ?1
            ORDER BY id
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

/// Steps 1-3 of the commit, on the transaction's connection.
///
/// Returns the new invoice id. Any error leaves the caller to roll back.
async fn write_invoice(
    conn: &mut SqliteConnection,
    draft: &InvoiceDraft,
    created_at: chrono::DateTime<Utc>,
) -> DbResult<i64> {
    let header = sqlx::query(
        r#"
        INSERT INTO invoices (
            customer_name, customer_phone, issued_at,
            subtotal_cents, tax_cents, grand_total_cents,
            tax_rate_bps, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&draft.customer.name)
    .bind(&draft.customer.phone)
    .bind(draft.issued_at)
    .bind(draft.totals.subtotal.cents())
    .bind(draft.totals.tax.cents())
    .bind(draft.totals.grand_total.cents())
    .bind(draft.tax_rate.bps())
    .bind(created_at)
    .execute(&mut *conn)
    .await?;

    let invoice_id = header.last_insert_rowid();

    for item in &draft.items {
        sqlx::query(
            r#"
            INSERT INTO invoice_items (
                invoice_id, product_id, product_name,
                unit_price_cents, quantity, line_total_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(invoice_id)
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(item.unit_price_cents)
        .bind(item.quantity)
        .bind(item.line_total().cents())
        .execute(&mut *conn)
        .await?;
    }

    for item in &draft.items {
        decrement_stock_checked(&mut *conn, item.product_id, item.quantity).await?;
    }

    Ok(invoice_id)
}

// =============================================================================
// Unit Tests
// =============================================================================
