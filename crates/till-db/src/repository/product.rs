//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Listing and case-insensitive substring search
//! - CRUD operations
//! - Stock updates (plain and conditional)
//!
//! ## Substring Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Catalog Search Works                             │
//! │                                                                         │
//! │  Cashier types: "usb"                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  escape_like("usb") → pattern "%usb%"  ('%', '_' and '\' escaped)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  WHERE name LIKE '%usb%' ESCAPE '\'   (ASCII case-insensitive)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ products                                │                           │
//! │  │                                         │                           │
//! │  │ 5  | USB Cable   |   999 | 100          │ ← MATCH!                  │
//! │  │ 13 | USB Hub     |  2499 |  55          │ ← MATCH!                  │
//! │  │ 1  | Laptop      | 89999 |  15          │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results ordered by name: [USB Cable, USB Hub]                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use till_core::validation::{validate_search_query, validate_stock};
use till_core::{NewProduct, Product};

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let results = repo.search("mouse").await?;
/// let product = repo.get_by_id(2).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product, ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        debug!("Listing all products");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock, created_at, updated_at
            FROM products
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Case-insensitive substring search on the product name.
    ///
    /// ## Behavior
    /// - Query is trimmed; an empty query lists the whole catalog
    /// - `%` and `_` in the query match literally
    /// - Case folding is ASCII only (SQLite `LIKE`)
    pub async fn search(&self, query: &str) -> DbResult<Vec<Product>> {
        let query = validate_search_query(query)?;

        debug!(query = %query, "Searching products");

        if query.is_empty() {
            return self.list_all().await;
        }

        let pattern = format!("%{}%", escape_like(&query));

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock, created_at, updated_at
            FROM products
            WHERE name LIKE ?1 ESCAPE '\'
            ORDER BY name, id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product and returns it with its store-assigned id.
    ///
    /// ## Returns
    /// * `Err(DbError::Validation)` - Empty/over-long name, negative price or stock
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        product.validate()?;

        let name = product.name.trim();
        let now = Utc::now();

        debug!(name = %name, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, price_cents, stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            price_cents: product.price_cents,
            stock: product.stock,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces a product's name, price and stock.
    ///
    /// Bills and invoices keep the snapshot they took; only future adds see
    /// the new values.
    pub async fn update(&self, id: i64, product: &NewProduct) -> DbResult<Product> {
        product.validate()?;

        debug!(id = id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                price_cents = ?3,
                stock = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(product.name.trim())
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Sets the stock level to an absolute value (restocking, corrections).
    pub async fn set_stock(&self, id: i64, stock: i64) -> DbResult<()> {
        validate_stock(stock)?;

        debug!(id = id, stock = stock, "Setting stock");

        let result = sqlx::query("UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(stock)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Decrements stock by `amount`, unconditionally.
    ///
    /// Stock may go negative here; the invoice commit uses the conditional
    /// variant instead.
    pub async fn decrement_stock(&self, id: i64, amount: i64) -> DbResult<()> {
        debug!(id = id, amount = amount, "Decrementing stock");

        let result = sqlx::query(
            "UPDATE products SET stock = stock - ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(amount)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Committed invoices keep their item snapshots.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Decrements stock only if enough is on hand, on the caller's connection.
///
/// Used inside the invoice commit transaction.
///
/// ## Returns
/// * `Err(DbError::NotFound)` - No such product
/// * `Err(DbError::InsufficientStock)` - Would take stock below zero
pub(crate) async fn decrement_stock_checked(
    conn: &mut SqliteConnection,
    id: i64,
    amount: i64,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?2, updated_at = ?3
        WHERE id = ?1 AND stock >= ?2
        "#,
    )
    .bind(id)
    .bind(amount)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 1 {
        return Ok(());
    }

    // Zero rows: either the product is gone or there isn't enough of it
    let current: Option<(String, i64)> =
        sqlx::query_as("SELECT name, stock FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    match current {
        None => Err(DbError::not_found("Product", id)),
        Some((name, stock)) => Err(DbError::InsufficientStock {
            product_id: id,
            product: name,
            available: stock,
            requested: amount,
        }),
    }
}

/// Escapes `LIKE` wildcards so the query matches literally.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================
