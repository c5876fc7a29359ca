//! # Product Commands
//!
//! Catalog browsing and maintenance from the register.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cashier types: search usb                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  search_products(db, "usb")                                             │
//! │       │   blank query → whole catalog                                   │
//! │       ▼                                                                 │
//! │  ProductRepository::search  (LIKE '%usb%', case-insensitive)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<Product> ordered by name → product table on screen                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::DbState;
use till_core::{Money, NewProduct, Product};

/// Lists the whole catalog, ordered by name.
pub async fn list_products(db: &DbState) -> Result<Vec<Product>, ApiError> {
    Ok(db.inner().products().list_all().await?)
}

/// Searches the catalog by case-insensitive name substring.
///
/// ## Returns
/// Matching products ordered by name; an empty list is not an error.
pub async fn search_products(db: &DbState, query: &str) -> Result<Vec<Product>, ApiError> {
    let start = Instant::now();

    let products = db.inner().products().search(query).await?;

    debug!(
        query = %query.trim(),
        results = products.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "search_products command"
    );

    Ok(products)
}

/// Looks up one product.
pub async fn get_product(db: &DbState, id: i64) -> Result<Product, ApiError> {
    db.inner()
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id.to_string()))
}

/// Adds a product to the catalog.
pub async fn create_product(
    db: &DbState,
    name: &str,
    price: Money,
    stock: i64,
) -> Result<Product, ApiError> {
    let product = db
        .inner()
        .products()
        .insert(&NewProduct::new(name, price, stock))
        .await?;

    info!(id = product.id, name = %product.name, "Product created");
    Ok(product)
}

/// Replaces a product's name, price and stock.
pub async fn update_product(
    db: &DbState,
    id: i64,
    name: &str,
    price: Money,
    stock: i64,
) -> Result<Product, ApiError> {
    let product = db
        .inner()
        .products()
        .update(id, &NewProduct::new(name, price, stock))
        .await?;

    info!(id = id, "Product updated");
    Ok(product)
}

/// Sets the stock on hand to an absolute count.
pub async fn restock_product(db: &DbState, id: i64, stock: i64) -> Result<Product, ApiError> {
    db.inner().products().set_stock(id, stock).await?;
    info!(id = id, stock = stock, "Product restocked");
    get_product(db, id).await
}

/// Removes a product from the catalog. Past invoices are unaffected.
pub async fn delete_product(db: &DbState, id: i64) -> Result<(), ApiError> {
    db.inner().products().delete(id).await?;
    info!(id = id, "Product deleted");
    Ok(())
}
