//! # Sample Catalog
//!
//! The fifteen products a fresh register starts with.

use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;
use till_core::{Money, NewProduct};

/// `(name, price in minor units, stock)`
pub const SAMPLE_PRODUCTS: &[(&str, i64, i64)] = &[
    ("Laptop", 89999, 15),
    ("Wireless Mouse", 2999, 50),
    ("Keyboard", 4999, 35),
    ("Monitor 24\"", 19999, 20),
    ("USB Cable", 999, 100),
    ("Headphones", 7999, 40),
    ("Webcam", 5999, 25),
    ("External SSD 1TB", 12999, 30),
    ("Phone Charger", 1999, 75),
    ("Laptop Stand", 3999, 45),
    ("Wireless Keyboard", 6999, 30),
    ("HDMI Cable", 1499, 80),
    ("USB Hub", 2499, 55),
    ("Desk Lamp", 3499, 40),
    ("Ergonomic Mouse Pad", 1999, 60),
];

/// Inserts [`SAMPLE_PRODUCTS`] if the catalog is empty.
///
/// Returns how many products were inserted (zero if the catalog already
/// had products).
pub async fn seed_sample_catalog(db: &Database) -> DbResult<usize> {
    let existing = db.products().count().await?;
    if existing > 0 {
        info!(existing = existing, "Catalog not empty, skipping seed");
        return Ok(0);
    }

    let products = db.products();
    for (name, price_cents, stock) in SAMPLE_PRODUCTS {
        products
            .insert(&NewProduct::new(*name, Money::from_cents(*price_cents), *stock))
            .await?;
    }

    info!(count = SAMPLE_PRODUCTS.len(), "Seeded sample catalog");
    Ok(SAMPLE_PRODUCTS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;

    #[tokio::test]
    async fn test_seed_only_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(seed_sample_catalog(&db).await.unwrap(), 15);
        assert_eq!(seed_sample_catalog(&db).await.unwrap(), 0);
        assert_eq!(db.products().count().await.unwrap(), 15);

        let laptop = db.products().search("laptop").await.unwrap();
        assert_eq!(laptop.len(), 2); // Laptop, Laptop Stand
        assert_eq!(laptop[0].price_cents, 89999);
        assert_eq!(laptop[0].stock, 15);
    }
}
