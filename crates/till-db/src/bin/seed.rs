//! # Seed Data Loader
//!
//! Creates the schema and loads the sample catalog into an empty database.
//!
//! ## Usage
//! ```bash
//! # Seed ./till_dev.db (default)
//! cargo run -p till-db --bin seed
//!
//! # Specify database path
//! cargo run -p till-db --bin seed -- --db ./data/till.db
//! ```

use std::env;
use till_db::seed::{seed_sample_catalog, SAMPLE_PRODUCTS};
use till_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("till_db=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./till_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Till Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./till_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("Till Seed Data Loader");
    println!("=====================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let inserted = seed_sample_catalog(&db).await?;
    if inserted == 0 {
        let existing = db.products().count().await?;
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
    } else {
        println!("✓ Inserted {} of {} sample products", inserted, SAMPLE_PRODUCTS.len());
    }

    db.close().await;
    Ok(())
}
