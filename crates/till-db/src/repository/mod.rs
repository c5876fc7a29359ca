//! # Repository Module
//!
//! Database repository implementations for Till.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Register command                                                      │
//! │       │                                                                 │
//! │       │  db.products().search("usb")                                   │
//! │       │  db.invoices().commit(&draft)                                  │
//! │       ▼                                                                 │
//! │  ProductRepository              InvoiceRepository                      │
//! │  ├── list_all / search          ├── commit (one transaction)           │
//! │  ├── get_by_id / insert         ├── list / get                         │
//! │  ├── update / delete            ├── total_sales                        │
//! │  └── set_stock / decrement      └── count                              │
//! │       │                                │                                │
//! │       └──────────────┬─────────────────┘                                │
//! │                      ▼                                                  │
//! │               SQLite Database                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog CRUD, search, stock
//! - [`InvoiceRepository`](invoice::InvoiceRepository) - Invoice commit and archive

pub mod invoice;
pub mod product;
