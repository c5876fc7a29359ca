//! # Register Commands
//!
//! Every operation the cashier can trigger, as plain async functions.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── product.rs  ◄─── Catalog listing, search, maintenance
//! ├── bill.rs     ◄─── Active bill: add, remove, customer, clear
//! └── invoice.rs  ◄─── Checkout, archive, export, report
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  till> add 1 2                                                          │
//! │         │                                                               │
//! │         │ (repl::Command::from_str)                                     │
//! │         ▼                                                               │
//! │  commands::bill::add_to_bill(                                           │
//! │      &session.db,             ◄── only the state it needs               │
//! │      &session.bill,                                                     │
//! │      product_id, quantity,                                              │
//! │  ) -> Result<BillLineDto, ApiError>                                     │
//! │         │                                                               │
//! │         │ (display::bill_line)                                          │
//! │         ▼                                                               │
//! │  "Added 2 x Laptop = RS1799.98"                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod bill;
pub mod invoice;
pub mod product;
