//! # Register State
//!
//! Everything a session holds between commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session                                                                │
//! │  ┌──────────────┐ ┌──────────────────┐ ┌─────────────────────────────┐ │
//! │  │ DbState      │ │ BillState        │ │ AppConfig                   │ │
//! │  │ (Database)   │ │ (Mutex<Bill>)    │ │ (store name, tax rate, db)  │ │
//! │  └──────────────┘ └──────────────────┘ └─────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands take only the pieces they need.

mod bill;
pub mod config;
mod db;

pub use bill::BillState;
pub use config::AppConfig;
pub use db::DbState;

/// The state of one register session.
#[derive(Debug)]
pub struct Session {
    pub db: DbState,
    pub bill: BillState,
    pub config: AppConfig,
}

impl Session {
    /// Starts a session with an empty bill.
    pub fn new(db: DbState, config: AppConfig) -> Self {
        Session {
            db,
            bill: BillState::new(),
            config,
        }
    }
}
