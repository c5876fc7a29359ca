//! # Database State
//!
//! The one storage handle of a register session.

use till_db::Database;

/// Wrapper around `Database` for the session.
///
/// Created once at startup, passed explicitly to every command and closed
/// when the register exits.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let products = db_state.inner().products().search("mouse").await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// Closes the pool. Later commands fail with `STORAGE_UNAVAILABLE`.
    pub async fn close(&self) {
        self.db.close().await;
    }
}
