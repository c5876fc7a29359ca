//! # Till Register
//!
//! Terminal front end: one cashier, one active bill, one database.
//!
//! ## Module Layout
//! ```text
//! src/
//! ├── lib.rs       ◄─── You are here (startup)
//! ├── main.rs      ◄─── Binary entry point
//! ├── error.rs     ◄─── ApiError, StartupError
//! ├── repl.rs      ◄─── Line parsing and dispatch
//! ├── display.rs   ◄─── Tables and bill view
//! ├── state/       ◄─── Session, DbState, BillState, AppConfig
//! └── commands/    ◄─── Product, bill and invoice operations
//! ```

pub mod commands;
pub mod display;
pub mod error;
pub mod repl;
pub mod state;

use std::path::PathBuf;

use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::StartupError;
use state::{AppConfig, DbState, Session};
use till_db::seed::seed_sample_catalog;
use till_db::Database;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn,till_db=info,till_register=info,sqlx=warn";

/// Runs the register until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Register Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → till.toml → TILL_* environment → validate              │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, pending migrations applied                  │
/// │     • Sample catalog loaded into an empty store                         │
/// │                                                                         │
/// │  4. Serve Commands ───────────────────────────────────────────────────► │
/// │     • stdin lines → repl::run → stdout                                  │
/// │                                                                         │
/// │  5. Shutdown ─────────────────────────────────────────────────────────► │
/// │     • Close the pool                                                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config_path: Option<PathBuf>) -> Result<(), StartupError> {
    init_tracing();

    info!("Starting Till register");

    let config = AppConfig::load(config_path)?;
    let db_config = config.db_config()?;
    info!(path = %db_config.database_path.display(), "Database path determined");

    let db = Database::new(db_config).await?;
    let seeded = seed_sample_catalog(&db).await?;
    if seeded > 0 {
        info!(count = seeded, "Loaded sample catalog");
    }

    let session = Session::new(DbState::new(db), config);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let result = repl::run(&session, stdin, &mut stdout).await;

    session.db.close().await;
    info!("Register stopped");

    result.map_err(StartupError::from)
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never interleave with receipts on stdout.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every command and query
/// - `RUST_LOG=till_db=debug` - Repository calls only
/// - Default: [`DEFAULT_LOG_FILTER`]
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
