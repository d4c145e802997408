//! Inkwell database crate.
//!
//! Connection management and schema migrations for the SQLite store shared
//! by the accounts, auth, and posts crates.

use anyhow::Result;
use inkwell_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod migrations;

pub use connection::prepare_database;
pub use migrations::{run_migrations, MIGRATOR};

/// Re-export the pool type the rest of the workspace builds on.
pub use sqlx::SqlitePool as Pool;

/// Connect to the configured database and bring the schema up to date.
pub async fn initialize_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    let pool = prepare_database(config).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
