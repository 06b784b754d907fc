//! SQLite persistence for events and bookings.

use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::str::FromStr;

pub mod connection;
pub mod error;
pub mod repos;

pub use connection::{ConnectionManager, Connector, SqliteConnector};
pub use error::{StoreError, StoreResult};
pub use repos::{BookingRepo, EventRepo};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn new_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid DATABASE_URL: {}", database_url))?
        .create_if_missing(true)
        // Reduce noisy logs by default
        .log_statements(log::LevelFilter::Off);

    let mut pool_opts = SqlitePoolOptions::new().max_connections(max_connections);
    if database_url.contains(":memory:") {
        // An in-memory database lives only as long as its connection.
        pool_opts = pool_opts.idle_timeout(None).max_lifetime(None);
    }

    let pool = pool_opts
        .connect_with(opts)
        .await
        .with_context(|| format!("failed to open {}", database_url))?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await.context("failed to run migrations")?;
    Ok(())
}
