//! Process-wide database handle, created once and shared by every request.

use async_trait::async_trait;
use eh_config::Config;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{error, info};

use crate::{migrate, new_pool, StoreError, StoreResult};

/// Opens the underlying database handle.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Handle: Clone + Send + Sync + 'static;

    async fn connect(&self) -> anyhow::Result<Self::Handle>;
}

/// Opens a SQLite pool and brings its schema up to date.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    database_url: String,
    max_connections: u32,
}

impl SqliteConnector {
    pub fn new(database_url: impl Into<String>, max_connections: u32) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.database_url.clone(), config.max_connections)
    }
}

#[async_trait]
impl Connector for SqliteConnector {
    type Handle = SqlitePool;

    async fn connect(&self) -> anyhow::Result<SqlitePool> {
        let pool = new_pool(&self.database_url, self.max_connections).await?;
        migrate(&pool).await?;
        Ok(pool)
    }
}

type Attempt<H> = Shared<BoxFuture<'static, Result<H, Arc<anyhow::Error>>>>;

/// Lazily connects on first use and hands out the same handle afterwards.
///
/// Every caller that arrives while an attempt is in flight awaits that same
/// attempt and sees its outcome, success or failure. A failed attempt is not
/// cached, so the next call connects again.
pub struct ConnectionManager<C: Connector> {
    connector: Arc<C>,
    handle: OnceCell<C::Handle>,
    in_flight: Mutex<Option<Attempt<C::Handle>>>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            handle: OnceCell::new(),
            in_flight: Mutex::new(None),
        }
    }

    pub async fn connection(&self) -> StoreResult<C::Handle> {
        if let Some(handle) = self.handle.get() {
            return Ok(handle.clone());
        }

        let attempt = {
            let mut slot = self.in_flight.lock().await;
            if let Some(handle) = self.handle.get() {
                return Ok(handle.clone());
            }
            match slot.as_ref() {
                Some(attempt) => attempt.clone(),
                None => {
                    let attempt = self.start_attempt();
                    *slot = Some(attempt.clone());
                    attempt
                }
            }
        };

        let result = attempt.clone().await;

        // Publish the outcome and retire the attempt under the same lock new
        // callers take, so nobody starts a second attempt in between.
        let mut slot = self.in_flight.lock().await;
        if let Ok(handle) = &result {
            let _ = self.handle.set(handle.clone());
        }
        if slot.as_ref().is_some_and(|current| current.ptr_eq(&attempt)) {
            *slot = None;
        }
        drop(slot);

        result.map_err(|e| StoreError::Connection(format!("{:#}", e)))
    }

    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }

    fn start_attempt(&self) -> Attempt<C::Handle> {
        let connector = Arc::clone(&self.connector);
        async move {
            match connector.connect().await {
                Ok(handle) => {
                    info!("Database connected");
                    Ok(handle)
                }
                Err(e) => {
                    error!(error = %format!("{:#}", e), "Database connection failed");
                    Err(Arc::new(e))
                }
            }
        }
        .boxed()
        .shared()
    }
}
