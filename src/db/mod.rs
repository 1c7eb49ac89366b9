pub mod models;
pub mod reader;
pub mod writer;

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tracing::info;

use crate::config::DbConfig;
use crate::error::Result;

const MAX_CONNECTIONS: u32 = 5;

/// Open a pool for the configured store. Postgres in production; any URL the
/// `Any` driver understands works (SQLite for local runs and tests).
pub async fn connect(cfg: &DbConfig) -> Result<AnyPool> {
    sqlx::any::install_default_drivers();
    let url = cfg.connection_url()?;
    let pool = AnyPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(&url)
        .await?;
    info!(host = %cfg.host, database = %cfg.name, "Connected to results store");
    Ok(pool)
}

pub async fn migrate(pool: &AnyPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Single-connection in-memory store with the schema applied.
#[cfg(test)]
pub async fn memory_pool() -> AnyPool {
    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    migrate(&pool).await.expect("apply migrations");
    pool
}
