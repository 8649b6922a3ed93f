use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

pub type DatabasePool = Pool<Sqlite>;

/// Owns the connection pool shared by every repository.
#[derive(Clone)]
pub struct Database {
    pool: DatabasePool,
}

impl Database {
    /// Opens the pool and applies pending migrations.
    ///
    /// In-memory databases are per-connection in SQLite, so they get a pool
    /// of exactly one connection that is never recycled.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid database url: {url}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("failed to open database pool")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;

        info!(in_memory, "database ready");

        Ok(Self { pool })
    }

    pub fn clone_pool(&self) -> DatabasePool {
        self.pool.clone()
    }

    /// Round-trips a trivial query to confirm the database is reachable.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map(|_| ())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
