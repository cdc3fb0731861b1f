//! Database connection and repositories

pub mod id_allocator;
pub mod movies;
pub mod schema;

pub use id_allocator::{IdAllocator, IdSpec};
pub use movies::{CreateMovie, MovieRecord, MovieRepository};
pub use schema::ensure_schema;

use std::str::FromStr;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use crate::error::Result;

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the maximum connection pool size from environment or default
    fn get_max_connections() -> u32 {
        std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10)
    }

    /// Create a new database connection pool, creating the file if missing
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(Self::get_max_connections())
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Access the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Acquire a connection and open a write transaction with BEGIN IMMEDIATE,
    /// taking SQLite's single write lock up front. Concurrent writers queue on
    /// the busy timeout here; a deferred transaction would instead fail with
    /// SQLITE_BUSY when it tries to upgrade its read lock mid-transaction.
    /// The id allocator only runs inside one of these, so allocation and the
    /// insert that consumes the id serialize as one unit of work.
    ///
    /// Always finish with [commit_write](Self::commit_write) or
    /// [rollback_write](Self::rollback_write); dropping the connection
    /// mid-transaction hands it back to the pool in a dirty state.
    pub async fn begin_write(&self) -> Result<PoolConnection<Sqlite>> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        Ok(conn)
    }

    /// Commit a write transaction opened by [begin_write](Self::begin_write).
    pub async fn commit_write(conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query("COMMIT").execute(&mut *conn).await?;
        Ok(())
    }

    /// Roll back a write transaction opened by [begin_write](Self::begin_write).
    pub async fn rollback_write(conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query("ROLLBACK").execute(&mut *conn).await?;
        Ok(())
    }

    /// Verify the connection is usable
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close all connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
