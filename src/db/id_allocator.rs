//! Sequential prefixed id allocation ("tt42" style).
//!
//! Each entity table is registered with an id column and a prefix; the next
//! id is `max(existing numeric suffix) + 1`, computed inside the caller's
//! open write transaction so allocation and the insert that consumes the
//! value share one unit of work. Writers open that transaction with
//! [Database::begin_write](crate::db::Database::begin_write), which takes
//! SQLite's single write lock up front - concurrent allocations serialize
//! there instead of racing the max-suffix read, and the TEXT PRIMARY KEY on
//! each id column backstops any writer that slips outside that path.

use std::collections::HashMap;

use sqlx::SqliteConnection;

use crate::error::{Error, Result};

/// Id column and prefix for one entity table.
#[derive(Debug, Clone)]
pub struct IdSpec {
    pub id_column: &'static str,
    pub prefix: &'static str,
}

/// Explicit table-to-id-spec registry.
///
/// Built once at wiring time; unregistered tables fail immediately with
/// [Error::AllocatorConfig] rather than producing a malformed statement.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    entries: HashMap<&'static str, IdSpec>,
}

impl IdAllocator {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register an entity table.
    pub fn register(
        mut self,
        table: &'static str,
        id_column: &'static str,
        prefix: &'static str,
    ) -> Self {
        self.entries.insert(table, IdSpec { id_column, prefix });
        self
    }

    /// The catalog's standard registry.
    pub fn with_catalog_tables() -> Self {
        Self::new()
            .register("movies", "id", "tt")
            .register("directors", "id", "nm")
            .register("genres", "id", "gn")
    }

    /// Allocate the next id for `table` on a connection holding an open
    /// write transaction.
    ///
    /// Returns `<prefix><max + 1>` as a plain decimal, where max is the
    /// largest numeric suffix currently stored (0 for an empty table). Gaps
    /// left by deletions are never reused. Store failures propagate
    /// unchanged; this function performs no retry of its own.
    pub async fn allocate(&self, conn: &mut SqliteConnection, table: &str) -> Result<String> {
        let spec = self
            .entries
            .get(table)
            .ok_or_else(|| Error::AllocatorConfig(table.to_string()))?;

        // Table and column names come from the static registry, never from
        // request input, so embedding them in the statement text is safe.
        let sql = format!(
            "SELECT MAX(CAST(substr({col}, {start}) AS INTEGER)) FROM {table}",
            col = spec.id_column,
            start = spec.prefix.len() + 1,
        );

        let max: Option<i64> = sqlx::query_scalar(&sql).fetch_one(&mut *conn).await?;
        Ok(format!("{}{}", spec.prefix, max.unwrap_or(0) + 1))
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::with_catalog_tables()
    }
}
