//! Search orchestration: count, fetch, map, paginate.

use serde::Serialize;
use tracing::debug;

use crate::config::SearchDefaults;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::search::filter::MovieFilter;
use crate::search::query::{SearchStatements, SqlValue, build_search};
use crate::search::row::{MovieSummary, map_row};

/// One page of search results, assembled per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub items: Vec<MovieSummary>,
    /// Count over all matches, independent of pagination.
    pub total_items: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl MoviePage {
    fn assemble(items: Vec<MovieSummary>, total_items: i64, page: i64, limit: i64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + limit - 1) / limit
        };
        Self {
            items,
            total_items,
            page,
            limit,
            total_pages,
            has_next_page: page + 1 < total_pages,
            has_prev_page: page > 0,
        }
    }
}

/// Read-only search entry point.
///
/// Each call is exactly two store round trips: the count statement, then the
/// data statement (director aggregation happens in the statement, not via
/// per-row follow-ups). The two statements observe a consistent snapshot
/// only if the store provides one; a benign mismatch between `total_items`
/// and the returned page under concurrent writes is tolerated. A store
/// failure in either phase aborts the whole call - partial results are never
/// returned.
pub struct SearchEngine {
    db: Database,
    defaults: SearchDefaults,
}

impl SearchEngine {
    pub fn new(db: Database, defaults: SearchDefaults) -> Self {
        Self { db, defaults }
    }

    /// Execute one search call. An empty match is success with an empty page.
    pub async fn search(&self, filter: &MovieFilter) -> Result<MoviePage> {
        let stmts = build_search(filter)?;

        let total_items = self.count(&stmts).await?;
        let items = self.fetch(&stmts).await?;

        Ok(MoviePage::assemble(
            items,
            total_items,
            filter.page,
            filter.limit,
        ))
    }

    async fn count(&self, stmts: &SearchStatements) -> Result<i64> {
        debug!(sql = %stmts.count_sql, "Executing search count query");

        let mut query = sqlx::query_scalar::<_, i64>(&stmts.count_sql);
        for value in &stmts.count_values {
            query = match value {
                SqlValue::String(s) => query.bind(s.as_str()),
                SqlValue::Int(i) => query.bind(*i),
            };
        }

        Ok(query.fetch_one(self.db.pool()).await?)
    }

    async fn fetch(&self, stmts: &SearchStatements) -> Result<Vec<MovieSummary>> {
        debug!(sql = %stmts.data_sql, "Executing search data query");

        let mut query = sqlx::query(&stmts.data_sql);
        for value in &stmts.data_values {
            query = value.bind_to(query);
        }

        let rows = query.fetch_all(self.db.pool()).await?;
        rows.iter()
            .map(|row| map_row(row, &self.defaults).map_err(Error::from))
            .collect()
    }
}
