//! Row mapping for search results.

use serde::Serialize;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::config::SearchDefaults;

/// One search hit. Immutable once produced; discarded after the response is
/// serialized, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
    pub release_date: Option<String>,
    /// Comma-delimited director names, alphabetical, deduplicated; empty when
    /// the movie has none.
    pub directors: String,
    pub backdrop_path: Option<String>,
    pub poster_path: String,
    pub rating: f64,
}

/// Map one data-statement row into a [MovieSummary].
///
/// Total over sparse catalog entries: a NULL poster path becomes the default
/// poster path, a NULL rating becomes the default rating, other nullable
/// fields pass through. Only id and title are guaranteed non-null by the
/// schema.
pub fn map_row(row: &SqliteRow, defaults: &SearchDefaults) -> Result<MovieSummary, sqlx::Error> {
    let directors: Option<String> = row.try_get("directors")?;
    let poster_path: Option<String> = row.try_get("poster_path")?;
    let rating: Option<f64> = row.try_get("rating")?;

    Ok(MovieSummary {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        release_date: row.try_get("release_date")?,
        directors: directors.unwrap_or_default(),
        backdrop_path: row.try_get("backdrop_path")?,
        poster_path: poster_path.unwrap_or_else(|| defaults.poster_path.clone()),
        rating: rating.unwrap_or(defaults.rating),
    })
}
