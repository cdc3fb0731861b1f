//! Catalog schema: CREATE TABLE statements and idempotent setup.
//!
//! Not a migration system. Tables are created if missing so tests and
//! embedding applications can start against an empty database file.

use sqlx::SqlitePool;

use crate::error::Result;

/// All catalog tables, dependency order. Generated ids are TEXT primary keys
/// ("tt1", "nm3", ...); the PRIMARY KEY uniqueness is what turns a duplicate
/// allocation into a constraint violation instead of a silent duplicate.
const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS movies (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        release_date TEXT,
        backdrop_path TEXT,
        poster_path TEXT,
        rating REAL
    )",
    "CREATE TABLE IF NOT EXISTS directors (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS genres (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS movie_directors (
        movie_id TEXT NOT NULL REFERENCES movies(id),
        director_id TEXT NOT NULL REFERENCES directors(id),
        PRIMARY KEY (movie_id, director_id)
    )",
    "CREATE TABLE IF NOT EXISTS movie_genres (
        movie_id TEXT NOT NULL REFERENCES movies(id),
        genre_id TEXT NOT NULL REFERENCES genres(id),
        PRIMARY KEY (movie_id, genre_id)
    )",
];

/// Create any missing catalog tables.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    for sql in CREATE_TABLES {
        sqlx::query(sql).execute(pool).await?;
    }
    Ok(())
}
