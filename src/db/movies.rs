//! Movie database repository
//!
//! Owns the transactional write path that consumes allocated ids. Every
//! write opens its transaction with [Database::begin_write], so the
//! allocator's max-suffix read and the insert that uses the result run
//! while holding the database write lock; concurrent writers serialize
//! there instead of racing each other to the same id.

use sqlx::SqliteConnection;

use crate::db::Database;
use crate::db::id_allocator::IdAllocator;
use crate::error::Result;

/// Movie record from database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct MovieRecord {
    pub id: String,
    pub title: String,
    pub release_date: Option<String>,
    pub backdrop_path: Option<String>,
    pub poster_path: Option<String>,
    pub rating: Option<f64>,
}

/// Input for creating a movie
#[derive(Debug, Clone)]
pub struct CreateMovie {
    pub title: String,
    pub release_date: Option<String>,
    pub backdrop_path: Option<String>,
    pub poster_path: Option<String>,
    pub rating: Option<f64>,
}

pub struct MovieRepository {
    db: Database,
    allocator: IdAllocator,
}

impl MovieRepository {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            allocator: IdAllocator::with_catalog_tables(),
        }
    }

    pub fn with_allocator(db: Database, allocator: IdAllocator) -> Self {
        Self { db, allocator }
    }

    /// Insert a movie under a freshly allocated id and return the stored record.
    pub async fn create(&self, input: &CreateMovie) -> Result<MovieRecord> {
        let mut conn = self.db.begin_write().await?;
        match self.insert_movie(&mut conn, input).await {
            Ok(record) => {
                Database::commit_write(&mut conn).await?;
                Ok(record)
            }
            Err(err) => {
                // Best effort; the original error is the one worth surfacing.
                let _ = Database::rollback_write(&mut conn).await;
                Err(err)
            }
        }
    }

    async fn insert_movie(
        &self,
        conn: &mut SqliteConnection,
        input: &CreateMovie,
    ) -> Result<MovieRecord> {
        let id = self.allocator.allocate(&mut *conn, "movies").await?;

        sqlx::query(
            "INSERT INTO movies (id, title, release_date, backdrop_path, poster_path, rating)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&input.title)
        .bind(&input.release_date)
        .bind(&input.backdrop_path)
        .bind(&input.poster_path)
        .bind(input.rating)
        .execute(&mut *conn)
        .await?;

        Ok(MovieRecord {
            id,
            title: input.title.clone(),
            release_date: input.release_date.clone(),
            backdrop_path: input.backdrop_path.clone(),
            poster_path: input.poster_path.clone(),
            rating: input.rating,
        })
    }

    /// Fetch a movie by id.
    pub async fn get(&self, id: &str) -> Result<Option<MovieRecord>> {
        let record = sqlx::query_as::<_, MovieRecord>(
            "SELECT id, title, release_date, backdrop_path, poster_path, rating
             FROM movies WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(record)
    }

    /// Create a director under a freshly allocated id and link it to a movie,
    /// all in one write transaction.
    pub async fn add_director(&self, movie_id: &str, name: &str) -> Result<String> {
        let mut conn = self.db.begin_write().await?;
        match self.insert_director(&mut conn, movie_id, name).await {
            Ok(id) => {
                Database::commit_write(&mut conn).await?;
                Ok(id)
            }
            Err(err) => {
                let _ = Database::rollback_write(&mut conn).await;
                Err(err)
            }
        }
    }

    async fn insert_director(
        &self,
        conn: &mut SqliteConnection,
        movie_id: &str,
        name: &str,
    ) -> Result<String> {
        let id = self.allocator.allocate(&mut *conn, "directors").await?;

        sqlx::query("INSERT INTO directors (id, name) VALUES (?, ?)")
            .bind(&id)
            .bind(name)
            .execute(&mut *conn)
            .await?;
        sqlx::query("INSERT INTO movie_directors (movie_id, director_id) VALUES (?, ?)")
            .bind(movie_id)
            .bind(&id)
            .execute(&mut *conn)
            .await?;

        Ok(id)
    }

    /// Create a genre under a freshly allocated id and link it to a movie,
    /// all in one write transaction.
    pub async fn add_genre(&self, movie_id: &str, name: &str) -> Result<String> {
        let mut conn = self.db.begin_write().await?;
        match self.insert_genre(&mut conn, movie_id, name).await {
            Ok(id) => {
                Database::commit_write(&mut conn).await?;
                Ok(id)
            }
            Err(err) => {
                let _ = Database::rollback_write(&mut conn).await;
                Err(err)
            }
        }
    }

    async fn insert_genre(
        &self,
        conn: &mut SqliteConnection,
        movie_id: &str,
        name: &str,
    ) -> Result<String> {
        let id = self.allocator.allocate(&mut *conn, "genres").await?;

        sqlx::query("INSERT INTO genres (id, name) VALUES (?, ?)")
            .bind(&id)
            .bind(name)
            .execute(&mut *conn)
            .await?;
        sqlx::query("INSERT INTO movie_genres (movie_id, genre_id) VALUES (?, ?)")
            .bind(movie_id)
            .bind(&id)
            .execute(&mut *conn)
            .await?;

        Ok(id)
    }
}
