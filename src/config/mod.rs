//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Poster path substituted for catalog entries without artwork.
pub const DEFAULT_POSTER_PATH: &str = "/assets/img/default-poster.jpg";

/// Rating substituted for catalog entries that have not been rated yet.
pub const DEFAULT_RATING: f64 = 7.5;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database path or URL
    /// Use DATABASE_PATH, or DATABASE_URL with a sqlite:// prefix
    pub database_url: String,

    /// Poster path substituted when a record has none
    pub default_poster_path: String,

    /// Rating substituted when a record has none
    pub default_rating: f64,
}

impl Config {
    /// Load configuration from environment variables (.env honored)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_PATH")
            .or_else(|_| env::var("DATABASE_URL"))
            .unwrap_or_else(|_| "./data/cinedex.db".to_string());

        let default_poster_path =
            env::var("DEFAULT_POSTER_PATH").unwrap_or_else(|_| DEFAULT_POSTER_PATH.to_string());

        let default_rating = match env::var("DEFAULT_RATING") {
            Ok(raw) => raw
                .parse::<f64>()
                .context("DEFAULT_RATING must be a number")?,
            Err(_) => DEFAULT_RATING,
        };

        Ok(Self {
            database_url,
            default_poster_path,
            default_rating,
        })
    }

    /// Defaults the result mapper applies to sparse catalog entries.
    pub fn search_defaults(&self) -> SearchDefaults {
        SearchDefaults {
            poster_path: self.default_poster_path.clone(),
            rating: self.default_rating,
        }
    }
}

/// Substitution values for individually-missing row fields.
/// These never apply to failed queries, only to NULL columns in rows that
/// were fetched successfully.
#[derive(Debug, Clone)]
pub struct SearchDefaults {
    pub poster_path: String,
    pub rating: f64,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            poster_path: DEFAULT_POSTER_PATH.to_string(),
            rating: DEFAULT_RATING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_search_defaults_use_crate_constants() {
        let defaults = SearchDefaults::default();
        assert_eq!(defaults.poster_path, DEFAULT_POSTER_PATH);
        assert_eq!(defaults.rating, DEFAULT_RATING);
    }
}
