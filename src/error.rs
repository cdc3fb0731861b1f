//! Crate-wide error taxonomy.

/// Errors surfaced by the search and allocation core.
///
/// Store failures pass through unmodified; the core performs no retry and no
/// silent defaulting on failed queries. (Default substitution applies to
/// individually-missing row fields only, in the result mapper.)
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or out-of-whitelist filter input (sort field, direction,
    /// page size, empty title). Upstream validation should prevent these from
    /// ever reaching the query builder; the builder still rejects rather than
    /// coerces.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Any failure from the persistence layer.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Entity table with no registered id column/prefix mapping. A
    /// programming error, distinct from a data error and never recoverable by
    /// retrying.
    #[error("no id mapping registered for table '{0}'")]
    AllocatorConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
