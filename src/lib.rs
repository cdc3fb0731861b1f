//! Cinedex - movie catalog search core.
//!
//! Two subsystems make up this crate: a dynamic search query engine that
//! turns a validated filter into a pair of parameterized statements (count
//! plus data) and assembles a paginated result page, and a sequential
//! prefixed identifier allocator that hands out "tt42"-style ids inside the
//! insert transaction. The HTTP layer, request parsing and response
//! formatting live in the embedding application, not here.

pub mod config;
pub mod db;
pub mod error;
pub mod search;

pub use config::{Config, SearchDefaults};
pub use db::{Database, IdAllocator, MovieRepository};
pub use error::{Error, Result};
pub use search::{MovieFilter, MoviePage, MovieSummary, SearchEngine, SortDirection, SortField};
