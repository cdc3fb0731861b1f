//! Dynamic catalog search: filter model, statement builder, row mapping,
//! and the engine that ties them to the store.

pub mod engine;
pub mod filter;
pub mod query;
pub mod row;

pub use engine::{MoviePage, SearchEngine};
pub use filter::{ALLOWED_PAGE_SIZES, MovieFilter, SortDirection, SortField};
pub use query::{SearchStatements, SqlValue, build_search};
pub use row::MovieSummary;
