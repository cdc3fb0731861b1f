//! Parameterized statement construction for catalog search.
//!
//! Each active filter contributes a (clause, bound value) pair; the clauses
//! are joined with AND and raw request values never appear in statement
//! text. The count statement shares the predicate list with the data
//! statement and drops ORDER BY/LIMIT/OFFSET.

use sqlx::Sqlite;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;

use crate::error::{Error, Result};
use crate::search::filter::{ALLOWED_PAGE_SIZES, MovieFilter};

/// A SQL value collected for a parameterized query.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Int(i64),
}

impl SqlValue {
    /// Bind this value to a sqlx query
    pub fn bind_to<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        match self {
            SqlValue::String(s) => query.bind(s.as_str()),
            SqlValue::Int(i) => query.bind(*i),
        }
    }
}

/// The two statements for one search call.
#[derive(Debug, Clone)]
pub struct SearchStatements {
    pub count_sql: String,
    pub data_sql: String,
    /// Predicate binds for the count statement, in clause order.
    pub count_values: Vec<SqlValue>,
    /// Predicate binds plus LIMIT and OFFSET, in placeholder order for the
    /// data statement.
    pub data_values: Vec<SqlValue>,
}

const DIRECTOR_JOINS: &str = " LEFT JOIN movie_directors md ON md.movie_id = m.id \
                               LEFT JOIN directors d ON d.id = md.director_id";
const GENRE_JOINS: &str = " LEFT JOIN movie_genres mg ON mg.movie_id = m.id \
                            LEFT JOIN genres g ON g.id = mg.genre_id";

/// Build the count and data statements for one filter.
///
/// The title predicate is always present; each optional filter that is set
/// and non-blank adds one more AND-joined predicate. Joins multiply base
/// rows, so the data statement groups by the movie id and folds director
/// names into a single comma-delimited, alphabetically ordered, deduplicated
/// string inside the statement itself - no per-row follow-up queries. The
/// count statement counts distinct movie ids over the same predicates.
pub fn build_search(filter: &MovieFilter) -> Result<SearchStatements> {
    if filter.title.trim().is_empty() {
        return Err(Error::InvalidFilter("title must be non-empty".into()));
    }
    if !ALLOWED_PAGE_SIZES.contains(&filter.limit) {
        return Err(Error::InvalidFilter(format!(
            "page size {} is not one of {ALLOWED_PAGE_SIZES:?}",
            filter.limit
        )));
    }
    if filter.page < 0 {
        return Err(Error::InvalidFilter(format!(
            "page must be >= 0, got {}",
            filter.page
        )));
    }
    let offset = filter
        .page
        .checked_mul(filter.limit)
        .ok_or_else(|| Error::InvalidFilter(format!("page {} is out of range", filter.page)))?;

    let mut clauses: Vec<&'static str> = Vec::new();
    let mut values: Vec<SqlValue> = Vec::new();

    clauses.push("LOWER(m.title) LIKE ?");
    values.push(SqlValue::String(contains_pattern(&filter.title)));

    if let Some(year) = active(&filter.released_year) {
        // Release dates are stored as text ("YYYY-MM-DD" or bare "YYYY"), so
        // a substring match covers both forms.
        clauses.push("m.release_date LIKE ?");
        values.push(SqlValue::String(contains_pattern(year)));
    }
    if let Some(director) = active(&filter.director) {
        clauses.push("LOWER(d.name) LIKE ?");
        values.push(SqlValue::String(contains_pattern(director)));
    }
    let genre_filter = active(&filter.genre);
    if let Some(genre) = genre_filter {
        clauses.push("LOWER(g.name) LIKE ?");
        values.push(SqlValue::String(contains_pattern(genre)));
    }

    // Director tables are always joined for the aggregated name column; the
    // genre tables only when a genre predicate needs them.
    let mut joins = String::from(DIRECTOR_JOINS);
    if genre_filter.is_some() {
        joins.push_str(GENRE_JOINS);
    }

    let where_sql = clauses.join(" AND ");

    let count_sql = format!("SELECT COUNT(DISTINCT m.id) FROM movies m{joins} WHERE {where_sql}");

    let data_sql = format!(
        "SELECT m.id, m.title, m.release_date, \
         group_concat(DISTINCT d.name ORDER BY d.name) AS directors, \
         m.backdrop_path, m.poster_path, m.rating \
         FROM movies m{joins} WHERE {where_sql} \
         GROUP BY m.id \
         ORDER BY {col} {dir} \
         LIMIT ? OFFSET ?",
        col = filter.order_by.column(),
        dir = filter.direction.keyword(),
    );

    let count_values = values.clone();
    let mut data_values = values;
    data_values.push(SqlValue::Int(filter.limit));
    data_values.push(SqlValue::Int(offset));

    Ok(SearchStatements {
        count_sql,
        data_sql,
        count_values,
        data_values,
    })
}

/// Treat absent and blank optional filters the same: no predicate.
fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains_pattern(value: &str) -> String {
    format!("%{}%", value.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::search::filter::{SortDirection, SortField};

    #[test]
    fn title_only_filter_binds_a_single_predicate() {
        let stmts = build_search(&MovieFilter::by_title("Dark Knight")).unwrap();

        assert_eq!(
            stmts.count_values,
            vec![SqlValue::String("%dark knight%".to_string())]
        );
        assert!(stmts.data_sql.ends_with("LIMIT ? OFFSET ?"));
        assert_eq!(
            stmts.data_values,
            vec![
                SqlValue::String("%dark knight%".to_string()),
                SqlValue::Int(10),
                SqlValue::Int(0),
            ]
        );
    }

    #[test]
    fn count_statement_mirrors_predicates_without_paging() {
        let mut filter = MovieFilter::by_title("dark");
        filter.director = Some("nolan".into());
        let stmts = build_search(&filter).unwrap();

        assert!(stmts.count_sql.starts_with("SELECT COUNT(DISTINCT m.id)"));
        assert!(stmts.count_sql.contains("LOWER(m.title) LIKE ?"));
        assert!(stmts.count_sql.contains("LOWER(d.name) LIKE ?"));
        assert!(!stmts.count_sql.contains("ORDER BY"));
        assert!(!stmts.count_sql.contains("LIMIT"));
        assert!(!stmts.count_sql.contains("OFFSET"));
    }

    #[test]
    fn optional_filters_add_predicates_only_when_set() {
        let mut filter = MovieFilter::by_title("dark");
        filter.released_year = Some("2008".into());
        filter.director = Some("Nolan".into());
        filter.genre = Some("Action".into());
        let stmts = build_search(&filter).unwrap();

        assert_eq!(stmts.count_values.len(), 4);
        assert_eq!(stmts.data_values.len(), 6);
        assert!(stmts.data_sql.contains("m.release_date LIKE ?"));
        assert!(stmts.data_sql.contains("LOWER(d.name) LIKE ?"));
        assert!(stmts.data_sql.contains("LOWER(g.name) LIKE ?"));
        assert_eq!(
            stmts.count_values[1],
            SqlValue::String("%2008%".to_string())
        );
        assert_eq!(
            stmts.count_values[2],
            SqlValue::String("%nolan%".to_string())
        );
    }

    #[test]
    fn blank_optional_filters_are_no_filter_not_match_empty() {
        let mut filter = MovieFilter::by_title("dark");
        filter.director = Some("   ".into());
        filter.genre = Some(String::new());
        let stmts = build_search(&filter).unwrap();

        assert_eq!(stmts.count_values.len(), 1);
        assert!(!stmts.data_sql.contains("d.name LIKE"));
        assert!(!stmts.data_sql.contains("g.name LIKE"));
    }

    #[test]
    fn genre_join_is_emitted_only_for_an_active_genre_filter() {
        let without = build_search(&MovieFilter::by_title("dark")).unwrap();
        assert!(!without.data_sql.contains("movie_genres"));
        assert!(!without.count_sql.contains("movie_genres"));

        let mut filter = MovieFilter::by_title("dark");
        filter.genre = Some("crime".into());
        let with = build_search(&filter).unwrap();
        assert!(with.data_sql.contains("movie_genres"));
        assert!(with.count_sql.contains("movie_genres"));
    }

    #[test]
    fn sort_clause_matches_the_whitelist_mapping_exactly() {
        for (field, col) in [
            (SortField::Title, "m.title"),
            (SortField::ReleaseTime, "m.release_date"),
            (SortField::Rating, "m.rating"),
        ] {
            for (dir, kw) in [(SortDirection::Asc, "ASC"), (SortDirection::Desc, "DESC")] {
                let mut filter = MovieFilter::by_title("x");
                filter.order_by = field;
                filter.direction = dir;
                let stmts = build_search(&filter).unwrap();
                assert!(stmts.data_sql.contains(&format!("ORDER BY {col} {kw}")));
            }
        }
    }

    #[test]
    fn empty_title_is_rejected_before_any_statement_is_built() {
        assert_matches!(
            build_search(&MovieFilter::by_title("  ")),
            Err(Error::InvalidFilter(_))
        );
    }

    #[test]
    fn page_size_outside_the_allowed_set_is_rejected() {
        let mut filter = MovieFilter::by_title("dark");
        filter.limit = 25;
        assert_matches!(build_search(&filter), Err(Error::InvalidFilter(_)));

        filter.limit = 10;
        filter.page = -1;
        assert_matches!(build_search(&filter), Err(Error::InvalidFilter(_)));
    }

    #[test]
    fn offset_is_page_times_limit() {
        let mut filter = MovieFilter::by_title("dark");
        filter.limit = 20;
        filter.page = 2;
        let stmts = build_search(&filter).unwrap();
        let paging = &stmts.data_values[stmts.data_values.len() - 2..];
        assert_eq!(paging, [SqlValue::Int(20), SqlValue::Int(40)]);
    }

    #[test]
    fn page_beyond_the_offset_range_is_rejected_not_overflowed() {
        let mut filter = MovieFilter::by_title("dark");
        filter.page = i64::MAX;
        assert_matches!(build_search(&filter), Err(Error::InvalidFilter(_)));
    }
}
