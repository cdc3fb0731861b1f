//! Search filter model: one validated set of parameters per search call.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Page sizes accepted by the search endpoint.
pub const ALLOWED_PAGE_SIZES: [i64; 3] = [10, 20, 30];

/// Whitelisted sort fields.
///
/// The ORDER BY text comes from [column](Self::column) only; request tokens
/// are translated through [FromStr] and never embedded into a statement raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Title,
    ReleaseTime,
    Rating,
}

impl SortField {
    /// SQL column for the ORDER BY clause.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Title => "m.title",
            SortField::ReleaseTime => "m.release_date",
            SortField::Rating => "m.rating",
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortField::Title),
            "releaseTime" => Ok(SortField::ReleaseTime),
            "rating" => Ok(SortField::Rating),
            other => Err(Error::InvalidFilter(format!(
                "unknown sort field '{other}'"
            ))),
        }
    }
}

/// Sort direction for the ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL keyword for the ORDER BY clause.
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(Error::InvalidFilter(format!(
                "unknown sort direction '{other}'"
            ))),
        }
    }
}

/// One search request.
///
/// `title` is required and non-empty by the time the filter reaches the
/// query builder (validated upstream; the builder re-checks). Empty optional
/// filters mean "no filter", not "match empty".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieFilter {
    /// Case-insensitive title substring, required.
    pub title: String,
    /// Substring against the textual release date ("YYYY" or "YYYY-MM-DD").
    #[serde(default)]
    pub released_year: Option<String>,
    /// Case-insensitive substring against joined director names.
    #[serde(default)]
    pub director: Option<String>,
    /// Case-insensitive substring against joined genre names.
    #[serde(default)]
    pub genre: Option<String>,
    /// Page size; must be one of [ALLOWED_PAGE_SIZES].
    pub limit: i64,
    /// Zero-indexed page number.
    pub page: i64,
    #[serde(default)]
    pub order_by: SortField,
    #[serde(default)]
    pub direction: SortDirection,
}

impl MovieFilter {
    /// Title-only filter with default paging and sorting.
    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            released_year: None,
            director: None,
            genre: None,
            limit: ALLOWED_PAGE_SIZES[0],
            page: 0,
            order_by: SortField::default(),
            direction: SortDirection::default(),
        }
    }
}
