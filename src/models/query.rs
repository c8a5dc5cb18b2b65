//! Search query model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Page size used when a query does not request one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Canonical category vocabulary shared by every provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    World,
    Politics,
    Business,
    Technology,
    Science,
    Health,
    Sports,
    Entertainment,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 8] = [
        Category::World,
        Category::Politics,
        Category::Business,
        Category::Technology,
        Category::Science,
        Category::Health,
        Category::Sports,
        Category::Entertainment,
    ];

    /// Returns the display name of the category
    pub fn name(&self) -> &'static str {
        match self {
            Category::World => "World",
            Category::Politics => "Politics",
            Category::Business => "Business",
            Category::Technology => "Technology",
            Category::Science => "Science",
            Category::Health => "Health",
            Category::Sports => "Sports",
            Category::Entertainment => "Entertainment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a string is not a known category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Inclusive calendar date range; either end may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// True when neither end is set
    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// The subset of a query that defines a search session.
///
/// Two queries with equal filter sets belong to the same session and only
/// differ in pagination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSet {
    pub keyword: Option<String>,
    pub date_range: DateRange,
    pub category: Option<Category>,
    pub sources: Vec<String>,
}

/// Search query produced by the caller, immutable per request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Free-text keyword
    pub keyword: Option<String>,

    /// Publication date window
    pub date_range: DateRange,

    /// Category filter
    pub category: Option<Category>,

    /// Provider name tokens; empty selects every provider
    pub sources: Vec<String>,

    /// 1-based page number
    pub page: u32,

    /// Requested page size, provider default when unset
    pub page_size: Option<u32>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            keyword: None,
            date_range: DateRange::default(),
            category: None,
            sources: Vec::new(),
            page: 1,
            page_size: None,
        }
    }
}

impl Query {
    /// Create a query for a keyword
    pub fn new(keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        Self {
            keyword: (!keyword.trim().is_empty()).then_some(keyword),
            ..Default::default()
        }
    }

    /// Set the start of the date range
    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.date_range.start = Some(date);
        self
    }

    /// Set the end of the date range
    pub fn to_date(mut self, date: NaiveDate) -> Self {
        self.date_range.end = Some(date);
        self
    }

    /// Set the category filter
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Add a provider name token to the source filter
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    /// Set the page number (1-based, 0 is treated as 1)
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Set the page size
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size.max(1));
        self
    }

    /// Trimmed keyword, `None` when blank
    pub fn keyword_text(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Requested page size or the default
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Source filter tokens: comma-separated entries are split, trimmed and
    /// blanks dropped
    pub fn source_tokens(&self) -> Vec<String> {
        self.sources
            .iter()
            .flat_map(|s| s.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The session-defining part of this query
    pub fn filters(&self) -> FilterSet {
        FilterSet {
            keyword: self.keyword_text().map(str::to_string),
            date_range: self.date_range,
            category: self.category,
            sources: self.source_tokens(),
        }
    }

    /// Same filters, next page
    pub fn next_page(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("business".parse::<Category>(), Ok(Category::Business));
        assert_eq!(" Sports ".parse::<Category>(), Ok(Category::Sports));
        assert!("gardening".parse::<Category>().is_err());
    }

    #[test]
    fn test_query_defaults() {
        let query = Query::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.effective_page_size(), DEFAULT_PAGE_SIZE);
        assert!(query.keyword_text().is_none());
        assert!(query.date_range.is_open());
    }

    #[test]
    fn test_blank_keyword_is_absent() {
        assert_eq!(Query::new("   ").keyword, None);
        assert_eq!(Query::new("climate").keyword_text(), Some("climate"));
    }

    #[test]
    fn test_source_tokens_split_commas() {
        let query = Query::new("x").source("guardian, nyt").source(" ").source("news");
        assert_eq!(query.source_tokens(), vec!["guardian", "nyt", "news"]);
    }

    #[test]
    fn test_filters_ignore_pagination() {
        let first = Query::new("climate").category(Category::Science).page_size(12);
        let third = first.next_page().next_page();

        assert_eq!(third.page, 3);
        assert_eq!(first.filters(), third.filters());
        assert_ne!(first.filters(), Query::new("climate").filters());
    }

    #[test]
    fn test_page_zero_clamps() {
        assert_eq!(Query::default().page(0).page, 1);
    }
}
