//! Aggregation engine: fan-out, merge and pagination.
//!
//! [`Aggregator`] selects the providers a query names, searches them
//! concurrently and merges their outcomes into one [`AggregatedResult`].
//! [`PaginationController`] drives an aggregator across pages for one search
//! session and accumulates the results.

mod fanout;
mod merge;
mod session;

pub use fanout::fan_out;
pub use merge::{merge, merge_page, sort_newest_first};
pub use session::{PaginationController, Phase, SessionSnapshot};

use crate::models::{AggregatedResult, ProviderOutcome, Query, DEFAULT_PAGE_SIZE};
use crate::sources::SourceRegistry;

/// Searches the registered providers as one
#[derive(Debug, Clone)]
pub struct Aggregator {
    registry: SourceRegistry,
    default_page_size: u32,
}

impl Aggregator {
    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            registry,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Page size applied to queries that leave it unset
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size.max(1);
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// The query as providers receive it, with the page size filled in and
    /// at least 1
    pub fn normalize(&self, query: &Query) -> Query {
        let mut query = query.clone();
        query.page_size = Some(query.page_size.unwrap_or(self.default_page_size).max(1));
        query
    }

    /// Search the selected providers for one page, in registry order
    pub async fn dispatch(&self, query: &Query) -> Vec<ProviderOutcome> {
        let selected = self.registry.select(query);
        if selected.is_empty() {
            tracing::warn!("No source matches {:?}", query.source_tokens());
        }
        fan_out(&selected, query).await
    }

    /// Fetch and merge a single page
    pub async fn fetch_page(&self, query: &Query) -> AggregatedResult {
        let query = self.normalize(query);
        let outcomes = self.dispatch(&query).await;
        merge_page(outcomes, query.effective_page_size())
    }
}
