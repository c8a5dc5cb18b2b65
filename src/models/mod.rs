//! Core data models for news articles and search operations.

mod article;
mod outcome;
mod query;

pub use article::{Article, ArticleBuilder, Card, IMAGE_PLACEHOLDER};
pub use outcome::{AggregatedResult, ProviderOutcome, ALL_SOURCES_FAILED};
pub use query::{Category, DateRange, FilterSet, Query, UnknownCategory, DEFAULT_PAGE_SIZE};
