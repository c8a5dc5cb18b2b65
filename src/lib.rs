//! # News Aggregator
//!
//! Searches several independent news providers at once and presents their
//! articles as one deduplicated, newest-first feed with incremental
//! ("load more") pagination.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Article, Query, ProviderOutcome, etc.)
//! - [`sources`]: Provider adapters behind the [`Source`] trait, plus the category taxonomy
//! - [`engine`]: Concurrent fan-out, merge and deduplication, and the pagination controller
//! - [`utils`]: HTTP client, deduplication index, date handling and tag extraction
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal output helpers for the CLI
//!
//! ## Example
//!
//! ```no_run
//! use news_aggregator::engine::{Aggregator, PaginationController};
//! use news_aggregator::models::{Category, Query};
//! use news_aggregator::sources::SourceRegistry;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = PaginationController::new(Aggregator::new(SourceRegistry::new()?));
//!
//! let first = session.submit(Query::new("elections").category(Category::Politics)).await;
//! println!("{} articles", first.articles.len());
//!
//! let more = session.on_scroll(true).await;
//! println!("{} articles after page {}", more.articles.len(), more.page);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod models;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use engine::{Aggregator, PaginationController, Phase};
pub use models::{AggregatedResult, Article, ProviderOutcome, Query};
pub use sources::{Source, SourceError, SourceRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
