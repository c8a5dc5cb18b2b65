//! Utility modules supporting the aggregation engine.
//!
//! - [`deduplicate_articles`], [`retain_unseen`], [`DedupIndex`]: `(title, url)` deduplication
//! - [`extract_tags`]: display tags from article text
//! - [`parse_published_at`], [`calendar_date`]: timestamp handling across provider formats
//! - [`HttpClient`]: shared reqwest client
//! - [`card_table`], [`truncate_with_ellipsis`]: terminal output
//!
//! # Deduplication
//!
//! ```rust
//! use news_aggregator::utils::{deduplicate_articles, DedupIndex, retain_unseen};
//! use news_aggregator::models::Article;
//!
//! # fn example(page_one: Vec<Article>, page_two: Vec<Article>) {
//! let first = deduplicate_articles(page_one);
//! let mut seen = DedupIndex::from_articles(&first);
//! let fresh = retain_unseen(page_two, &mut seen);
//! # }
//! ```

mod dates;
mod dedup;
mod display;
mod http;
mod tags;

pub use dates::{
    calendar_date, compact_date, iso_date, parse_published_at, today, window_or_default,
};
pub use dedup::{deduplicate_articles, retain_unseen, ArticleKey, DedupIndex};
pub use display::{card_plain, card_table, truncate_with_ellipsis};
pub use http::{HttpClient, DEFAULT_TIMEOUT};
pub use tags::{extract_tags, title_case, MAX_TAGS};
