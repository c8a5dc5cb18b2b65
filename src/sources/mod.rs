//! News provider adapters with an extensible trait-based architecture.
//!
//! This module defines the [`Source`] trait that every provider adapter
//! implements. An adapter translates a canonical [`Query`] into the
//! provider's own request, performs the call, and maps the provider's
//! response into canonical [`Article`]s. Adding a provider means writing one
//! adapter and one [`Taxonomy`] entry set; the fan-out, merge and pagination
//! stages never change.
//!
//! # Feature Flags
//!
//! - `guardian` - The Guardian content API (default: enabled)
//! - `nytimes` - New York Times article search (default: enabled)
//! - `newsapi` - News API article search (default: enabled)
//!
//! # Credentials
//!
//! Each adapter reads its key from configuration, falling back to the
//! environment:
//!
//! - `GUARDIAN_API_KEY`
//! - `NYT_API_KEY`
//! - `NEWS_API_KEY`
//!
//! An adapter without a key is still registered; every search it performs
//! fails fast with "<provider> API key is not configured".

#[cfg(feature = "source-guardian")]
mod guardian;
#[cfg(feature = "source-newsapi")]
mod newsapi;
#[cfg(feature = "source-nytimes")]
mod nytimes;
mod registry;
pub mod taxonomy;

pub mod mock;

#[cfg(feature = "source-guardian")]
pub use guardian::GuardianSource;
pub use mock::MockSource;
#[cfg(feature = "source-newsapi")]
pub use newsapi::NewsApiSource;
#[cfg(feature = "source-nytimes")]
pub use nytimes::NyTimesSource;
pub use registry::SourceRegistry;
pub use taxonomy::Taxonomy;

use async_trait::async_trait;

use crate::models::{Article, ProviderOutcome, Query};

/// The Source trait defines the interface for all news provider adapters.
///
/// Adapters are stateless and may be called concurrently by several queries.
///
/// # Implementing a New Source
///
/// 1. Create a struct that implements `Source`
/// 2. Implement `id`, `name` and `fetch`
/// 3. Add a [`Taxonomy`] for the provider's category vocabulary
/// 4. Register it with [`SourceRegistry`]
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "guardian")
    fn id(&self) -> &str;

    /// Human-readable provider name, matched by source filters
    fn name(&self) -> &str;

    /// Whether the credentials this source needs are present
    fn is_configured(&self) -> bool {
        true
    }

    /// The provider's category vocabulary
    fn taxonomy(&self) -> Option<&'static Taxonomy> {
        None
    }

    /// Fetch one page of articles for the query
    async fn fetch(&self, query: &Query) -> Result<Vec<Article>, SourceError>;

    /// Fetch and fold any error into a failure outcome tagged with this
    /// provider's name. Never fails.
    async fn search(&self, query: &Query) -> ProviderOutcome {
        match self.fetch(query).await {
            Ok(articles) => {
                tracing::debug!("{} returned {} articles", self.name(), articles.len());
                ProviderOutcome::success(self.name(), articles)
            }
            Err(e) => {
                tracing::warn!("Search failed for {}: {}", self.name(), e);
                ProviderOutcome::failure(self.name(), e.to_string())
            }
        }
    }
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The credential this source needs is absent
    #[error("{0} API key is not configured")]
    NotConfigured(String),

    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success response, carrying the provider's message when it sent one
    #[error("{0}")]
    Api(String),

    /// Success body without the expected result array
    #[error("{0}")]
    Schema(String),

    /// Body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

/// Read a response body as JSON, mapping non-2xx statuses to
/// [`SourceError::Api`].
///
/// On failure the message at `error_pointer` (a JSON pointer into the error
/// body) is preferred; otherwise the status line is reported.
pub(crate) async fn read_json(
    response: reqwest::Response,
    provider: &str,
    error_pointer: &str,
) -> Result<serde_json::Value, SourceError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SourceError::Network(format!("Failed to read {} response: {}", provider, e)))?;

    if !status.is_success() {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.pointer(error_pointer).and_then(|m| m.as_str()).map(str::to_string))
            .filter(|m| !m.trim().is_empty());

        return Err(SourceError::Api(
            message.unwrap_or_else(|| format!("{} API error: {}", provider, status)),
        ));
    }

    serde_json::from_str(&body).map_err(SourceError::from)
}

/// Take the array at `pointer` out of a success body, or fail with a schema
/// error when it is missing.
pub(crate) fn take_results(
    body: &mut serde_json::Value,
    pointer: &str,
    message: &str,
) -> Result<Vec<serde_json::Value>, SourceError> {
    match body.pointer_mut(pointer).map(serde_json::Value::take) {
        Some(serde_json::Value::Array(items)) => Ok(items),
        _ => Err(SourceError::Schema(message.to_string())),
    }
}

/// Deserialize raw result items one by one. Items that do not decode or
/// cannot satisfy the article invariant are dropped with a warning.
pub(crate) fn map_items<T, F>(provider: &str, items: Vec<serde_json::Value>, map: F) -> Vec<Article>
where
    T: serde::de::DeserializeOwned,
    F: Fn(T) -> Option<Article>,
{
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(raw) => {
                let article = map(raw);
                if article.is_none() {
                    tracing::warn!("Dropping {} item missing a required field", provider);
                }
                article
            }
            Err(e) => {
                tracing::warn!("Dropping malformed {} item: {}", provider, e);
                None
            }
        })
        .collect()
}
