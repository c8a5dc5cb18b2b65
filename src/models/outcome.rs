//! Per-provider outcomes and the merged response envelope.

use serde::{Deserialize, Serialize};

use crate::models::Article;

/// Terminal error returned when every queried provider failed
pub const ALL_SOURCES_FAILED: &str = "All news sources failed to respond";

/// Result of one provider call: articles or a failure reason, never both.
///
/// A provider returning zero articles is a success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProviderOutcome {
    Success {
        provider: String,
        articles: Vec<Article>,
    },
    Failure {
        provider: String,
        reason: String,
    },
}

impl ProviderOutcome {
    pub fn success(provider: impl Into<String>, articles: Vec<Article>) -> Self {
        ProviderOutcome::Success {
            provider: provider.into(),
            articles,
        }
    }

    pub fn failure(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        ProviderOutcome::Failure {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Display name of the provider that produced this outcome
    pub fn provider(&self) -> &str {
        match self {
            ProviderOutcome::Success { provider, .. } | ProviderOutcome::Failure { provider, .. } => {
                provider
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ProviderOutcome::Failure { .. })
    }

    /// Number of articles returned, zero for failures
    pub fn article_count(&self) -> usize {
        match self {
            ProviderOutcome::Success { articles, .. } => articles.len(),
            ProviderOutcome::Failure { .. } => 0,
        }
    }
}

/// Merged, deduplicated and ordered response for one page request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedResult {
    /// Articles, newest first
    pub articles: Vec<Article>,

    /// Advisory (partial failure) or terminal (total failure) message
    pub error: Option<String>,

    /// Whether another page may hold more articles
    pub has_more: bool,

    /// Article count across providers before deduplication
    pub raw_count: usize,

    /// Set when every queried provider failed
    pub total_failure: bool,
}

impl AggregatedResult {
    /// Error present alongside usable articles
    pub fn advisory(&self) -> Option<&str> {
        if self.total_failure {
            None
        } else {
            self.error.as_deref()
        }
    }
}
