//! Concurrent dispatch of one query to many providers.

use futures_util::future::join_all;
use std::sync::Arc;

use crate::models::{ProviderOutcome, Query};
use crate::sources::Source;

/// Search every source concurrently and wait for all of them to settle.
///
/// Each source runs in its own task, so a slow provider never blocks the
/// others and a panicking one is reported as a failure instead of tearing
/// down the request. Outcomes come back in the order of `sources`.
pub async fn fan_out(sources: &[Arc<dyn Source>], query: &Query) -> Vec<ProviderOutcome> {
    tracing::debug!(
        "Dispatching page {} to {} sources",
        query.page,
        sources.len()
    );

    let handles = sources.iter().map(|source| {
        let source = Arc::clone(source);
        let query = query.clone();
        tokio::spawn(async move { source.search(&query).await })
    });

    let settled = join_all(handles).await;

    settled
        .into_iter()
        .zip(sources)
        .map(|(joined, source)| match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                let reason = if e.is_panic() {
                    "search task panicked"
                } else {
                    "search task was cancelled"
                };
                tracing::warn!("{} {}", source.name(), reason);
                ProviderOutcome::failure(source.name(), reason)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::{make_article, MockSource};
    use std::time::Duration;

    #[tokio::test]
    async fn test_outcomes_keep_source_order() {
        let slow = MockSource::new("Slow Wire")
            .with_page(1, vec![make_article("s", "Slow", "2024-01-01T00:00:00Z")])
            .with_delay(Duration::from_millis(50));
        let fast = MockSource::new("Fast Wire")
            .with_page(1, vec![make_article("f", "Fast", "2024-01-02T00:00:00Z")]);
        let sources: Vec<Arc<dyn Source>> = vec![Arc::new(slow), Arc::new(fast)];

        let outcomes = fan_out(&sources, &Query::default()).await;

        let providers: Vec<&str> = outcomes.iter().map(|o| o.provider()).collect();
        assert_eq!(providers, vec!["Slow Wire", "Fast Wire"]);
        assert!(outcomes.iter().all(|o| o.article_count() == 1));
    }

    #[tokio::test]
    async fn test_panic_becomes_failure() {
        let sources: Vec<Arc<dyn Source>> = vec![
            Arc::new(MockSource::panicking("Broken Wire")),
            Arc::new(MockSource::new("Quiet Wire")),
        ];

        let outcomes = fan_out(&sources, &Query::default()).await;

        assert_eq!(
            outcomes[0],
            ProviderOutcome::failure("Broken Wire", "search task panicked")
        );
        assert_eq!(outcomes[1], ProviderOutcome::success("Quiet Wire", Vec::new()));
    }

    #[tokio::test]
    async fn test_no_sources() {
        assert!(fan_out(&[], &Query::default()).await.is_empty());
    }
}
