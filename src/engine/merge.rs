//! Merging per-provider outcomes into one ordered, deduplicated page.

use crate::models::{AggregatedResult, Article, ProviderOutcome, ALL_SOURCES_FAILED};
use crate::utils::{retain_unseen, DedupIndex};

/// Merge the outcomes of one page request.
///
/// Articles are deduplicated against `seen`, which holds every article
/// already delivered in the session and is extended with the new ones.
/// Continuation is inferred from the raw article count before
/// deduplication: a page with fewer than `page_size` raw articles is taken
/// as the last one, which can be wrong in either direction.
pub fn merge(outcomes: Vec<ProviderOutcome>, page_size: u32, seen: &mut DedupIndex) -> AggregatedResult {
    let queried = outcomes.len();
    let mut gathered = Vec::new();
    let mut failures = Vec::new();

    for outcome in outcomes {
        match outcome {
            ProviderOutcome::Success { articles, .. } => gathered.extend(articles),
            ProviderOutcome::Failure { provider, reason } => {
                failures.push(format!("{}: {}", provider, reason));
            }
        }
    }

    let raw_count = gathered.len();
    let mut articles = retain_unseen(gathered, seen);
    sort_newest_first(&mut articles);

    let total_failure = articles.is_empty() && failures.len() == queried;
    let error = if total_failure {
        Some(ALL_SOURCES_FAILED.to_string())
    } else if !articles.is_empty() && !failures.is_empty() {
        Some(failures.join("; "))
    } else {
        None
    };

    tracing::debug!(
        "Merged {} raw articles into {} ({} failures)",
        raw_count,
        articles.len(),
        failures.len()
    );

    AggregatedResult {
        articles,
        error,
        has_more: raw_count >= page_size as usize,
        raw_count,
        total_failure,
    }
}

/// Merge a standalone page with no earlier articles
pub fn merge_page(outcomes: Vec<ProviderOutcome>, page_size: u32) -> AggregatedResult {
    merge(outcomes, page_size, &mut DedupIndex::new())
}

/// Stable sort, newest first; unparsable timestamps go last
pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by_cached_key(|a| std::cmp::Reverse(a.published_instant()));
}
