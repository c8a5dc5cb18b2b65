//! Pagination and accumulation across one search session.
//!
//! A session starts with [`PaginationController::submit`] and lasts until a
//! query with different filters replaces it. Every fetch happens in two
//! steps: the session state is claimed under the lock, the providers are
//! searched without holding it, and the result is committed under the lock
//! again. A commit carries the session generation it was started for and is
//! dropped if the session was replaced in the meantime.

use serde::Serialize;
use tokio::sync::Mutex;

use super::{merge, Aggregator};
use crate::models::{Article, Card, FilterSet, ProviderOutcome, Query};
use crate::utils::DedupIndex;

/// Where a session is in its page cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// No query submitted yet
    Idle,
    /// Fetching the first page
    Loading,
    /// Articles shown, more may be requested
    Ready,
    /// Fetching a further page
    LoadingMore,
    /// The last page was reached; only a new query leaves this phase
    Exhausted,
}

impl Phase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading | Phase::LoadingMore)
    }
}

/// Point-in-time view of a session for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub articles: Vec<Article>,
    pub error: Option<String>,
    /// Last page committed, 0 before the first one
    pub page: u32,
    pub has_more: bool,
}

impl SessionSnapshot {
    pub fn cards(&self) -> Vec<Card> {
        self.articles.iter().map(Card::from).collect()
    }
}

#[derive(Debug)]
struct SessionState {
    query: Option<Query>,
    filters: Option<FilterSet>,
    articles: Vec<Article>,
    seen: DedupIndex,
    page: u32,
    phase: Phase,
    error: Option<String>,
    has_more: bool,
    generation: u64,
}

impl SessionState {
    fn new() -> Self {
        Self {
            query: None,
            filters: None,
            articles: Vec::new(),
            seen: DedupIndex::new(),
            page: 0,
            phase: Phase::Idle,
            error: None,
            has_more: false,
            generation: 0,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            articles: self.articles.clone(),
            error: self.error.clone(),
            page: self.page,
            has_more: self.has_more,
        }
    }
}

/// A claimed fetch: the page query and the session it belongs to
#[derive(Debug)]
struct Ticket {
    generation: u64,
    query: Query,
}

/// Drives an [`Aggregator`] across the pages of one search session.
///
/// Only the controller mutates the accumulated articles. Triggers that
/// arrive while a fetch is in flight are ignored, so at most one fetch per
/// session runs at a time.
#[derive(Debug)]
pub struct PaginationController {
    aggregator: Aggregator,
    state: Mutex<SessionState>,
}

impl PaginationController {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator,
            state: Mutex::new(SessionState::new()),
        }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Current state
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Start a session for `query`, or refresh the current one.
    ///
    /// Different filters discard everything accumulated and load page 1.
    /// The same filters reload page 1, unless a fetch for them is already
    /// running, in which case the call is ignored.
    pub async fn submit(&self, query: Query) -> SessionSnapshot {
        let ticket = {
            let mut state = self.state.lock().await;
            let query = self.aggregator.normalize(&query.page(1));
            let filters = query.filters();

            if state.phase.is_loading() && state.filters.as_ref() == Some(&filters) {
                tracing::debug!("Search already in flight, ignoring resubmit");
                return state.snapshot();
            }

            if state.phase.is_loading() {
                tracing::info!("Filters changed during a fetch, superseding it");
            }

            state.generation += 1;
            state.query = Some(query.clone());
            state.filters = Some(filters);
            state.articles.clear();
            state.seen = DedupIndex::new();
            state.page = 0;
            state.error = None;
            state.has_more = false;
            state.phase = Phase::Loading;
            tracing::info!("Session {} loading page 1", state.generation);

            Ticket {
                generation: state.generation,
                query,
            }
        };

        self.run(ticket).await
    }

    /// Fetch the next page and append it.
    ///
    /// Ignored unless the session is [`Phase::Ready`].
    pub async fn load_more(&self) -> SessionSnapshot {
        let ticket = {
            let mut state = self.state.lock().await;
            let base = match (&state.query, state.phase) {
                (Some(query), Phase::Ready) => query.clone(),
                (_, phase) => {
                    tracing::debug!("Ignoring load-more while {:?}", phase);
                    return state.snapshot();
                }
            };

            let next = state.page.saturating_add(1);
            state.phase = Phase::LoadingMore;
            tracing::info!("Session {} loading page {}", state.generation, next);

            Ticket {
                generation: state.generation,
                query: base.page(next),
            }
        };

        self.run(ticket).await
    }

    /// Scroll signal from the view; near the bottom it acts as
    /// [`load_more`](Self::load_more)
    pub async fn on_scroll(&self, near_bottom: bool) -> SessionSnapshot {
        if near_bottom {
            self.load_more().await
        } else {
            self.snapshot().await
        }
    }

    /// Forget the session and return to [`Phase::Idle`]
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        let generation = state.generation + 1;
        *state = SessionState::new();
        state.generation = generation;
    }

    async fn run(&self, ticket: Ticket) -> SessionSnapshot {
        let outcomes = self.aggregator.dispatch(&ticket.query).await;
        self.commit(ticket, outcomes).await
    }

    async fn commit(&self, ticket: Ticket, outcomes: Vec<ProviderOutcome>) -> SessionSnapshot {
        let mut state = self.state.lock().await;

        if state.generation != ticket.generation {
            tracing::debug!(
                "Dropping page {} of superseded session {}",
                ticket.query.page,
                ticket.generation
            );
            return state.snapshot();
        }

        let page_size = ticket.query.effective_page_size();
        let result = merge(outcomes, page_size, &mut state.seen);

        state.error = result.error.clone();

        if result.total_failure {
            // The page counter stays put so the next trigger retries this page.
            state.phase = Phase::Ready;
            state.has_more = true;
            tracing::warn!("Page {} failed on every source", ticket.query.page);
            return state.snapshot();
        }

        state.articles.extend(result.articles);
        state.page = ticket.query.page;
        state.has_more = result.has_more;
        state.phase = if result.has_more {
            Phase::Ready
        } else {
            Phase::Exhausted
        };

        tracing::info!(
            "Session {} page {} committed: {} articles total, {:?}",
            ticket.generation,
            state.page,
            state.articles.len(),
            state.phase
        );

        state.snapshot()
    }
}
