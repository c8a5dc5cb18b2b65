//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::models::{Article, Query};
use crate::sources::{Source, SourceError};

/// What the mock does when searched
#[derive(Debug, Clone)]
enum Behavior {
    /// Serve the articles registered for the requested page, empty otherwise
    Pages,
    /// Fail every search with this reason
    Fail(String),
    /// Report missing credentials
    Unconfigured,
    /// Panic inside the search task
    Panic,
}

/// A mock source that serves predefined pages and counts its calls.
#[derive(Debug)]
pub struct MockSource {
    id: String,
    name: String,
    behavior: Behavior,
    delay: Option<Duration>,
    pages: Mutex<HashMap<u32, Vec<Article>>>,
    page_failures: Mutex<HashMap<u32, String>>,
    calls: AtomicUsize,
    last_query: Mutex<Option<Query>>,
}

impl MockSource {
    /// Create a mock provider with a display name; the id is the name
    /// lower-cased with spaces replaced by dashes.
    pub fn new(name: &str) -> Self {
        Self {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            behavior: Behavior::Pages,
            delay: None,
            pages: Mutex::new(HashMap::new()),
            page_failures: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    /// A provider whose every search fails with `reason`
    pub fn failing(name: &str, reason: &str) -> Self {
        Self {
            behavior: Behavior::Fail(reason.to_string()),
            ..Self::new(name)
        }
    }

    /// A provider without credentials
    pub fn unconfigured(name: &str) -> Self {
        Self {
            behavior: Behavior::Unconfigured,
            ..Self::new(name)
        }
    }

    /// A provider whose search task panics
    pub fn panicking(name: &str) -> Self {
        Self {
            behavior: Behavior::Panic,
            ..Self::new(name)
        }
    }

    /// Serve `articles` for `page`
    pub fn with_page(self, page: u32, articles: Vec<Article>) -> Self {
        self.set_page(page, articles);
        self
    }

    /// Sleep this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the articles served for `page`
    pub fn set_page(&self, page: u32, articles: Vec<Article>) {
        let mut guard = self.pages.lock().unwrap_or_else(|e| e.into_inner());
        guard.insert(page, articles);
    }

    /// Fail searches for `page` with `reason`, or serve it again with `None`
    pub fn set_page_failure(&self, page: u32, reason: Option<&str>) {
        let mut guard = self.page_failures.lock().unwrap_or_else(|e| e.into_inner());
        match reason {
            Some(reason) => guard.insert(page, reason.to_string()),
            None => guard.remove(&page),
        };
    }

    /// Number of searches performed
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent query received
    pub fn last_query(&self) -> Option<Query> {
        self.last_query
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_configured(&self) -> bool {
        !matches!(self.behavior, Behavior::Unconfigured)
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<Article>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap_or_else(|e| e.into_inner()) = Some(query.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            Behavior::Pages => {
                let failure = self
                    .page_failures
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .get(&query.page)
                    .cloned();
                if let Some(reason) = failure {
                    return Err(SourceError::Api(reason));
                }
                let guard = self.pages.lock().unwrap_or_else(|e| e.into_inner());
                Ok(guard.get(&query.page).cloned().unwrap_or_default())
            }
            Behavior::Fail(reason) => Err(SourceError::Api(reason.clone())),
            Behavior::Unconfigured => Err(SourceError::NotConfigured(self.name.clone())),
            Behavior::Panic => panic!("{} blew up", self.name),
        }
    }
}

/// Helper function to create an article for testing.
///
/// The URL is derived from `id`, so two articles with the same id and title
/// are duplicates of each other.
pub fn make_article(id: &str, title: &str, published_at: &str) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        content: String::new(),
        author: "Test Author".to_string(),
        source: "Mock Wire".to_string(),
        category: String::new(),
        published_at: published_at.to_string(),
        url: format!("https://example.com/{}", id),
        image_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_pages_and_counts_calls() {
        let mock = MockSource::new("Daily Planet")
            .with_page(1, vec![make_article("a", "First", "2024-01-01T00:00:00Z")]);
        assert_eq!(mock.id(), "daily-planet");

        let first = mock.fetch(&Query::default()).await.unwrap();
        let second = mock.fetch(&Query::default().page(2)).await.unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(mock.calls(), 2);
        assert_eq!(mock.last_query().map(|q| q.page), Some(2));
    }

    #[tokio::test]
    async fn test_unconfigured_reports_provider() {
        let mock = MockSource::unconfigured("Daily Planet");
        assert!(!mock.is_configured());

        let err = mock.fetch(&Query::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Daily Planet API key is not configured");
    }
}
