//! Registry for managing news provider adapters.

use std::sync::Arc;

use super::{Source, SourceError};
use crate::config::Config;
use crate::models::Query;
#[cfg(any(
    feature = "source-guardian",
    feature = "source-nytimes",
    feature = "source-newsapi"
))]
use crate::utils::HttpClient;

#[cfg(feature = "source-guardian")]
use super::GuardianSource;
#[cfg(feature = "source-newsapi")]
use super::NewsApiSource;
#[cfg(feature = "source-nytimes")]
use super::NyTimesSource;

/// Registry for all available news providers
///
/// Registration order is the fan-out order, which fixes dedup tie-breaking
/// and the order of combined error messages.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn Source>>,
}

impl SourceRegistry {
    /// Create a registry with every compiled-in provider, keys taken from
    /// the environment
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&Config::default())
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Create a registry from configuration.
    ///
    /// All providers share one HTTP client. Providers listed in
    /// `sources.disabled` are skipped; providers without a key are still
    /// registered and fail when searched.
    #[allow(unused_variables, unused_mut)]
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let mut registry = Self::empty();

        #[cfg(any(
            feature = "source-guardian",
            feature = "source-nytimes",
            feature = "source-newsapi"
        ))]
        {
            let client = HttpClient::with_timeout(config.search.request_timeout())?;
            let keys = &config.api_keys;

            #[cfg(feature = "source-guardian")]
            registry.register_if_enabled(
                config,
                Arc::new(GuardianSource::new(keys.guardian(), client.clone())),
            );

            #[cfg(feature = "source-newsapi")]
            registry.register_if_enabled(
                config,
                Arc::new(NewsApiSource::new(keys.news_api(), client.clone())),
            );

            #[cfg(feature = "source-nytimes")]
            registry.register_if_enabled(
                config,
                Arc::new(NyTimesSource::new(keys.nytimes(), client.clone())),
            );
        }

        tracing::debug!("Registered {} news sources", registry.len());
        Ok(registry)
    }

    #[allow(dead_code)]
    fn register_if_enabled(&mut self, config: &Config, source: Arc<dyn Source>) {
        if config.sources.is_enabled(source.id()) {
            self.register(source);
        } else {
            tracing::debug!("Source '{}' disabled by configuration", source.id());
        }
    }

    /// Register a source, replacing any source with the same id in place
    pub fn register(&mut self, source: Arc<dyn Source>) {
        match self.sources.iter().position(|s| s.id() == source.id()) {
            Some(index) => self.sources[index] = source,
            None => self.sources.push(source),
        }
    }

    /// Get a source by ID
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Source>> {
        self.sources.iter().find(|s| s.id() == id)
    }

    /// All registered sources, in registration order
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn Source>> {
        self.sources.iter()
    }

    /// All source IDs, in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.id())
    }

    /// Sources a query dispatches to.
    ///
    /// A source is selected when its display name contains any source token
    /// of the query, compared case-insensitively. A query without source
    /// tokens selects every source.
    pub fn select(&self, query: &Query) -> Vec<Arc<dyn Source>> {
        let tokens: Vec<String> = query
            .source_tokens()
            .iter()
            .map(|t| t.to_lowercase())
            .collect();

        self.sources
            .iter()
            .filter(|source| {
                if tokens.is_empty() {
                    return true;
                }
                let name = source.name().to_lowercase();
                tokens.iter().any(|token| name.contains(token.as_str()))
            })
            .cloned()
            .collect()
    }

    /// Get the number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockSource;

    fn registry() -> SourceRegistry {
        let mut registry = SourceRegistry::empty();
        registry.register(Arc::new(MockSource::new("The Guardian")));
        registry.register(Arc::new(MockSource::new("News API")));
        registry.register(Arc::new(MockSource::new("The New York Times")));
        registry
    }

    fn names(selected: &[Arc<dyn Source>]) -> Vec<&str> {
        selected.iter().map(|s| s.name()).collect()
    }

    #[test]
    fn test_empty_filter_selects_all_in_order() {
        let selected = registry().select(&Query::default());
        assert_eq!(
            names(&selected),
            vec!["The Guardian", "News API", "The New York Times"]
        );
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let selected = registry().select(&Query::default().source("guardian"));
        assert_eq!(names(&selected), vec!["The Guardian"]);

        let selected = registry().select(&Query::default().source("YORK, news api"));
        assert_eq!(names(&selected), vec!["News API", "The New York Times"]);
    }

    #[test]
    fn test_filter_matching_nothing_selects_nothing() {
        assert!(registry().select(&Query::default().source("reuters")).is_empty());
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = registry();
        registry.register(Arc::new(MockSource::failing("The Guardian", "down")));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.ids().next(), Some("the-guardian"));
        assert!(registry.get("news-api").is_some());
        assert!(registry.get("reuters").is_none());
    }

    #[cfg(all(
        feature = "source-guardian",
        feature = "source-nytimes",
        feature = "source-newsapi"
    ))]
    #[test]
    fn test_from_config_respects_disabled() {
        let mut config = Config::default();
        config.sources.disabled = vec!["newsapi".to_string()];

        let registry = SourceRegistry::from_config(&config).unwrap();
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["guardian", "nytimes"]);
    }
}
