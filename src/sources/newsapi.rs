//! News API source implementation.
//!
//! Backed by the Event Registry article search endpoint, which takes a JSON
//! request body instead of query parameters.
//! API documentation: <https://eventregistry.org/documentation>

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{Article, ArticleBuilder, Query};
use crate::sources::taxonomy::{self, Taxonomy};
use crate::sources::{map_items, read_json, take_results, Source, SourceError};
use crate::utils::{iso_date, HttpClient};

const NEWS_API_URL: &str = "https://eventregistry.org/api/v1/article/getArticles";
const NEWS_API_NAME: &str = "News API";

/// Largest `articlesCount` the endpoint accepts
const MAX_ARTICLES_COUNT: u32 = 100;

/// Outlets are restricted to these source locations
const SOURCE_LOCATIONS: [&str; 3] = [
    "http://en.wikipedia.org/wiki/United_States",
    "http://en.wikipedia.org/wiki/Canada",
    "http://en.wikipedia.org/wiki/United_Kingdom",
];

/// News API source
#[derive(Debug, Clone)]
pub struct NewsApiSource {
    client: HttpClient,
    api_key: Option<String>,
    endpoint: String,
}

impl NewsApiSource {
    /// Create a new News API source; a blank key counts as absent
    pub fn new(api_key: Option<String>, client: HttpClient) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            endpoint: NEWS_API_URL.to_string(),
        }
    }

    /// Create with the key from `NEWS_API_KEY`
    pub fn from_env() -> Result<Self, SourceError> {
        Ok(Self::new(std::env::var("NEWS_API_KEY").ok(), HttpClient::new()?))
    }

    /// Post searches to a different endpoint
    pub fn with_base_url(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Request body for a search
    fn request_body<'a>(api_key: &'a str, query: &'a Query) -> SearchRequest<'a> {
        SearchRequest {
            action: "getArticles",
            keyword: query.keyword_text().unwrap_or_default(),
            source_location_uri: &SOURCE_LOCATIONS,
            ignore_source_group_uri: "paywall/paywalled_sources",
            articles_page: query.page,
            articles_count: query.effective_page_size().min(MAX_ARTICLES_COUNT),
            articles_sort_by: "date",
            articles_sort_by_asc: false,
            data_type: &["news", "pr"],
            force_max_data_time_window: 31,
            result_type: "articles",
            api_key,
            date_start: query.date_range.start.map(iso_date),
            date_end: query.date_range.end.map(iso_date),
            category_uri: taxonomy::NEWS_API.map(query.category),
        }
    }

    /// Map an Event Registry article to an article
    fn parse_article(raw: NewsApiArticle) -> Option<Article> {
        let url = raw.url.unwrap_or_default();
        let id = raw
            .uri
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| url.clone());

        let body = raw.body.unwrap_or_default();
        let description = raw
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| body.clone());

        let author = raw
            .authors
            .into_iter()
            .find_map(|a| a.name)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        let outlet = raw
            .source
            .and_then(|s| s.title)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Unknown Source".to_string());

        let category = raw
            .categories
            .into_iter()
            .next()
            .and_then(|c| c.label)
            .unwrap_or_default();

        ArticleBuilder::new(
            id,
            raw.title.unwrap_or_default(),
            url,
            outlet,
            raw.date_time.unwrap_or_default(),
        )
        .description(description)
        .content(body)
        .author(author)
        .category(category)
        .image_url(raw.image)
        .build()
    }
}

#[async_trait]
impl Source for NewsApiSource {
    fn id(&self) -> &str {
        "newsapi"
    }

    fn name(&self) -> &str {
        NEWS_API_NAME
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn taxonomy(&self) -> Option<&'static Taxonomy> {
        Some(&taxonomy::NEWS_API)
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<Article>, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::NotConfigured(NEWS_API_NAME.to_string()))?;

        let body = Self::request_body(api_key, query);
        tracing::debug!("News API search page {} ({:?})", query.page, query.keyword_text());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to search News API: {}", e)))?;

        let mut body = read_json(response, NEWS_API_NAME, "/error").await?;
        let results = take_results(&mut body, "/articles/results", "Unexpected API response format")?;

        Ok(map_items(NEWS_API_NAME, results, Self::parse_article))
    }
}

// ===== Event Registry API Types =====

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    action: &'static str,
    keyword: &'a str,
    source_location_uri: &'static [&'static str],
    ignore_source_group_uri: &'static str,
    articles_page: u32,
    articles_count: u32,
    articles_sort_by: &'static str,
    articles_sort_by_asc: bool,
    data_type: &'static [&'static str],
    force_max_data_time_window: u32,
    result_type: &'static str,
    api_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_uri: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    uri: Option<String>,
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
    body: Option<String>,
    #[serde(default)]
    authors: Vec<NewsApiAuthor>,
    source: Option<NewsApiOutlet>,
    #[serde(default)]
    categories: Vec<NewsApiCategory>,
    date_time: Option<String>,
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiAuthor {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiOutlet {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiCategory {
    label: Option<String>,
}
