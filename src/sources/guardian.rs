//! The Guardian news source implementation.
//!
//! Uses the Guardian Open Platform content API.
//! API documentation: <https://open-platform.theguardian.com/documentation/>

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{Article, ArticleBuilder, Query};
use crate::sources::taxonomy::{self, Taxonomy};
use crate::sources::{map_items, read_json, take_results, Source, SourceError};
use crate::utils::{iso_date, today, window_or_default, HttpClient};

const GUARDIAN_API_BASE: &str = "https://content.guardianapis.com";
const GUARDIAN_NAME: &str = "The Guardian";

/// Largest `page-size` the content API accepts
const MAX_PAGE_SIZE: u32 = 200;

/// Without a date range the search covers today only
const DEFAULT_LOOKBACK_DAYS: u64 = 0;

/// The Guardian news source
#[derive(Debug, Clone)]
pub struct GuardianSource {
    client: HttpClient,
    api_key: Option<String>,
    base_url: String,
}

impl GuardianSource {
    /// Create a new Guardian source; a blank key counts as absent
    pub fn new(api_key: Option<String>, client: HttpClient) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: GUARDIAN_API_BASE.to_string(),
        }
    }

    /// Create with the key from `GUARDIAN_API_KEY`
    pub fn from_env() -> Result<Self, SourceError> {
        Ok(Self::new(std::env::var("GUARDIAN_API_KEY").ok(), HttpClient::new()?))
    }

    /// Point the source at a different API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Query string for a search request
    fn search_params(api_key: &str, query: &Query, today: NaiveDate) -> Vec<(&'static str, String)> {
        let (from, to) = window_or_default(&query.date_range, today, DEFAULT_LOOKBACK_DAYS);
        let page_size = query.effective_page_size().min(MAX_PAGE_SIZE);

        let mut params = vec![
            ("api-key", api_key.to_string()),
            ("page-size", page_size.to_string()),
            ("page", query.page.to_string()),
            ("from-date", iso_date(from)),
            ("to-date", iso_date(to)),
            ("show-fields", "all,thumbnail,trailText,bodyText,byline".to_string()),
        ];

        if let Some(section) = taxonomy::GUARDIAN.map(query.category) {
            params.push(("section", section.to_string()));
        }

        if let Some(keyword) = query.keyword_text() {
            params.push(("q", format_search_terms(keyword)));
        }

        params
    }

    /// Map a content API result to an article
    fn parse_article(item: GuardianItem) -> Option<Article> {
        let fields = item.fields.unwrap_or_default();
        let author = fields
            .byline
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        ArticleBuilder::new(
            item.id,
            item.web_title.unwrap_or_default(),
            item.web_url.unwrap_or_default(),
            GUARDIAN_NAME,
            item.web_publication_date.unwrap_or_default(),
        )
        .description(fields.trail_text.unwrap_or_default())
        .content(fields.body_text.unwrap_or_default())
        .author(author)
        .category(item.section_name.unwrap_or_default())
        .image_url(fields.thumbnail)
        .build()
    }
}

/// Whitespace-separated terms joined with commas
fn format_search_terms(keyword: &str) -> String {
    keyword.split_whitespace().collect::<Vec<_>>().join(",")
}

#[async_trait]
impl Source for GuardianSource {
    fn id(&self) -> &str {
        "guardian"
    }

    fn name(&self) -> &str {
        GUARDIAN_NAME
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn taxonomy(&self) -> Option<&'static Taxonomy> {
        Some(&taxonomy::GUARDIAN)
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<Article>, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::NotConfigured(GUARDIAN_NAME.to_string()))?;

        let url = format!("{}/search", self.base_url);
        let params = Self::search_params(api_key, query, today());
        tracing::debug!("Guardian search page {} ({:?})", query.page, query.keyword_text());

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to search The Guardian: {}", e)))?;

        let mut body = read_json(response, GUARDIAN_NAME, "/response/message").await?;
        let items = take_results(&mut body, "/response/results", "Unexpected API response format")?;

        Ok(map_items(GUARDIAN_NAME, items, Self::parse_article))
    }
}

// ===== Guardian API Types =====

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuardianItem {
    id: String,
    web_title: Option<String>,
    web_url: Option<String>,
    web_publication_date: Option<String>,
    section_name: Option<String>,
    fields: Option<GuardianFields>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuardianFields {
    trail_text: Option<String>,
    body_text: Option<String>,
    byline: Option<String>,
    thumbnail: Option<String>,
}
