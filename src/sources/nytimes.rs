//! New York Times news source implementation.
//!
//! Uses the Article Search API v2.
//! API documentation: <https://developer.nytimes.com/docs/articlesearch-product/1/overview>
//!
//! Article Search pages are 0-based and always hold ten documents, so the
//! requested page size is not forwarded.

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use crate::models::{Article, ArticleBuilder, Query};
use crate::sources::taxonomy::{self, Taxonomy};
use crate::sources::{map_items, read_json, take_results, Source, SourceError};
use crate::utils::{compact_date, today, window_or_default, HttpClient};

const NYT_API_BASE: &str = "https://api.nytimes.com/svc/search/v2";
const NYT_NAME: &str = "The New York Times";
const NYT_WEB_BASE: &str = "https://www.nytimes.com/";

/// Highest 0-based page index Article Search serves
const MAX_PAGE_INDEX: u32 = 100;

/// Without a date range the search covers the last week
const DEFAULT_LOOKBACK_DAYS: u64 = 7;

static BYLINE_PREFIX: OnceLock<Option<Regex>> = OnceLock::new();

/// New York Times news source
#[derive(Debug, Clone)]
pub struct NyTimesSource {
    client: HttpClient,
    api_key: Option<String>,
    base_url: String,
}

impl NyTimesSource {
    /// Create a new New York Times source; a blank key counts as absent
    pub fn new(api_key: Option<String>, client: HttpClient) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: NYT_API_BASE.to_string(),
        }
    }

    /// Create with the key from `NYT_API_KEY`
    pub fn from_env() -> Result<Self, SourceError> {
        Ok(Self::new(std::env::var("NYT_API_KEY").ok(), HttpClient::new()?))
    }

    /// Point the source at a different API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Query string for a search request
    fn search_params(
        api_key: &str,
        query: &Query,
        today: NaiveDate,
    ) -> Result<Vec<(&'static str, String)>, SourceError> {
        let page_index = query.page.saturating_sub(1);
        if page_index > MAX_PAGE_INDEX {
            return Err(SourceError::InvalidRequest(format!(
                "page {} is beyond the last page Article Search serves",
                query.page
            )));
        }

        let (begin, end) = window_or_default(&query.date_range, today, DEFAULT_LOOKBACK_DAYS);

        let mut filters = vec![r#"source:("The New York Times")"#.to_string()];
        if let Some(desk) = taxonomy::NYTIMES.map(query.category) {
            filters.push(format!(r#"news_desk:("{}")"#, desk));
        }

        Ok(vec![
            ("api-key", api_key.to_string()),
            ("q", query.keyword_text().unwrap_or("*").to_string()),
            ("page", page_index.to_string()),
            ("sort", "newest".to_string()),
            ("begin_date", compact_date(begin)),
            ("end_date", compact_date(end)),
            ("fq", filters.join(" AND ")),
        ])
    }

    /// Map an Article Search document to an article
    fn parse_article(doc: NytDoc) -> Option<Article> {
        let author = doc
            .byline
            .and_then(|b| b.original)
            .map(|original| clean_byline(&original))
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        let image_url = doc.multimedia.as_ref().and_then(first_image_url).map(|url| {
            if url.starts_with("http://") || url.starts_with("https://") {
                url
            } else {
                format!("{}{}", NYT_WEB_BASE, url.trim_start_matches('/'))
            }
        });

        ArticleBuilder::new(
            doc.id,
            doc.headline.and_then(|h| h.main).unwrap_or_default(),
            doc.web_url.unwrap_or_default(),
            NYT_NAME,
            doc.pub_date.unwrap_or_default(),
        )
        .description(doc.r#abstract.unwrap_or_default())
        .content(doc.lead_paragraph.unwrap_or_default())
        .author(author)
        .category(doc.news_desk.unwrap_or_default())
        .image_url(image_url)
        .build()
    }
}

/// Drop the leading "By " from a byline
fn clean_byline(original: &str) -> String {
    let prefix = BYLINE_PREFIX.get_or_init(|| Regex::new(r"^\s*[Bb]y\s+").ok());
    match prefix {
        Some(re) => re.replace(original, "").trim().to_string(),
        None => original.trim().to_string(),
    }
}

/// First image URL from either multimedia shape: a list of renditions, or an
/// object keyed by rendition name
fn first_image_url(multimedia: &serde_json::Value) -> Option<String> {
    let url = match multimedia {
        serde_json::Value::Array(items) => items.first().and_then(|m| m.get("url")),
        serde_json::Value::Object(map) => map
            .get("default")
            .or_else(|| map.get("thumbnail"))
            .and_then(|m| m.get("url")),
        _ => None,
    };

    url.and_then(|u| u.as_str())
        .filter(|u| !u.trim().is_empty())
        .map(str::to_string)
}

#[async_trait]
impl Source for NyTimesSource {
    fn id(&self) -> &str {
        "nytimes"
    }

    fn name(&self) -> &str {
        NYT_NAME
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn taxonomy(&self) -> Option<&'static Taxonomy> {
        Some(&taxonomy::NYTIMES)
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<Article>, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::NotConfigured(NYT_NAME.to_string()))?;

        let url = format!("{}/articlesearch.json", self.base_url);
        let params = Self::search_params(api_key, query, today())?;
        tracing::debug!("NYT search page {} ({:?})", query.page, query.keyword_text());

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to search The New York Times: {}", e)))?;

        let mut body = read_json(response, NYT_NAME, "/fault/faultstring").await?;
        let docs = take_results(&mut body, "/response/docs", "No results found")?;

        Ok(map_items(NYT_NAME, docs, Self::parse_article))
    }
}

// ===== Article Search API Types =====

#[derive(Debug, Deserialize)]
struct NytDoc {
    #[serde(rename = "_id")]
    id: String,
    headline: Option<NytHeadline>,
    r#abstract: Option<String>,
    lead_paragraph: Option<String>,
    byline: Option<NytByline>,
    news_desk: Option<String>,
    pub_date: Option<String>,
    web_url: Option<String>,
    multimedia: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct NytHeadline {
    main: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NytByline {
    original: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use serde_json::json;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_params_zero_based_page_and_week_window() {
        let params =
            NyTimesSource::search_params("key", &Query::default().page(2), date(2024, 5, 20)).unwrap();

        assert_eq!(param(&params, "page"), Some("1"));
        assert_eq!(param(&params, "q"), Some("*"));
        assert_eq!(param(&params, "begin_date"), Some("20240513"));
        assert_eq!(param(&params, "end_date"), Some("20240520"));
        assert_eq!(param(&params, "fq"), Some(r#"source:("The New York Times")"#));
    }

    #[test]
    fn test_params_category_filter() {
        let query = Query::new("oscars").category(Category::Entertainment);
        let params = NyTimesSource::search_params("key", &query, date(2024, 5, 20)).unwrap();

        assert_eq!(param(&params, "q"), Some("oscars"));
        assert_eq!(
            param(&params, "fq"),
            Some(r#"source:("The New York Times") AND news_desk:("Arts")"#)
        );
    }

    #[test]
    fn test_params_page_out_of_range() {
        let query = Query::default().page(MAX_PAGE_INDEX + 2);
        assert!(NyTimesSource::search_params("key", &query, date(2024, 5, 20)).is_err());
    }

    #[test]
    fn test_clean_byline() {
        assert_eq!(clean_byline("By Jane Doe and John Roe"), "Jane Doe and John Roe");
        assert_eq!(clean_byline("Jane Doe"), "Jane Doe");
    }

    #[test]
    fn test_parse_article_relative_image() {
        let doc: NytDoc = serde_json::from_value(json!({
            "_id": "nyt://article/1",
            "headline": { "main": "Fed Holds Rates" },
            "abstract": "The central bank paused.",
            "lead_paragraph": "WASHINGTON - ...",
            "byline": { "original": "By Jeanna Smialek" },
            "news_desk": "Business",
            "pub_date": "2024-01-31T19:00:05+0000",
            "web_url": "https://www.nytimes.com/2024/01/31/business/fed.html",
            "multimedia": [{ "url": "images/2024/01/31/fed.jpg" }]
        }))
        .unwrap();

        let article = NyTimesSource::parse_article(doc).unwrap();
        assert_eq!(article.author, "Jeanna Smialek");
        assert_eq!(article.category, "Business");
        assert_eq!(
            article.image_url.as_deref(),
            Some("https://www.nytimes.com/images/2024/01/31/fed.jpg")
        );
        assert!(article.published_instant().is_some());
    }

    #[test]
    fn test_parse_article_object_multimedia() {
        let doc: NytDoc = serde_json::from_value(json!({
            "_id": "nyt://article/2",
            "headline": { "main": "Storm Nears Coast" },
            "pub_date": "2024-02-01T10:00:00Z",
            "web_url": "https://www.nytimes.com/2024/02/01/us/storm.html",
            "multimedia": { "default": { "url": "https://static01.nyt.com/storm.jpg" } }
        }))
        .unwrap();

        let article = NyTimesSource::parse_article(doc).unwrap();
        assert_eq!(article.author, "Unknown");
        assert_eq!(article.image_url.as_deref(), Some("https://static01.nyt.com/storm.jpg"));
    }
}
