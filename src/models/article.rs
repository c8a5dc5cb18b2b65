//! Article model representing a news article from any provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::{calendar_date, extract_tags, parse_published_at};

/// Image shown on a card when the article carries no image of its own.
pub const IMAGE_PLACEHOLDER: &str = "/images/article-placeholder.png";

/// A news article in the canonical, provider-independent shape.
///
/// `id`, `title`, `source`, `url` and `published_at` are always non-empty;
/// every other text field may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Provider-local identifier (not unique across providers)
    pub id: String,

    /// Headline
    pub title: String,

    /// Short description / trail text
    pub description: String,

    /// Full content, best effort
    pub content: String,

    /// Author display name, falls back to a provider default
    pub author: String,

    /// Human-readable outlet label
    pub source: String,

    /// Provider-native category label
    pub category: String,

    /// Publication timestamp as reported by the provider
    pub published_at: String,

    /// Canonical article URL
    pub url: String,

    /// Lead image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Article {
    /// Parse the publication timestamp into an absolute instant.
    pub fn published_instant(&self) -> Option<DateTime<Utc>> {
        parse_published_at(&self.published_at)
    }

    /// Whether the required fields are all populated.
    pub fn is_complete(&self) -> bool {
        [
            &self.id,
            &self.title,
            &self.source,
            &self.url,
            &self.published_at,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    /// Display tags derived from title, description and category.
    pub fn tags(&self) -> Vec<String> {
        let category = (!self.category.is_empty()).then_some(self.category.as_str());
        extract_tags(&self.title, &self.description, category)
    }
}

/// Builder for constructing [`Article`] values.
///
/// Adapters start from the required fields and fill in the optional ones.
#[derive(Debug, Clone)]
pub struct ArticleBuilder {
    article: Article,
}

impl ArticleBuilder {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
        published_at: impl Into<String>,
    ) -> Self {
        Self {
            article: Article {
                id: id.into(),
                title: title.into(),
                description: String::new(),
                content: String::new(),
                author: String::new(),
                source: source.into(),
                category: String::new(),
                published_at: published_at.into(),
                url: url.into(),
                image_url: None,
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.article.description = description.into();
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.article.content = content.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.article.author = author.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.article.category = category.into();
        self
    }

    /// Set the image URL; empty strings are treated as absent
    pub fn image_url(mut self, image_url: Option<String>) -> Self {
        self.article.image_url = image_url.filter(|u| !u.trim().is_empty());
        self
    }

    /// Build the article, or `None` when a required field is empty.
    pub fn build(self) -> Option<Article> {
        self.article.is_complete().then_some(self.article)
    }
}

/// Renderable projection of an [`Article`] for a news card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub image: String,
    pub title: String,
    pub author: String,
    pub author_initial: String,
    /// `YYYY-MM-DD` only, no time of day
    pub date: String,
    pub description: String,
    pub tags: Vec<String>,
    pub source: String,
    pub url: String,
}

impl From<&Article> for Card {
    fn from(article: &Article) -> Self {
        let author_initial = article
            .author
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_else(|| "?".to_string());

        Self {
            image: article
                .image_url
                .clone()
                .unwrap_or_else(|| IMAGE_PLACEHOLDER.to_string()),
            title: article.title.clone(),
            author: article.author.clone(),
            author_initial,
            date: calendar_date(&article.published_at),
            description: article.description.clone(),
            tags: article.tags(),
            source: article.source.clone(),
            url: article.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArticleBuilder {
        ArticleBuilder::new(
            "world/2024/jan/01/story",
            "Stocks Rally After Fed Decision",
            "https://example.com/story",
            "The Guardian",
            "2024-01-01T10:30:00Z",
        )
    }

    #[test]
    fn test_builder_requires_core_fields() {
        assert!(sample().build().is_some());

        let missing_url = ArticleBuilder::new("id", "Title", "", "Source", "2024-01-01");
        assert!(missing_url.build().is_none());

        let blank_title = ArticleBuilder::new("id", "   ", "https://x", "Source", "2024-01-01");
        assert!(blank_title.build().is_none());
    }

    #[test]
    fn test_builder_drops_empty_image() {
        let article = sample().image_url(Some(String::new())).build().unwrap();
        assert_eq!(article.image_url, None);
    }

    #[test]
    fn test_card_projection() {
        let article = sample()
            .author("jane doe")
            .category("Business")
            .description("Markets surged today as investors reacted.")
            .build()
            .unwrap();

        let card = Card::from(&article);
        assert_eq!(card.image, IMAGE_PLACEHOLDER);
        assert_eq!(card.author_initial, "J");
        assert_eq!(card.date, "2024-01-01");
        assert_eq!(card.tags.first().map(String::as_str), Some("Business"));
        assert_eq!(card.source, "The Guardian");
    }

    #[test]
    fn test_card_without_author() {
        let article = sample().build().unwrap();
        assert_eq!(Card::from(&article).author_initial, "?");
    }

    #[test]
    fn test_serializes_camel_case() {
        let article = sample().build().unwrap();
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["publishedAt"], "2024-01-01T10:30:00Z");
        assert!(json.get("imageUrl").is_none());
    }
}
