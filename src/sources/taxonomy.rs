//! Category taxonomy mapping.
//!
//! Translates the canonical [`Category`] vocabulary into each provider's own
//! tokens. A category without an entry for a provider has no token, and the
//! adapter omits the category filter instead of failing.

use crate::models::Category;

/// One provider's category vocabulary
#[derive(Debug)]
pub struct Taxonomy {
    provider: &'static str,
    entries: &'static [(Category, &'static str)],
}

impl Taxonomy {
    pub const fn new(provider: &'static str, entries: &'static [(Category, &'static str)]) -> Self {
        Self { provider, entries }
    }

    /// Provider display name this vocabulary belongs to
    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// Provider token for a canonical category
    pub fn token(&self, category: Category) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, token)| *token)
    }

    /// Provider token for an optional category
    pub fn map(&self, category: Option<Category>) -> Option<&'static str> {
        category.and_then(|c| self.token(c))
    }
}

/// The Guardian `section` values
pub static GUARDIAN: Taxonomy = Taxonomy::new(
    "The Guardian",
    &[
        (Category::World, "world"),
        (Category::Politics, "politics"),
        (Category::Business, "business"),
        (Category::Technology, "technology"),
        (Category::Science, "science"),
        (Category::Health, "healthcare"),
        (Category::Sports, "sport"),
        (Category::Entertainment, "culture"),
    ],
);

/// New York Times `news_desk` values
pub static NYTIMES: Taxonomy = Taxonomy::new(
    "The New York Times",
    &[
        (Category::World, "World"),
        (Category::Politics, "Politics"),
        (Category::Business, "Business"),
        (Category::Technology, "Technology"),
        (Category::Science, "Science"),
        (Category::Health, "Health"),
        (Category::Sports, "Sports"),
        (Category::Entertainment, "Arts"),
    ],
);

/// News API `categoryUri` values
pub static NEWS_API: Taxonomy = Taxonomy::new(
    "News API",
    &[
        (Category::World, "news/World"),
        (Category::Politics, "news/Politics"),
        (Category::Business, "news/Business"),
        (Category::Technology, "news/Technology"),
        (Category::Science, "news/Science"),
        (Category::Health, "news/Health"),
        (Category::Sports, "news/Sports"),
        (Category::Entertainment, "news/Arts_Entertainment"),
    ],
);
