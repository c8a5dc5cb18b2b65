//! Deduplication of articles across providers and pages.
//!
//! Identity is the exact `(title, url)` pair. There is no fuzzy matching:
//! the same story published under different headlines stays separate.

use std::collections::HashSet;

use crate::models::Article;

/// Identity key of an article
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArticleKey {
    title: String,
    url: String,
}

impl ArticleKey {
    pub fn of(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            url: article.url.clone(),
        }
    }
}

/// Set of article keys already seen
#[derive(Debug, Clone, Default)]
pub struct DedupIndex {
    keys: HashSet<ArticleKey>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every article in `articles`
    pub fn from_articles<'a>(articles: impl IntoIterator<Item = &'a Article>) -> Self {
        Self {
            keys: articles.into_iter().map(ArticleKey::of).collect(),
        }
    }

    /// Record an article; returns `false` when its key was already present
    pub fn insert(&mut self, article: &Article) -> bool {
        self.keys.insert(ArticleKey::of(article))
    }

    pub fn contains(&self, article: &Article) -> bool {
        self.keys.contains(&ArticleKey::of(article))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Drop articles whose key is already in `index` or appeared earlier in
/// `articles`. First occurrence wins; survivors keep their order and are
/// added to `index`.
pub fn retain_unseen(articles: Vec<Article>, index: &mut DedupIndex) -> Vec<Article> {
    articles
        .into_iter()
        .filter(|article| index.insert(article))
        .collect()
}

/// Remove duplicate articles from a list, keeping the first occurrence.
pub fn deduplicate_articles(articles: Vec<Article>) -> Vec<Article> {
    retain_unseen(articles, &mut DedupIndex::new())
}
