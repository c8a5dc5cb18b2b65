//! Lightweight display tags derived from article text.

use std::collections::HashSet;

/// Maximum number of tags produced for one article
pub const MAX_TAGS: usize = 3;

const MIN_WORD_LEN: usize = 3;
const MAX_WORD_LEN: usize = 15;

/// Words that never become tags: articles, conjunctions, prepositions,
/// pronouns and generic news vocabulary.
const STOP_WORDS: &[&str] = &[
    "the", "and", "but", "for", "nor", "yet", "with", "from", "into", "onto", "over", "under",
    "about", "after", "before", "during", "between", "through", "against", "amid", "than",
    "that", "this", "these", "those", "there", "their", "they", "them", "then", "what", "when",
    "where", "which", "while", "who", "whom", "whose", "why", "how", "are", "was", "were", "been",
    "being", "has", "have", "had", "having", "does", "did", "doing", "will", "would", "shall",
    "should", "can", "could", "may", "might", "must", "its", "his", "her", "hers", "him", "our",
    "ours", "your", "yours", "you", "she", "not", "all", "any", "some", "more", "most", "much",
    "very", "just", "also", "only", "such", "out", "off", "per", "via", "new", "news",
    "breaking", "update", "updates", "updated", "latest", "live", "today", "report", "reports",
    "says", "said", "say", "week", "year", "years", "day", "days",
];

/// Derive up to [`MAX_TAGS`] display tags for an article.
///
/// The category, when present, takes the first slot. Candidate words come
/// from the title then the description, lower-cased and stripped of
/// non-alphanumeric characters, kept when 3 to 15 characters long and not a
/// stop word. Duplicates are dropped keeping first-seen order and each tag is
/// returned in Title Case. Pure and deterministic.
pub fn extract_tags(title: &str, description: &str, category: Option<&str>) -> Vec<String> {
    let category = category.map(str::trim).filter(|c| !c.is_empty());

    let words = title
        .split_whitespace()
        .chain(description.split_whitespace())
        .map(normalize_word)
        .filter(|w| is_candidate(w));

    let mut seen = HashSet::new();
    category
        .map(str::to_string)
        .into_iter()
        .chain(words)
        .filter(|candidate| seen.insert(candidate.to_lowercase()))
        .take(MAX_TAGS)
        .map(|candidate| title_case(&candidate))
        .collect()
}

fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_candidate(word: &str) -> bool {
    let len = word.chars().count();
    (MIN_WORD_LEN..=MAX_WORD_LEN).contains(&len) && !STOP_WORDS.contains(&word)
}

/// Capitalize the first letter of every whitespace- or punctuation-delimited
/// sub-word and lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}
