//! Terminal display utilities for card output.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use unicode_width::UnicodeWidthChar;

use crate::models::Card;

/// Column width for titles in table output
pub const TITLE_WIDTH: usize = 60;

/// Column width for author names in table output
pub const AUTHOR_WIDTH: usize = 24;

/// Truncate text to fit within the specified width using unicode-aware truncation.
///
/// Returns a string that fits within `max_width` columns, appending an
/// ellipsis if truncation occurred.
///
/// # Examples
///
/// ```
/// use news_aggregator::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    let char_widths: Vec<(char, usize)> = text
        .chars()
        .map(|c| (c, UnicodeWidthChar::width(c).unwrap_or(1)))
        .collect();

    let total_width: usize = char_widths.iter().map(|(_, w)| *w).sum();
    if total_width <= max_width {
        return text.to_string();
    }

    let mut current_width = 0;
    let mut end_idx = 0;
    for (i, (_, w)) in char_widths.iter().enumerate() {
        if current_width + w > max_width.saturating_sub(3) {
            break;
        }
        current_width += w;
        end_idx = i + 1;
    }

    if end_idx == 0 {
        return "...".to_string();
    }

    let truncated: String = char_widths[..end_idx].iter().map(|(c, _)| *c).collect();
    format!("{}...", truncated)
}

/// Render cards as a table: date, source, title, author, tags.
pub fn card_table(cards: &[Card]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "Source", "Title", "Author", "Tags"]);

    for card in cards {
        table.add_row(vec![
            Cell::new(&card.date),
            Cell::new(&card.source),
            Cell::new(truncate_with_ellipsis(&card.title, TITLE_WIDTH)).add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(&card.author, AUTHOR_WIDTH)),
            Cell::new(card.tags.join(", ")),
        ]);
    }

    table
}

/// Render one card as plain text lines.
pub fn card_plain(card: &Card) -> String {
    let mut out = format!(
        "[{}] {} - {} ({})\n  {}\n",
        card.author_initial, card.title, card.author, card.date, card.url
    );
    if !card.description.is_empty() {
        out.push_str(&format!("  {}\n", truncate_with_ellipsis(&card.description, 120)));
    }
    if !card.tags.is_empty() {
        out.push_str(&format!("  Tags: {} | {}\n", card.tags.join(", "), card.source));
    }
    out
}
