//! CLI UI utilities for terminal output.
//!
//! Colored status lines, provider icons and a loading spinner shown while a
//! session is fetching.

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::engine::{Phase, SessionSnapshot};

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Icons for the built-in providers.
pub fn source_icon(source: &str) -> &'static str {
    match source.to_lowercase().as_str() {
        "the guardian" | "guardian" => "🟦",
        "the new york times" | "nytimes" => "🗽",
        "news api" | "newsapi" => "📡",
        _ => "📰",
    }
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Pending,
    Loading,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Pending => "○",
        Status::Loading => "◐",
        Status::Search => "🔍",
    }
}

/// Status line for a message, colored by status.
pub fn status_line(status: Status, msg: &str) -> String {
    let icon = status_icon(status);
    match status {
        Status::Success => format!("{} {}", icon.green().bold(), msg),
        Status::Error => format!("{} {}", icon.red().bold(), msg),
        Status::Warning => format!("{} {}", icon.yellow().bold(), msg),
        Status::Info => format!("{} {}", icon.cyan().bold(), msg),
        Status::Pending => format!("{} {}", icon.white().dimmed(), msg),
        Status::Loading => format!("{} {}", icon.cyan(), msg),
        Status::Search => format!("{} {}", icon.yellow(), msg),
    }
}

/// Print a styled status message to stderr.
pub fn print_status(status: Status, msg: &str) {
    eprintln!("{}", status_line(status, msg));
}

/// Status for a session phase.
pub fn phase_status(phase: Phase) -> Status {
    match phase {
        Phase::Idle => Status::Pending,
        Phase::Loading | Phase::LoadingMore => Status::Loading,
        Phase::Ready => Status::Success,
        Phase::Exhausted => Status::Info,
    }
}

/// Short description of a session phase.
pub fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::Loading => "loading",
        Phase::Ready => "more available",
        Phase::LoadingMore => "loading more",
        Phase::Exhausted => "end of results",
    }
}

/// Print the errors and final state of a session.
///
/// A terminal error is printed as an error, an advisory one as a warning.
pub fn print_session_footer(snapshot: &SessionSnapshot) {
    if let Some(error) = &snapshot.error {
        if snapshot.articles.is_empty() {
            print_status(Status::Error, error);
        } else {
            print_status(Status::Warning, &format!("Some sources failed: {}", error));
        }
    }

    print_status(
        phase_status(snapshot.phase),
        &format!(
            "{} articles across {} page(s), {}",
            snapshot.articles.len(),
            snapshot.page,
            phase_label(snapshot.phase)
        ),
    );
}

/// Print search results header.
pub fn print_search_header(query: &str, count: usize, duration: Duration) {
    println!();
    println!(
        "{} News for: \"{}\"",
        status_icon(Status::Search).yellow().bold(),
        query.cyan().bold()
    );
    println!(
        "{} Found {} articles in {:.2}s",
        "─".repeat(30).dimmed(),
        count.to_string().green().bold(),
        duration.as_secs_f64()
    );
    println!();
}

/// Loading spinner, drawn on stderr.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// A spinner that draws nothing.
    pub fn hidden() -> Self {
        Self {
            pb: indicatif::ProgressBar::hidden(),
        }
    }

    /// Set the message.
    pub fn set_message(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }

    /// Remove the spinner from the terminal.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_icon() {
        assert_eq!(source_icon("The Guardian"), "🟦");
        assert_eq!(source_icon("News API"), "📡");
        assert_eq!(source_icon("Reuters"), "📰");
    }

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Error), "✗");
        assert_eq!(status_icon(Status::Search), "🔍");
    }

    #[test]
    fn test_phase_mapping() {
        assert_eq!(phase_status(Phase::Exhausted), Status::Info);
        assert_eq!(phase_status(Phase::LoadingMore), Status::Loading);
        assert_eq!(phase_label(Phase::Exhausted), "end of results");
    }

    #[test]
    fn test_status_line_contains_message() {
        assert!(status_line(Status::Warning, "partial").contains("partial"));
    }
}
