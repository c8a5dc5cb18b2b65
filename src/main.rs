use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use comfy_table::{presets, Cell, Table};
use news_aggregator::config::{default_config_path, load_config, Config, CONFIG_FILE_NAME};
use news_aggregator::engine::{Aggregator, PaginationController, Phase, SessionSnapshot};
use news_aggregator::models::{Card, Category, Query};
use news_aggregator::sources::{taxonomy, SourceRegistry};
use news_aggregator::ui::{self, Spinner, Status};
use news_aggregator::utils::{card_plain, card_table, extract_tags};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// News Aggregator - Search news from several providers as one feed
#[derive(Parser, Debug)]
#[command(name = "news-aggregator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search, merge and page through news from multiple providers", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log line format (default: from config, else text)
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

/// Log line format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search all selected providers and page through the merged results
    #[command(alias = "s")]
    Search {
        /// Free-text keyword
        keyword: Option<String>,

        /// Earliest publication date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest publication date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Category filter (world, politics, business, technology, science,
        /// health, sports, entertainment)
        #[arg(long, short)]
        category: Option<Category>,

        /// Provider name filter, matched as a case-insensitive substring
        /// (repeatable, or comma-separated)
        #[arg(long, short)]
        source: Vec<String>,

        /// Articles requested per provider per page
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page_size: Option<u32>,

        /// Number of pages to load
        #[arg(long, short, default_value_t = 1)]
        pages: u32,
    },

    /// List registered providers
    #[command(alias = "ls")]
    Sources,

    /// Show how each category maps onto provider vocabularies
    Categories,

    /// Extract display tags from a headline
    Tags {
        /// Article title
        title: String,

        /// Article description
        #[arg(long, short, default_value = "")]
        description: String,

        /// Category label, used as the first tag
        #[arg(long, short)]
        category: Option<String>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Destination (default: the user config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },

    /// Print the effective configuration with keys masked
    Show,
}

fn init_logging(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.logging.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    let json = match cli.log_format {
        Some(format) => format == LogFormat::Json,
        None => config.logging.format.eq_ignore_ascii_case("json"),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("news_aggregator={}", level)),
        ))
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&cli, &config);

    match cli.command {
        Some(Commands::Search {
            ref keyword,
            from,
            to,
            category,
            ref source,
            page_size,
            pages,
        }) => {
            let mut query = Query::new(keyword.clone().unwrap_or_default());
            query.date_range.start = from;
            query.date_range.end = to;
            query.category = category.or(config.preferences.category);
            query.sources = if source.is_empty() {
                config.preferences.sources.clone()
            } else {
                source.clone()
            };
            query.page_size = page_size;

            run_search(&cli, &config, query, pages.max(1)).await?;
        }

        Some(Commands::Sources) => {
            let registry = SourceRegistry::from_config(&config)?;
            let mut table = Table::new();
            table.load_preset(presets::UTF8_FULL);
            table.set_header(vec!["", "ID", "Name", "Categories", "Configured"]);

            for source in registry.all() {
                let mapped = source
                    .taxonomy()
                    .map(|t| Category::ALL.iter().filter(|c| t.token(**c).is_some()).count())
                    .unwrap_or(0);
                table.add_row(vec![
                    Cell::new(ui::source_icon(source.name())),
                    Cell::new(source.id()),
                    Cell::new(source.name()),
                    Cell::new(mapped),
                    Cell::new(if source.is_configured() { "yes" } else { "no (missing API key)" }),
                ]);
            }
            println!("{table}");
        }

        Some(Commands::Categories) => {
            let mut table = Table::new();
            table.load_preset(presets::UTF8_FULL);
            table.set_header(vec![
                "Category",
                taxonomy::GUARDIAN.provider(),
                taxonomy::NYTIMES.provider(),
                taxonomy::NEWS_API.provider(),
            ]);

            for category in Category::ALL {
                table.add_row(vec![
                    category.name(),
                    taxonomy::GUARDIAN.token(category).unwrap_or("-"),
                    taxonomy::NYTIMES.token(category).unwrap_or("-"),
                    taxonomy::NEWS_API.token(category).unwrap_or("-"),
                ]);
            }
            println!("{table}");
        }

        Some(Commands::Tags {
            ref title,
            ref description,
            ref category,
        }) => {
            for tag in extract_tags(title, description, category.as_deref()) {
                println!("{}", tag);
            }
        }

        Some(Commands::Config { ref command }) => match command {
            ConfigCommands::Init { path, force } => {
                let path = path
                    .clone()
                    .or_else(default_config_path)
                    .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

                if path.exists() && !force {
                    anyhow::bail!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    );
                }

                Config::default().save(&path)?;
                if !cli.quiet {
                    ui::print_status(
                        Status::Success,
                        &format!("Wrote {}", path.display()),
                    );
                }
            }
            ConfigCommands::Show => {
                print!("{}", masked(&config).to_toml()?);
            }
        },

        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "news-aggregator",
                &mut std::io::stdout(),
            );
        }

        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Submit the query, then keep loading pages until `pages` were committed
/// or the session stops offering more.
async fn run_search(cli: &Cli, config: &Config, query: Query, pages: u32) -> Result<()> {
    let registry = SourceRegistry::from_config(config)?;
    let aggregator = Aggregator::new(registry).with_default_page_size(config.search.default_page_size);
    let session = PaginationController::new(aggregator);

    let show_progress = !cli.quiet && std::io::stderr().is_terminal();
    let spinner = if show_progress {
        Spinner::new("Searching news sources")
    } else {
        Spinner::hidden()
    };

    let started = Instant::now();
    let label = query.keyword_text().unwrap_or("latest").to_string();
    let mut snapshot = session.submit(query).await;

    while snapshot.phase == Phase::Ready && snapshot.page < pages {
        spinner.set_message(&format!("Loading page {}", snapshot.page + 1));
        let before = snapshot.page;
        snapshot = session.on_scroll(true).await;
        if snapshot.page == before {
            // A failed page leaves the counter where it was; stop instead of retrying.
            break;
        }
    }
    spinner.finish();

    output_snapshot(cli, &label, &snapshot, started);

    if snapshot.articles.is_empty() {
        if let Some(error) = &snapshot.error {
            anyhow::bail!("{}", error);
        }
    }

    Ok(())
}

fn output_snapshot(cli: &Cli, label: &str, snapshot: &SessionSnapshot, started: Instant) {
    let format = if cli.output == OutputFormat::Auto {
        if ui::is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        cli.output
    };

    let cards: Vec<Card> = snapshot.cards();

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!("Failed to serialize results: {}", e),
        },
        OutputFormat::Plain => {
            for card in &cards {
                println!("{}", card_plain(card));
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            if !cli.quiet {
                ui::print_search_header(label, cards.len(), started.elapsed());
            }
            if !cards.is_empty() {
                println!("{}", card_table(&cards));
            }
        }
    }

    if !cli.quiet {
        ui::print_session_footer(snapshot);
    }
}

/// Copy of the configuration with API keys replaced by a placeholder
fn masked(config: &Config) -> Config {
    let mask = |key: Option<String>| key.map(|_| "********".to_string());
    let mut shown = config.clone();
    shown.api_keys.guardian = mask(config.api_keys.guardian());
    shown.api_keys.nytimes = mask(config.api_keys.nytimes());
    shown.api_keys.news_api = mask(config.api_keys.news_api());
    shown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["news-aggregator"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert_eq!(cli.log_format, None);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["news-aggregator", "-vv"]);
        assert_eq!(cli.verbose, 2);

        let cli = Cli::parse_from(["news-aggregator", "--verbose"]);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_cli_output_format() {
        let cli = Cli::parse_from(["news-aggregator", "-o", "json"]);
        assert_eq!(cli.output, OutputFormat::Json);

        let cli = Cli::parse_from(["news-aggregator", "--output", "plain"]);
        assert_eq!(cli.output, OutputFormat::Plain);
    }

    #[test]
    fn test_cli_search_command() {
        let cli = Cli::parse_from([
            "news-aggregator",
            "search",
            "climate",
            "--from",
            "2024-01-01",
            "--category",
            "science",
            "--source",
            "guardian",
            "-s",
            "times",
            "--pages",
            "3",
        ]);
        match &cli.command {
            Some(Commands::Search {
                keyword,
                from,
                category,
                source,
                pages,
                page_size,
                ..
            }) => {
                assert_eq!(keyword.as_deref(), Some("climate"));
                assert_eq!(*from, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(*category, Some(Category::Science));
                assert_eq!(source, &vec!["guardian".to_string(), "times".to_string()]);
                assert_eq!(*pages, 3);
                assert_eq!(*page_size, None);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_rejects_zero_page_size() {
        assert!(Cli::try_parse_from(["news-aggregator", "search", "--page-size", "0"]).is_err());
    }

    #[test]
    fn test_cli_search_without_keyword() {
        let cli = Cli::parse_from(["news-aggregator", "search"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Search { keyword: None, pages: 1, .. })
        ));
    }

    #[test]
    fn test_cli_rejects_unknown_category() {
        assert!(Cli::try_parse_from(["news-aggregator", "search", "-c", "gardening"]).is_err());
    }

    #[test]
    fn test_cli_config_init() {
        let cli = Cli::parse_from(["news-aggregator", "config", "init", "/tmp/x.toml", "--force"]);
        match &cli.command {
            Some(Commands::Config {
                command: ConfigCommands::Init { path, force },
            }) => {
                assert_eq!(path.as_deref(), Some(std::path::Path::new("/tmp/x.toml")));
                assert!(*force);
            }
            _ => panic!("Expected config init command"),
        }
    }

    #[test]
    fn test_masked_hides_keys() {
        let mut config = Config::default();
        config.api_keys.guardian = Some("secret".to_string());

        let shown = masked(&config);
        assert_eq!(shown.api_keys.guardian.as_deref(), Some("********"));
    }

    #[test]
    fn test_cli_command_is_valid() {
        Cli::command().debug_assert();
    }
}
