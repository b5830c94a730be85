//! Command-line interface definitions.
//!
//! Subcommands map one-to-one onto the pipeline stages: `scrape` produces
//! the article table, `classify` annotates it, `summarize` aggregates it
//! (optionally persisting the summary), `history` reads the persisted store
//! back, and `prices` / `store` manage the two database tables.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scrape Yahoo Finance news, score it for sentiment, and persist the
/// results alongside price history.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the SQLite database
    #[arg(long, env = "STOCK_DB_PATH", default_value = "stock_database.db")]
    pub database: PathBuf,

    /// Path to the persistent error log
    #[arg(long, env = "ERROR_LOG_PATH", default_value = "error_log.txt")]
    pub error_log: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape the latest news for a ticker, or general market news when the
    /// ticker is omitted
    Scrape {
        /// Ticker symbol (upper-cased automatically)
        ticker: Option<String>,

        /// Chromedriver endpoint driving the headless browser
        #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
        webdriver_url: String,

        /// Seconds to let the page settle after navigation
        #[arg(long, default_value_t = 3)]
        settle_secs: u64,

        /// Number of scroll-to-bottom passes for lazy-loaded content
        #[arg(long, default_value_t = 5)]
        scroll_passes: u32,

        /// Seconds to wait after each scroll pass
        #[arg(long, default_value_t = 2)]
        scroll_wait_secs: u64,

        /// Override the output table path
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Annotate the article table with sentiment labels, in place
    Classify {
        /// Article table to classify
        #[arg(long, default_value = "news_articles_by_ticker.csv")]
        file: PathBuf,
    },

    /// Tally label counts and the combined score for the current table
    Summarize {
        /// Classified article table to aggregate
        #[arg(long, default_value = "news_articles_by_ticker.csv")]
        file: PathBuf,

        /// Persist the four summary rows to the sentiment store
        #[arg(long, requires = "ticker")]
        save: bool,

        /// Ticker tag recorded with the saved rows
        #[arg(long)]
        ticker: Option<String>,
    },

    /// Mean Combined Score per ticker across all saved batches
    History,

    /// Price-history store operations
    Prices {
        #[command(subcommand)]
        action: PricesAction,
    },

    /// Sentiment store maintenance
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum PricesAction {
    /// Import OHLCV bars from a CSV export (duplicates are skipped)
    Import {
        /// CSV file with Date, Open, High, Low, Close, Volume columns
        file: PathBuf,

        /// Ticker the bars belong to
        #[arg(long)]
        ticker: String,
    },

    /// Print all stored bars
    Show,

    /// Delete stored bars for one ticker
    Delete { ticker: String },

    /// Delete every stored bar
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum StoreAction {
    /// Print all persisted sentiment rows
    Show,

    /// Remove sentiment rows saved without a ticker tag
    CleanSentiment,

    /// Delete every persisted sentiment row
    ClearSentiment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_with_ticker() {
        let cli = Cli::parse_from(["stock_news_sentiment", "scrape", "msft"]);
        match cli.command {
            Command::Scrape {
                ticker,
                scroll_passes,
                settle_secs,
                ..
            } => {
                assert_eq!(ticker.as_deref(), Some("msft"));
                assert_eq!(scroll_passes, 5);
                assert_eq!(settle_secs, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_scrape_without_ticker_is_general() {
        let cli = Cli::parse_from(["stock_news_sentiment", "scrape"]);
        match cli.command {
            Command::Scrape { ticker, .. } => assert!(ticker.is_none()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_summarize_save_requires_ticker() {
        let result = Cli::try_parse_from(["stock_news_sentiment", "summarize", "--save"]);
        assert!(result.is_err());

        let cli = Cli::parse_from([
            "stock_news_sentiment",
            "summarize",
            "--save",
            "--ticker",
            "MSFT",
        ]);
        match cli.command {
            Command::Summarize { save, ticker, .. } => {
                assert!(save);
                assert_eq!(ticker.as_deref(), Some("MSFT"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_database_default() {
        let cli = Cli::parse_from(["stock_news_sentiment", "history"]);
        assert_eq!(cli.database, PathBuf::from("stock_database.db"));
        assert_eq!(cli.error_log, PathBuf::from("error_log.txt"));
    }

    #[test]
    fn test_prices_import() {
        let cli = Cli::parse_from([
            "stock_news_sentiment",
            "prices",
            "import",
            "bars.csv",
            "--ticker",
            "AAPL",
        ]);
        match cli.command {
            Command::Prices {
                action: PricesAction::Import { file, ticker },
            } => {
                assert_eq!(file, PathBuf::from("bars.csv"));
                assert_eq!(ticker, "AAPL");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
