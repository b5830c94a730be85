//! # Stock News Sentiment
//!
//! A scraping and sentiment pipeline for stock-market news: fetch a
//! dynamically rendered Yahoo Finance news listing through a headless
//! browser, extract article records, score them with a lexicon-based
//! sentiment analyzer, and aggregate the labels into a combined signal that
//! can be persisted per ticker alongside price history.
//!
//! ## Pipeline
//!
//! 1. **Scrape**: render the listing (scroll-triggered lazy loading, consent
//!    dismissal) and overwrite the CSV article table
//! 2. **Classify**: annotate every row with Bullish / Neutral / Bearish
//! 3. **Summarize**: tally labels, compute the combined score, optionally
//!    persist the summary to the SQLite sentiment store
//! 4. **History**: average the persisted combined scores per ticker
//!
//! Each stage is an independent blocking invocation; a failed ticker never
//! affects the stores or tables of another.
//!
//! ## Usage
//!
//! ```sh
//! stock_news_sentiment scrape MSFT
//! stock_news_sentiment classify
//! stock_news_sentiment summarize --save --ticker MSFT
//! stock_news_sentiment history
//! ```

use chrono::Local;
use clap::Parser;
use std::error::Error as StdError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod datastore;
mod errors;
mod models;
mod outputs;
mod prices;
mod scrape;
mod sentiment;
mod utils;

use cli::{Cli, Command, PricesAction, StoreAction};
use datastore::Datastore;
use errors::{Error, Result};
use outputs::table;
use scrape::renderer::{RendererConfig, WebDriverRenderer};
use sentiment::{SentimentClassifier, aggregate};
use utils::{log_error, normalize_ticker};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn StdError>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    let error_log = args.error_log.clone();

    let outcome = run(args).await;
    let elapsed = start_time.elapsed();

    match outcome {
        Ok(()) => {
            info!(?elapsed, "Execution complete");
            Ok(())
        }
        // Empty results and missing upstream artifacts are user-visible
        // warnings with a clean exit, not failures.
        Err(e @ (Error::EmptyResult(_) | Error::MissingFile(_))) => {
            warn!(error = %e, "Nothing to do");
            eprintln!("warning: {e}");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, ?elapsed, "Run failed");
            log_error(&error_log, &e.to_string());
            Err(e.into())
        }
    }
}

async fn run(args: Cli) -> Result<()> {
    let Cli {
        database, command, ..
    } = args;

    match command {
        Command::Scrape {
            ticker,
            webdriver_url,
            settle_secs,
            scroll_passes,
            scroll_wait_secs,
            file,
        } => {
            let renderer = WebDriverRenderer::new(RendererConfig {
                webdriver_url,
                settle: Duration::from_secs(settle_secs),
                scroll_passes,
                scroll_wait: Duration::from_secs(scroll_wait_secs),
            });

            match ticker {
                Some(raw) => {
                    let ticker = normalize_ticker(&raw);
                    let out = file.unwrap_or_else(|| PathBuf::from("news_articles_by_ticker.csv"));
                    let count = scrape::scrape_ticker(&renderer, &ticker, &out).await?;
                    println!("Scraped {count} articles for {ticker} into {}", out.display());
                }
                None => {
                    let out = file.unwrap_or_else(|| PathBuf::from("news_articles.csv"));
                    let count = scrape::scrape_general(&renderer, &out).await?;
                    println!(
                        "Scraped {count} general market articles into {}",
                        out.display()
                    );
                }
            }
        }

        Command::Classify { file } => {
            let classifier = SentimentClassifier::new();
            let count = sentiment::classify_table(&classifier, &file)?;
            println!("Classified {count} articles in {}", file.display());
        }

        Command::Summarize { file, save, ticker } => {
            let articles = table::read_articles(&file)?;
            if articles.is_empty() {
                return Err(Error::EmptyResult(format!(
                    "article table {} has no rows",
                    file.display()
                )));
            }

            let rows = aggregate::summarize(&articles);
            for row in &rows {
                println!("{:<15} {}", row.category.to_string(), row.count);
            }

            if save {
                // clap enforces that --save comes with --ticker.
                let ticker = normalize_ticker(ticker.as_deref().unwrap_or_default());
                let store = Datastore::open(&database)?;
                let date = Local::now().date_naive().to_string();
                store.save_sentiment_rows(&ticker, &rows, &date)?;
                println!("Saved summary for {ticker} ({date})");
            }
        }

        Command::History => {
            let store = Datastore::open(&database)?;
            let means = store.historical_combined_means()?;
            if means.is_empty() {
                return Err(Error::EmptyResult(
                    "no saved sentiment batches in the store".to_string(),
                ));
            }
            println!("Mean Combined Score per ticker (across all saved batches):");
            for (ticker, mean) in means {
                println!("{ticker:<10} {mean:.2}");
            }
        }

        Command::Prices { action } => {
            let store = Datastore::open(&database)?;
            match action {
                PricesAction::Import { file, ticker } => {
                    let ticker = normalize_ticker(&ticker);
                    let bars = prices::read_bars_csv(&file, &ticker)?;
                    let inserted = store.save_bars(&bars)?;
                    println!(
                        "Imported {inserted} new bars for {ticker} ({} duplicates skipped)",
                        bars.len() - inserted
                    );
                }
                PricesAction::Show => {
                    let bars = store.load_bars()?;
                    if bars.is_empty() {
                        return Err(Error::EmptyResult("no stored price bars".to_string()));
                    }
                    for bar in bars {
                        println!(
                            "{:<10} {} o={:.2} h={:.2} l={:.2} c={:.2} v={}",
                            bar.ticker, bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
                        );
                    }
                }
                PricesAction::Delete { ticker } => {
                    let ticker = normalize_ticker(&ticker);
                    let removed = store.delete_bars(&ticker)?;
                    println!("Deleted {removed} bars for {ticker}");
                }
                PricesAction::Clear => {
                    let removed = store.truncate_bars()?;
                    println!("Deleted all {removed} stored bars");
                }
            }
        }

        Command::Store { action } => {
            let store = Datastore::open(&database)?;
            match action {
                StoreAction::Show => {
                    let records = store.load_sentiment_rows()?;
                    if records.is_empty() {
                        return Err(Error::EmptyResult("no stored sentiment rows".to_string()));
                    }
                    for record in records {
                        println!(
                            "{:<10} {:<15} {:>5}  {}",
                            record.ticker, record.category, record.score, record.date
                        );
                    }
                }
                StoreAction::CleanSentiment => {
                    let removed = store.clean_sentiment_rows()?;
                    println!("Removed {removed} rows with missing ticker tags");
                }
                StoreAction::ClearSentiment => {
                    let removed = store.delete_sentiment_rows()?;
                    println!("Deleted all {removed} sentiment rows");
                }
            }
        }
    }

    Ok(())
}
