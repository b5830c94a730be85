//! The CSV article table.
//!
//! The table is the handoff artifact between pipeline stages: the scraper
//! writes it, the classifier re-reads it and rewrites it with a `Sentiment`
//! column prepended, and the aggregator reads whichever form is present.
//!
//! # Layouts
//!
//! ```text
//! Title, Short Description, Source, Published Date, Affected Tickers, Link
//! Sentiment, Title, Short Description, Source, Published Date, Affected Tickers, Link
//! ```
//!
//! UTF-8, header row always present. Writers truncate the file — each scrape
//! run fully replaces the previous one. The `Sentiment`-first ordering is a
//! presentation contract, not a semantic one; the reader detects it from the
//! header.

use std::path::Path;
use tracing::{info, instrument};

use crate::errors::{Error, Result};
use crate::models::{ArticleRecord, NA};

/// Column headers of the unclassified table, in order.
pub const ARTICLE_HEADER: [&str; 6] = [
    "Title",
    "Short Description",
    "Source",
    "Published Date",
    "Affected Tickers",
    "Link",
];

/// Write a freshly scraped (unclassified) article table, replacing any prior
/// content at `path`.
#[instrument(level = "info", skip(articles), fields(path = %path.display()))]
pub fn write_articles(path: &Path, articles: &[ArticleRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(ARTICLE_HEADER)?;
    for article in articles {
        writer.write_record(base_fields(article))?;
    }
    writer.flush()?;
    info!(count = articles.len(), "Wrote article table");
    Ok(())
}

/// Write a classified article table with `Sentiment` as the first column,
/// replacing any prior content at `path`.
#[instrument(level = "info", skip(articles), fields(path = %path.display()))]
pub fn write_classified(path: &Path, articles: &[ArticleRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut header = vec!["Sentiment"];
    header.extend(ARTICLE_HEADER);
    writer.write_record(&header)?;

    for article in articles {
        let sentiment = article
            .sentiment
            .map(|label| label.to_string())
            .unwrap_or_else(|| NA.to_string());
        let mut record = vec![sentiment];
        record.extend(base_fields(article).map(str::to_string));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    info!(count = articles.len(), "Wrote classified article table");
    Ok(())
}

/// Read the article table in either layout.
///
/// A nonexistent file is [`Error::MissingFile`] so downstream stages can
/// skip themselves or show an empty-state message instead of crashing.
#[instrument(level = "info", fields(path = %path.display()))]
pub fn read_articles(path: &Path) -> Result<Vec<ArticleRecord>> {
    if !path.exists() {
        return Err(Error::MissingFile(path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let has_sentiment = reader
        .headers()?
        .get(0)
        .is_some_and(|first| first == "Sentiment");
    let offset = usize::from(has_sentiment);

    let mut articles = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |i: usize| record.get(offset + i).unwrap_or(NA).to_string();
        let sentiment = if has_sentiment {
            record.get(0).and_then(|s| s.parse().ok())
        } else {
            None
        };
        articles.push(ArticleRecord {
            title: field(0),
            description: field(1),
            source: field(2),
            published_date: field(3),
            affected_tickers: field(4),
            link: field(5),
            sentiment,
        });
    }

    info!(count = articles.len(), classified = has_sentiment, "Read article table");
    Ok(articles)
}

fn base_fields(article: &ArticleRecord) -> [&str; 6] {
    [
        &article.title,
        &article.description,
        &article.source,
        &article.published_date,
        &article.affected_tickers,
        &article.link,
    ]
}
