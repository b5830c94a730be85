//! Data models for scraped articles, sentiment labels, and stored prices.
//!
//! This module defines the core data structures used throughout the
//! application:
//! - [`ArticleRecord`]: one scraped news item, optionally annotated with a
//!   sentiment label
//! - [`SentimentLabel`]: the discrete Bullish / Neutral / Bearish outcome
//! - [`SentimentSummaryRow`]: one aggregated row per label plus the combined
//!   score
//! - [`StockBar`]: an OHLCV price record keyed by (ticker, date)
//!
//! Fields that could not be parsed out of the page carry the [`NA`] sentinel
//! rather than an error — a malformed article node must never abort a batch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// Sentinel value for any article field that could not be extracted.
pub const NA: &str = "N/A";

/// One scraped news item.
///
/// Produced by the extractor in document order; the `sentiment` field stays
/// `None` until the classifier annotates the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Headline text, or `"N/A"` if unparseable.
    pub title: String,
    /// Short description with wire-service boilerplate stripped.
    pub description: String,
    /// Publisher name.
    pub source: String,
    /// Free-form publication date as displayed on the page (not normalized).
    pub published_date: String,
    /// Comma-joined ticker symbols the article is tagged with, or `"N/A"`.
    pub affected_tickers: String,
    /// Article URL, or `"N/A"`.
    pub link: String,
    /// Assigned by the classifier; absent until classification runs.
    pub sentiment: Option<SentimentLabel>,
}

impl Default for ArticleRecord {
    fn default() -> Self {
        Self {
            title: NA.to_string(),
            description: NA.to_string(),
            source: NA.to_string(),
            published_date: NA.to_string(),
            affected_tickers: NA.to_string(),
            link: NA.to_string(),
            sentiment: None,
        }
    }
}

/// Discrete sentiment outcome for one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Bullish,
    Neutral,
    Bearish,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentLabel::Bullish => "Bullish",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Bearish => "Bearish",
        };
        f.write_str(s)
    }
}

impl FromStr for SentimentLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bullish" => Ok(SentimentLabel::Bullish),
            "Neutral" => Ok(SentimentLabel::Neutral),
            "Bearish" => Ok(SentimentLabel::Bearish),
            other => Err(Error::Data(format!("unknown sentiment label: {other}"))),
        }
    }
}

/// Category of one aggregated summary row.
///
/// The string forms match what the sentiment store persists, so the
/// historical aggregation can filter on `"Combined Score"` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryCategory {
    Bullish,
    Neutral,
    Bearish,
    CombinedScore,
}

impl fmt::Display for SummaryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SummaryCategory::Bullish => "Bullish",
            SummaryCategory::Neutral => "Neutral",
            SummaryCategory::Bearish => "Bearish",
            SummaryCategory::CombinedScore => "Combined Score",
        };
        f.write_str(s)
    }
}

/// One aggregated sentiment row: a per-label article count, or the weighted
/// combined score (Bullish×1 + Neutral×0 + Bearish×−1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentSummaryRow {
    pub category: SummaryCategory,
    pub count: i64,
}

/// One OHLCV price record. Uniqueness on (ticker, date) is enforced by the
/// datastore, which silently skips duplicates on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct StockBar {
    pub ticker: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}
