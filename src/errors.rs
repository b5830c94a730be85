//! Error taxonomy for the scraping and sentiment pipeline.
//!
//! Failures at the field or article granularity never become values of
//! [`Error`]: extraction absorbs them locally by falling back to the `"N/A"`
//! sentinel so one bad article cannot abort a batch. This enum covers the
//! coarser failures — browser/navigation, missing artifacts, empty result
//! sets, and the usual IO/CSV/database carriers.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The browser session could not be established or navigation failed.
    /// Not retried; aborts that single ticker's scrape.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// No data was available for the requested parameters (no articles
    /// found, no stored rows). Surfaced as a warning, not a crash.
    #[error("no data available: {0}")]
    EmptyResult(String),

    /// A downstream stage was invoked before its upstream artifact exists.
    #[error("missing file: {0}")]
    MissingFile(String),

    /// Data was in an unexpected shape or a required field failed to parse.
    #[error("unexpected data: {0}")]
    Data(String),

    /// An error occurred during an HTTP request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An error occurred while reading or writing the article table.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An error surfaced by the SQLite datastore.
    #[error("datastore error: {0}")]
    Datastore(#[from] rusqlite::Error),

    /// A plain filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let e = Error::Fetch("session not created".to_string());
        assert_eq!(e.to_string(), "fetch failed: session not created");
    }

    #[test]
    fn test_missing_file_display() {
        let e = Error::MissingFile("news_articles.csv".to_string());
        assert!(e.to_string().contains("news_articles.csv"));
    }
}
