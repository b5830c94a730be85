//! SQLite persistence for price history and sentiment save events.
//!
//! Two tables:
//!
//! - `stock_prices`: OHLCV bars keyed by (ticker, date) with a UNIQUE
//!   constraint; writes are `INSERT OR IGNORE`, so a duplicate bar is
//!   silently skipped, never updated.
//! - `sentiment_analysis`: append-only save events. Each explicit save of a
//!   batch summary appends four rows (Bullish, Neutral, Bearish, Combined
//!   Score) tagged with a ticker and the save date.
//!
//! The connection lifecycle is scoped to the [`Datastore`] value, which is
//! constructed from an explicit path and passed to whatever needs it — there
//! is no ambient global connection.

use rusqlite::{Connection, params};
use std::path::Path;
use tracing::{debug, info};

use crate::errors::Result;
use crate::models::{SentimentSummaryRow, StockBar};

/// One persisted sentiment save event, as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentRecord {
    pub ticker: String,
    /// `"Bullish"`, `"Neutral"`, `"Bearish"`, or `"Combined Score"`.
    pub category: String,
    pub score: i64,
    /// `YYYY-MM-DD` save date.
    pub date: String,
}

/// Handle to the SQLite database backing price history and sentiment scores.
pub struct Datastore {
    conn: Connection,
}

impl Datastore {
    /// Open (creating if necessary) the database at `path` and ensure the
    /// schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.init_schema()?;
        debug!(path = %path.display(), "Opened datastore");
        Ok(store)
    }

    /// Open an in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS stock_prices (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker TEXT NOT NULL,
                date TEXT NOT NULL,
                open REAL,
                high REAL,
                low REAL,
                close REAL,
                volume INTEGER,
                UNIQUE(ticker, date)
            )",
            [],
        )?;
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS sentiment_analysis (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker TEXT NOT NULL,
                sentiment TEXT NOT NULL,
                sentiment_score INTEGER,
                date TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    // --- Price history ---

    /// Insert bars, silently skipping any (ticker, date) pair that already
    /// exists. Returns how many rows were actually inserted.
    pub fn save_bars(&self, bars: &[StockBar]) -> Result<usize> {
        let mut inserted = 0;
        for bar in bars {
            inserted += self.conn.execute(
                "INSERT OR IGNORE INTO stock_prices
                    (ticker, date, open, high, low, close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    bar.ticker,
                    bar.date,
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume
                ],
            )?;
        }
        info!(total = bars.len(), inserted, "Saved price bars");
        Ok(inserted)
    }

    /// All stored bars in insertion order.
    pub fn load_bars(&self) -> Result<Vec<StockBar>> {
        let mut stmt = self.conn.prepare(
            "SELECT ticker, date, open, high, low, close, volume
             FROM stock_prices ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StockBar {
                ticker: row.get(0)?,
                date: row.get(1)?,
                open: row.get(2)?,
                high: row.get(3)?,
                low: row.get(4)?,
                close: row.get(5)?,
                volume: row.get(6)?,
            })
        })?;
        let mut bars = Vec::new();
        for bar in rows {
            bars.push(bar?);
        }
        Ok(bars)
    }

    /// Delete all bars for one ticker. Returns the number of rows removed.
    pub fn delete_bars(&self, ticker: &str) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM stock_prices WHERE ticker = ?1", params![ticker])?;
        info!(ticker, removed, "Deleted price bars");
        Ok(removed)
    }

    /// Delete every stored bar.
    pub fn truncate_bars(&self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM stock_prices", [])?;
        info!(removed, "Truncated price bars");
        Ok(removed)
    }

    // --- Sentiment save events ---

    /// Append one save event: the four summary rows tagged with `ticker` and
    /// `date` (`YYYY-MM-DD`).
    pub fn save_sentiment_rows(
        &self,
        ticker: &str,
        rows: &[SentimentSummaryRow],
        date: &str,
    ) -> Result<()> {
        for row in rows {
            self.conn.execute(
                "INSERT INTO sentiment_analysis (ticker, sentiment, sentiment_score, date)
                 VALUES (?1, ?2, ?3, ?4)",
                params![ticker, row.category.to_string(), row.count, date],
            )?;
        }
        info!(ticker, rows = rows.len(), date, "Saved sentiment summary");
        Ok(())
    }

    /// All persisted sentiment rows in insertion order.
    pub fn load_sentiment_rows(&self) -> Result<Vec<SentimentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT ticker, sentiment, sentiment_score, date
             FROM sentiment_analysis ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SentimentRecord {
                ticker: row.get(0)?,
                category: row.get(1)?,
                score: row.get(2)?,
                date: row.get(3)?,
            })
        })?;
        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    /// Historical aggregation: mean Combined Score per ticker across all
    /// save events, ordered by ticker.
    ///
    /// Mean, not sum — repeated saves for the same ticker average together.
    /// Preserved as existing behavior; see DESIGN.md.
    pub fn historical_combined_means(&self) -> Result<Vec<(String, f64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT ticker, AVG(sentiment_score)
             FROM sentiment_analysis
             WHERE sentiment = 'Combined Score'
             GROUP BY ticker
             ORDER BY ticker ASC",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut means = Vec::new();
        for mean in rows {
            means.push(mean?);
        }
        Ok(means)
    }

    /// Remove sentiment rows persisted without a ticker tag.
    pub fn clean_sentiment_rows(&self) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM sentiment_analysis WHERE ticker = ''", [])?;
        info!(removed, "Cleaned blank-ticker sentiment rows");
        Ok(removed)
    }

    /// Delete every persisted sentiment row.
    pub fn delete_sentiment_rows(&self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM sentiment_analysis", [])?;
        info!(removed, "Deleted all sentiment rows");
        Ok(removed)
    }
}
