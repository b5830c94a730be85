//! Price-history CSV import.
//!
//! Bars arrive as an exported OHLCV CSV (`Date, Open, High, Low, Close,
//! Volume` headers, any column order) and are tagged with the ticker given on
//! the command line before being handed to the datastore, which enforces the
//! (ticker, date) uniqueness with insert-or-ignore semantics.

use std::path::Path;
use tracing::{info, instrument};

use crate::errors::{Error, Result};
use crate::models::StockBar;

/// Read OHLCV bars from a CSV export and tag them with `ticker`.
#[instrument(level = "info", fields(path = %path.display()))]
pub fn read_bars_csv(path: &Path, ticker: &str) -> Result<Vec<StockBar>> {
    if !path.exists() {
        return Err(Error::MissingFile(path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::Data(format!("price CSV is missing a '{name}' column")))
    };
    let date_col = column("Date")?;
    let open_col = column("Open")?;
    let high_col = column("High")?;
    let low_col = column("Low")?;
    let close_col = column("Close")?;
    let volume_col = column("Volume")?;

    let mut bars = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let number = |col: usize, name: &str| -> Result<f64> {
            record
                .get(col)
                .and_then(|s| s.trim().parse::<f64>().ok())
                .ok_or_else(|| {
                    Error::Data(format!("row {}: unparseable '{name}' value", line + 2))
                })
        };
        // Volume is an integer in the schema; a fractional value is a bad
        // row, not something to floor silently.
        let volume = record
            .get(volume_col)
            .and_then(|s| s.trim().parse::<i64>().ok())
            .ok_or_else(|| Error::Data(format!("row {}: unparseable 'Volume' value", line + 2)))?;
        bars.push(StockBar {
            ticker: ticker.to_string(),
            date: record.get(date_col).unwrap_or("").trim().to_string(),
            open: number(open_col, "Open")?,
            high: number(high_col, "High")?,
            low: number(low_col, "Low")?,
            close: number(close_col, "Close")?,
            volume,
        });
    }

    info!(count = bars.len(), ticker, "Read price bars from CSV");
    Ok(bars)
}
