//! Utility functions for ticker normalization and the persistent error log.

use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Normalize a user-supplied ticker symbol: trim and upper-case.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_ticker(" msft "), "MSFT");
/// ```
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

/// Append a timestamped line to the persistent error log.
///
/// Fetch- and file-granularity failures land here in addition to the tracing
/// output, so a session's failures survive process exit. The log itself is
/// best-effort: if it cannot be written, the failure is only traced.
pub fn log_error(path: &Path, message: &str) {
    let line = format!("{} - {}\n", Utc::now().to_rfc3339(), message);
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| file.write_all(line.as_bytes()));
    if let Err(e) = result {
        warn!(path = %path.display(), error = %e, "Could not append to error log");
    }
}
