//! Scrape orchestration: render a news listing, extract articles, write the
//! article table.
//!
//! Two entry points mirror the two Yahoo Finance listings:
//!
//! - [`scrape_ticker`]: the latest-news page for one ticker symbol
//! - [`scrape_general`]: the general latest-news topic page
//!
//! Each run fully overwrites the target table; there is no merge with
//! previous runs (documented design decision — each scrape starts clean).
//! Renderer failures abort only the current scrape, and a page that renders
//! but yields no article containers is reported as an empty result rather
//! than an error.

pub mod extract;
pub mod renderer;

use std::path::Path;
use tracing::{info, instrument};

use crate::errors::{Error, Result};
use crate::outputs::table;
use renderer::PageRenderer;

/// General-market latest news listing.
pub const GENERAL_NEWS_URL: &str = "https://finance.yahoo.com/topic/latest-news";

/// Latest-news listing for a single ticker.
pub fn ticker_news_url(ticker: &str) -> String {
    format!("https://finance.yahoo.com/quote/{ticker}/latest-news/")
}

/// Scrape the latest news for one ticker and overwrite the article table at
/// `out_path`. Returns the number of articles written.
#[instrument(level = "info", skip(renderer, out_path), fields(out = %out_path.display()))]
pub async fn scrape_ticker<R: PageRenderer>(
    renderer: &R,
    ticker: &str,
    out_path: &Path,
) -> Result<usize> {
    info!(ticker, "Scraping ticker news");
    scrape_url(renderer, &ticker_news_url(ticker), out_path).await
}

/// Scrape the general market news listing and overwrite the article table at
/// `out_path`. Returns the number of articles written.
#[instrument(level = "info", skip(renderer, out_path), fields(out = %out_path.display()))]
pub async fn scrape_general<R: PageRenderer>(renderer: &R, out_path: &Path) -> Result<usize> {
    info!("Scraping general market news");
    scrape_url(renderer, GENERAL_NEWS_URL, out_path).await
}

async fn scrape_url<R: PageRenderer>(renderer: &R, url: &str, out_path: &Path) -> Result<usize> {
    let html = renderer.render(url).await?;
    let articles = extract::extract_articles(&html);

    if articles.is_empty() {
        return Err(Error::EmptyResult(format!("no articles found at {url}")));
    }

    table::write_articles(out_path, &articles)?;
    info!(count = articles.len(), "Scrape complete");
    Ok(articles.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NA;

    /// Renderer that returns canned HTML, or fails, without a browser.
    struct FixtureRenderer {
        html: Option<String>,
    }

    impl PageRenderer for FixtureRenderer {
        async fn render(&self, _url: &str) -> Result<String> {
            match &self.html {
                Some(html) => Ok(html.clone()),
                None => Err(Error::Fetch("session not created".to_string())),
            }
        }
    }

    fn card(title: &str) -> String {
        format!(
            r#"<div class="content yf-82qtw3">
                <h3 class="clamp yf-82qtw3">{title}</h3>
                <p class="clamp yf-82qtw3">Description for {title}.</p>
                <div class="publishing yf-1weyqlp">Reuters • 1 hour ago</div>
            </div>"#
        )
    }

    fn temp_table(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("stock_news_sentiment_{name}.csv"))
    }

    #[test]
    fn test_ticker_news_url() {
        assert_eq!(
            ticker_news_url("MSFT"),
            "https://finance.yahoo.com/quote/MSFT/latest-news/"
        );
    }

    #[tokio::test]
    async fn test_scrape_writes_table() {
        let renderer = FixtureRenderer {
            html: Some(format!("<html><body>{}{}</body></html>", card("One"), card("Two"))),
        };
        let path = temp_table("scrape_writes");
        let _ = std::fs::remove_file(&path);

        let count = scrape_ticker(&renderer, "MSFT", &path).await.unwrap();
        assert_eq!(count, 2);

        let articles = table::read_articles(&path).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "One");
        assert_eq!(articles[0].affected_tickers, NA);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_second_run_overwrites_first() {
        let path = temp_table("scrape_overwrites");
        let _ = std::fs::remove_file(&path);

        let first = FixtureRenderer {
            html: Some(format!(
                "<html><body>{}{}{}</body></html>",
                card("Stale one"),
                card("Stale two"),
                card("Stale three")
            )),
        };
        scrape_general(&first, &path).await.unwrap();

        let second = FixtureRenderer {
            html: Some(format!("<html><body>{}</body></html>", card("Fresh"))),
        };
        scrape_general(&second, &path).await.unwrap();

        let articles = table::read_articles(&path).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Fresh");

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_empty_page_is_empty_result_not_error() {
        let renderer = FixtureRenderer {
            html: Some("<html><body></body></html>".to_string()),
        };
        let path = temp_table("scrape_empty");
        let _ = std::fs::remove_file(&path);
        let result = scrape_ticker(&renderer, "MSFT", &path).await;
        assert!(matches!(result, Err(Error::EmptyResult(_))));
        // Nothing should have been written.
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let renderer = FixtureRenderer { html: None };
        let path = temp_table("scrape_fetch_failure");
        let result = scrape_ticker(&renderer, "MSFT", &path).await;
        assert!(matches!(result, Err(Error::Fetch(_))));
    }
}
