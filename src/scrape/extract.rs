//! Article extraction from rendered Yahoo Finance news markup.
//!
//! The news listing is a sequence of `div.content` cards whose inner
//! structure varies between plain stories, sponsored items, and stories with
//! ticker badges attached. Every field is looked up independently and
//! defaults to the `"N/A"` sentinel when its node is absent, so one malformed
//! card degrades to a partial record instead of aborting the batch — that
//! per-field isolation is the key resilience property of this module.
//!
//! # Class signatures
//!
//! Yahoo ships build-suffixed utility classes (`yf-82qtw3` etc.); the
//! selectors below pin the same structural signatures the listing currently
//! uses. When the site rotates the suffixes the selectors need refreshing,
//! which shows up as an empty scrape, not a crash.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::models::{ArticleRecord, NA};

static ARTICLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.content.yf-82qtw3").unwrap());
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3.clamp.yf-82qtw3").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a.subtle-link.fin-size-small.titles.noUnderline.yf-1xqzjha").unwrap()
});
static DESCRIPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.clamp.yf-82qtw3").unwrap());
static PUBLISHING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.publishing.yf-1weyqlp").unwrap());
static TICKER_BADGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.name.yf-1m808gl").unwrap());
static SYMBOL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.symbol.yf-1m808gl").unwrap());

/// Marker after which Bloomberg stories append their "most read" link block.
const MOST_READ_MARKER: &str = "Most Read from Bloomberg";

/// Wire-service preambles: `(Bloomberg) -- ` and `(Reuters) - ` variants.
static WIRE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\((?:Bloomberg|Reuters)\)\s*-{1,2}\s*").unwrap());

/// Base against which relative story hrefs are resolved.
static PAGE_BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://finance.yahoo.com").unwrap());

/// Extract all article records from rendered markup, in document order.
///
/// A page with zero matching containers yields an empty vector, not an
/// error — the caller decides whether that is worth a warning.
#[instrument(level = "info", skip_all)]
pub fn extract_articles(html: &str) -> Vec<ArticleRecord> {
    let document = Html::parse_document(html);
    let articles: Vec<ArticleRecord> = document
        .select(&ARTICLE_SELECTOR)
        .map(extract_article)
        .collect();

    if articles.is_empty() {
        warn!("No article containers matched the page");
    } else {
        info!(count = articles.len(), "Extracted articles");
    }
    articles
}

/// Extract one article card. Each field lookup is independent; a missing
/// node leaves that field at `"N/A"` and the rest of the record intact.
fn extract_article(node: ElementRef<'_>) -> ArticleRecord {
    let title = node
        .select(&TITLE_SELECTOR)
        .next()
        .map(element_text)
        .unwrap_or_else(|| NA.to_string());

    // Story hrefs are sometimes site-relative; resolve them against the
    // page base. An href that cannot resolve defaults like any other field.
    let link = node
        .select(&LINK_SELECTOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| PAGE_BASE.join(href).ok())
        .map(|resolved| resolved.to_string())
        .unwrap_or_else(|| NA.to_string());

    let description = node
        .select(&DESCRIPTION_SELECTOR)
        .next()
        .map(|p| clean_description(&element_text(p)))
        .unwrap_or_else(|| NA.to_string());

    let (source, published_date) = node
        .select(&PUBLISHING_SELECTOR)
        .next()
        .map(|el| split_publishing(&element_text(el)))
        .unwrap_or_else(|| (NA.to_string(), NA.to_string()));

    let symbols: Vec<String> = node
        .select(&TICKER_BADGE_SELECTOR)
        .filter_map(|badge| badge.select(&SYMBOL_SELECTOR).next())
        .map(|symbol| element_text(symbol))
        .filter(|symbol| !symbol.is_empty())
        .collect();
    let affected_tickers = if symbols.is_empty() {
        NA.to_string()
    } else {
        symbols.join(", ")
    };

    debug!(%title, %source, "Extracted article card");
    ArticleRecord {
        title,
        description,
        source,
        published_date,
        affected_tickers,
        link,
        sentiment: None,
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ").trim().to_string()
}

/// The publishing line reads `"Source • 2 hours ago"`. Either half may be
/// missing; each defaults independently.
fn split_publishing(text: &str) -> (String, String) {
    let mut parts = text.split('•').map(str::trim);
    let source = match parts.next() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NA.to_string(),
    };
    let published = match parts.next() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NA.to_string(),
    };
    (source, published)
}

/// Strip wire-service boilerplate from a description.
///
/// Drops the trailing "Most Read from Bloomberg" block (marker and
/// everything after it) and a leading `(Bloomberg) -- ` / `(Reuters) -`
/// preamble, then trims.
pub fn clean_description(raw: &str) -> String {
    let truncated = match raw.find(MOST_READ_MARKER) {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    WIRE_PREFIX.replace(truncated, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One well-formed card matching the live class signatures.
    fn full_card(title: &str, description: &str, tickers: &[&str]) -> String {
        let badges: String = tickers
            .iter()
            .map(|t| {
                format!(
                    r#"<div class="name yf-1m808gl"><span class="symbol yf-1m808gl">{t}</span></div>"#
                )
            })
            .collect();
        format!(
            r#"<div class="content yf-82qtw3">
                <a class="subtle-link fin-size-small titles noUnderline yf-1xqzjha" href="https://finance.yahoo.com/news/item.html">
                    <h3 class="clamp yf-82qtw3">{title}</h3>
                    <p class="clamp yf-82qtw3">{description}</p>
                </a>
                <div class="publishing yf-1weyqlp">Reuters • 2 hours ago</div>
                {badges}
            </div>"#
        )
    }

    #[test]
    fn test_extracts_all_fields() {
        let html = format!(
            "<html><body>{}</body></html>",
            full_card("Fed holds rates steady", "Markets rallied on the decision.", &["MSFT", "AAPL"])
        );
        let articles = extract_articles(&html);
        assert_eq!(articles.len(), 1);

        let article = &articles[0];
        assert_eq!(article.title, "Fed holds rates steady");
        assert_eq!(article.description, "Markets rallied on the decision.");
        assert_eq!(article.source, "Reuters");
        assert_eq!(article.published_date, "2 hours ago");
        assert_eq!(article.affected_tickers, "MSFT, AAPL");
        assert_eq!(article.link, "https://finance.yahoo.com/news/item.html");
        assert_eq!(article.sentiment, None);
    }

    #[test]
    fn test_missing_description_isolates_field() {
        // Card with a valid title but no description tag, followed by a
        // fully-formed card: the bad field defaults, the next card is intact.
        let broken = r#"<div class="content yf-82qtw3">
            <h3 class="clamp yf-82qtw3">Valid title</h3>
        </div>"#;
        let html = format!(
            "<html><body>{}{}</body></html>",
            broken,
            full_card("Second story", "Second description.", &[])
        );

        let articles = extract_articles(&html);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Valid title");
        assert_eq!(articles[0].description, NA);
        assert_eq!(articles[0].link, NA);
        assert_eq!(articles[0].source, NA);
        assert_eq!(articles[1].title, "Second story");
        assert_eq!(articles[1].description, "Second description.");
    }

    #[test]
    fn test_empty_page_yields_empty_vec() {
        let articles = extract_articles("<html><body><p>nothing here</p></body></html>");
        assert!(articles.is_empty());
    }

    #[test]
    fn test_no_ticker_badges_defaults_to_na() {
        let html = format!(
            "<html><body>{}</body></html>",
            full_card("No badges", "Text.", &[])
        );
        let articles = extract_articles(&html);
        assert_eq!(articles[0].affected_tickers, NA);
    }

    fn card_with_href(href: &str) -> String {
        format!(
            r#"<div class="content yf-82qtw3">
                <a class="subtle-link fin-size-small titles noUnderline yf-1xqzjha" href="{href}">
                    <h3 class="clamp yf-82qtw3">Linked story</h3>
                </a>
            </div>"#
        )
    }

    #[test]
    fn test_relative_href_is_resolved_against_page_base() {
        let html = format!(
            "<html><body>{}</body></html>",
            card_with_href("/news/some-story-123.html")
        );
        let articles = extract_articles(&html);
        assert_eq!(
            articles[0].link,
            "https://finance.yahoo.com/news/some-story-123.html"
        );
    }

    #[test]
    fn test_unresolvable_href_defaults_to_na() {
        let html = format!(
            "<html><body>{}</body></html>",
            card_with_href("https://[not-a-host/story")
        );
        let articles = extract_articles(&html);
        assert_eq!(articles[0].link, NA);
        // The rest of the record is unaffected.
        assert_eq!(articles[0].title, "Linked story");
    }

    #[test]
    fn test_clean_description_strips_bloomberg_boilerplate() {
        let raw = "(Bloomberg) -- Markets rallied today. Most Read from Bloomberg\nOther stuff";
        assert_eq!(clean_description(raw), "Markets rallied today.");
    }

    #[test]
    fn test_clean_description_strips_reuters_prefix() {
        assert_eq!(
            clean_description("(Reuters) - Oil prices fell on Monday."),
            "Oil prices fell on Monday."
        );
    }

    #[test]
    fn test_clean_description_leaves_plain_text_alone() {
        assert_eq!(
            clean_description("A perfectly ordinary description."),
            "A perfectly ordinary description."
        );
    }

    #[test]
    fn test_publishing_line_with_missing_date() {
        let (source, published) = split_publishing("Barron's");
        assert_eq!(source, "Barron's");
        assert_eq!(published, NA);
    }

    #[test]
    fn test_document_order_is_preserved() {
        let html = format!(
            "<html><body>{}{}{}</body></html>",
            full_card("First", "a", &[]),
            full_card("Second", "b", &[]),
            full_card("Third", "c", &[])
        );
        let titles: Vec<String> = extract_articles(&html)
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }
}
