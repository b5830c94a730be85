//! Lexicon-based sentiment classification for article text.
//!
//! Each article is scored with the VADER compound polarity measure — a
//! single intensity value in [-1, 1] combining positive, negative, and
//! neutral word weights — over the title and short description joined with a
//! single space. The compound score maps onto a discrete label through fixed
//! thresholds:
//!
//! | compound       | label   |
//! |----------------|---------|
//! | ≥ 0.05         | Bullish |
//! | ≤ −0.05        | Bearish |
//! | otherwise      | Neutral |
//!
//! Classification is a pure function of the text: the same input always
//! produces the same label.

pub mod aggregate;

use std::path::Path;
use tracing::{info, instrument};
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::errors::Result;
use crate::models::{ArticleRecord, NA, SentimentLabel};
use crate::outputs::table;

/// Compound score at or above which an article is Bullish.
pub const BULLISH_THRESHOLD: f64 = 0.05;
/// Compound score at or below which an article is Bearish.
pub const BEARISH_THRESHOLD: f64 = -0.05;

/// Map a compound polarity score onto a discrete label.
pub fn label_for_score(score: f64) -> SentimentLabel {
    if score >= BULLISH_THRESHOLD {
        SentimentLabel::Bullish
    } else if score <= BEARISH_THRESHOLD {
        SentimentLabel::Bearish
    } else {
        SentimentLabel::Neutral
    }
}

/// Scores article text with the VADER lexicon.
pub struct SentimentClassifier {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl SentimentClassifier {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Compound polarity score in [-1, 1] for a piece of text.
    pub fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        self.analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }

    /// Classify one article from its title and description.
    ///
    /// A sentinel ("N/A") description contributes an empty string rather
    /// than polluting the score with the literal sentinel text.
    pub fn classify(&self, title: &str, description: &str) -> SentimentLabel {
        let description = if description == NA { "" } else { description };
        let text = format!("{title} {description}");
        label_for_score(self.score(&text))
    }

    /// Annotate every record in place.
    pub fn classify_all(&self, articles: &mut [ArticleRecord]) {
        for article in articles.iter_mut() {
            article.sentiment = Some(self.classify(&article.title, &article.description));
        }
    }
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify the article table at `path` in place: read it, annotate every
/// row, and rewrite the same file with `Sentiment` as the first column.
/// Returns the number of rows classified.
#[instrument(level = "info", skip(classifier), fields(path = %path.display()))]
pub fn classify_table(classifier: &SentimentClassifier, path: &Path) -> Result<usize> {
    let mut articles = table::read_articles(path)?;
    classifier.classify_all(&mut articles);
    table::write_classified(path, &articles)?;
    info!(count = articles.len(), "Classified article table");
    Ok(articles.len())
}
