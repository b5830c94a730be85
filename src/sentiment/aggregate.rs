//! Aggregation of classified articles into a combined sentiment signal.
//!
//! Two independent aggregations live here:
//!
//! 1. Per scrape batch: count articles per label and compute the combined
//!    score, `Bullish×1 + Neutral×0 + Bearish×(−1)`.
//! 2. Historical: the mean combined score per ticker across every save event
//!    in the sentiment store. Repeated saves for the same ticker average
//!    together — a deliberate preservation of existing behavior even though
//!    it understates cumulative sentiment for frequently-rescraped tickers.

use crate::models::{ArticleRecord, SentimentLabel, SentimentSummaryRow, SummaryCategory};

/// Per-label article counts for one scrape batch. Articles without a label
/// (classification not yet run) count toward nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelCounts {
    pub bullish: i64,
    pub neutral: i64,
    pub bearish: i64,
}

impl LabelCounts {
    /// Net sentiment signal: bullish − bearish (neutral contributes zero).
    pub fn combined_score(&self) -> i64 {
        self.bullish - self.bearish
    }
}

/// Tally label counts over a batch of articles.
pub fn count_labels(articles: &[ArticleRecord]) -> LabelCounts {
    let mut counts = LabelCounts::default();
    for article in articles {
        match article.sentiment {
            Some(SentimentLabel::Bullish) => counts.bullish += 1,
            Some(SentimentLabel::Neutral) => counts.neutral += 1,
            Some(SentimentLabel::Bearish) => counts.bearish += 1,
            None => {}
        }
    }
    counts
}

/// Build the four summary rows for a batch: one count per label, plus the
/// combined score. This is what gets displayed and, on explicit request,
/// persisted to the sentiment store.
pub fn summarize(articles: &[ArticleRecord]) -> Vec<SentimentSummaryRow> {
    let counts = count_labels(articles);
    vec![
        SentimentSummaryRow {
            category: SummaryCategory::Bullish,
            count: counts.bullish,
        },
        SentimentSummaryRow {
            category: SummaryCategory::Neutral,
            count: counts.neutral,
        },
        SentimentSummaryRow {
            category: SummaryCategory::Bearish,
            count: counts.bearish,
        },
        SentimentSummaryRow {
            category: SummaryCategory::CombinedScore,
            count: counts.combined_score(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(label: SentimentLabel) -> ArticleRecord {
        ArticleRecord {
            sentiment: Some(label),
            ..ArticleRecord::default()
        }
    }

    fn batch(bullish: usize, neutral: usize, bearish: usize) -> Vec<ArticleRecord> {
        let mut articles = Vec::new();
        articles.extend((0..bullish).map(|_| labeled(SentimentLabel::Bullish)));
        articles.extend((0..neutral).map(|_| labeled(SentimentLabel::Neutral)));
        articles.extend((0..bearish).map(|_| labeled(SentimentLabel::Bearish)));
        articles
    }

    #[test]
    fn test_combined_score_formula() {
        // 5 bullish, 3 neutral, 2 bearish -> 5*1 + 3*0 + 2*(-1) = 3
        let counts = count_labels(&batch(5, 3, 2));
        assert_eq!(counts.bullish, 5);
        assert_eq!(counts.neutral, 3);
        assert_eq!(counts.bearish, 2);
        assert_eq!(counts.combined_score(), 3);
    }

    #[test]
    fn test_unlabeled_articles_count_as_nothing() {
        let mut articles = batch(1, 0, 1);
        articles.push(ArticleRecord::default());
        articles.push(ArticleRecord::default());

        let counts = count_labels(&articles);
        assert_eq!(counts.bullish, 1);
        assert_eq!(counts.neutral, 0);
        assert_eq!(counts.bearish, 1);
        assert_eq!(counts.combined_score(), 0);
    }

    #[test]
    fn test_empty_batch_is_all_zeroes() {
        let rows = summarize(&[]);
        assert!(rows.iter().all(|row| row.count == 0));
    }

    #[test]
    fn test_summary_rows_in_display_order() {
        let rows = summarize(&batch(2, 1, 4));
        let categories: Vec<SummaryCategory> = rows.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![
                SummaryCategory::Bullish,
                SummaryCategory::Neutral,
                SummaryCategory::Bearish,
                SummaryCategory::CombinedScore,
            ]
        );
        assert_eq!(rows[3].count, -2);
    }
}
