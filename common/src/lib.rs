//! Shared data model for the job scraper workspace.
//!
//! Records flow from the scraper (`ListingRecord`), through the sentiment
//! analyzer (`SentimentResult`), into `ScoredListing`, which is what gets
//! written to disk and read back by the report binary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One job listing. Every text field is an empty string when extraction
/// could not populate it, so consumers never branch on presence.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ListingRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: String,
    pub posted_date: String,
    pub job_type: String,
    pub salary: String,
    pub salary_min: Option<i64>,
    pub source: String,
    pub scraped_date: String,
}

impl ListingRecord {
    /// Copies every non-empty field of `details` over `self`.
    ///
    /// Stub fields survive when the detail page has nothing better.
    pub fn merge_details(&mut self, details: ListingRecord) {
        fn take(dst: &mut String, src: String) {
            if !src.is_empty() {
                *dst = src;
            }
        }

        take(&mut self.title, details.title);
        take(&mut self.company, details.company);
        take(&mut self.location, details.location);
        take(&mut self.description, details.description);
        take(&mut self.url, details.url);
        take(&mut self.posted_date, details.posted_date);
        take(&mut self.job_type, details.job_type);
        take(&mut self.salary, details.salary);
        take(&mut self.source, details.source);
        take(&mut self.scraped_date, details.scraped_date);
        if details.salary_min.is_some() {
            self.salary_min = details.salary_min;
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three raw polarity scores and the label derived from them.
///
/// Built once per description by the analyzer; fields are private so the
/// label can never drift away from the scores.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SentimentResult {
    polarity_score: f64,
    compound_score: f64,
    token_score: f64,
    overall_sentiment: SentimentLabel,
}

impl SentimentResult {
    /// `label` must be the aggregation of the three scores; the sentiment
    /// crate is the only caller.
    pub fn new(scores: [f64; 3], label: SentimentLabel) -> Self {
        Self {
            polarity_score: scores[0],
            compound_score: scores[1],
            token_score: scores[2],
            overall_sentiment: label,
        }
    }

    pub fn scores(&self) -> [f64; 3] {
        [self.polarity_score, self.compound_score, self.token_score]
    }

    pub fn polarity_score(&self) -> f64 {
        self.polarity_score
    }

    pub fn compound_score(&self) -> f64 {
        self.compound_score
    }

    pub fn token_score(&self) -> f64 {
        self.token_score
    }

    pub fn label(&self) -> SentimentLabel {
        self.overall_sentiment
    }
}

impl Default for SentimentResult {
    fn default() -> Self {
        Self::new([0.0; 3], SentimentLabel::Neutral)
    }
}

/// A listing together with its sentiment, as persisted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScoredListing {
    #[serde(flatten)]
    pub listing: ListingRecord,
    pub sentiment_analysis: SentimentResult,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentDistribution {
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// Company-level roll-up of many scored listings.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompanySentiment {
    pub average_sentiment: SentimentLabel,
    pub total_postings: usize,
    pub sentiment_distribution: SentimentDistribution,
}
