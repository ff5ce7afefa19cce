//! Multi-method sentiment analysis for job descriptions.
//!
//! Three scorers produce independent polarity numbers; `overall_sentiment`
//! blends them into a single label and `company_sentiment` rolls many
//! labelled listings up into a company view.

pub mod aggregate;
pub mod analyzer;
mod lexicon;
pub mod scorer;

pub use aggregate::{
    NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD, average_score, company_sentiment,
    company_sentiment_for, label_for, overall_sentiment,
};
pub use analyzer::SentimentAnalyzer;
pub use scorer::{CompoundScorer, MeanPolarityScorer, PolarityScorer, ScoringError, TokenMeanScorer};
