use common::{ListingRecord, ScoredListing, SentimentResult};
use tracing::warn;

use crate::aggregate::overall_sentiment;
use crate::scorer::{
    CompoundScorer, MeanPolarityScorer, PolarityScorer, ScoringError, TokenMeanScorer,
};

/// Runs three independent scorers over a description and blends them.
pub struct SentimentAnalyzer {
    scorers: [Box<dyn PolarityScorer>; 3],
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self::with_scorers(
            Box::new(MeanPolarityScorer),
            Box::new(CompoundScorer),
            Box::new(TokenMeanScorer),
        )
    }

    pub fn with_scorers(
        polarity: Box<dyn PolarityScorer>,
        compound: Box<dyn PolarityScorer>,
        token: Box<dyn PolarityScorer>,
    ) -> Self {
        Self {
            scorers: [polarity, compound, token],
        }
    }

    /// Never fails: a scorer that errors or returns NaN/inf contributes 0.0.
    pub fn analyze(&self, text: &str) -> SentimentResult {
        let mut scores = [0.0; 3];
        for (slot, scorer) in scores.iter_mut().zip(self.scorers.iter()) {
            *slot = match checked_score(scorer.as_ref(), text) {
                Ok(v) => v,
                Err(e) => {
                    warn!(error = %e, "sentiment scorer failed, substituting 0.0");
                    0.0
                }
            };
        }
        SentimentResult::new(scores, overall_sentiment(scores[0], scores[1], scores[2]))
    }

    pub fn score_listing(&self, listing: ListingRecord) -> ScoredListing {
        let sentiment_analysis = self.analyze(&listing.description);
        ScoredListing {
            listing,
            sentiment_analysis,
        }
    }

    pub fn score_all(&self, listings: Vec<ListingRecord>) -> Vec<ScoredListing> {
        listings
            .into_iter()
            .map(|l| self.score_listing(l))
            .collect()
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn checked_score(scorer: &dyn PolarityScorer, text: &str) -> Result<f64, ScoringError> {
    let value = scorer.score(text)?;
    if !value.is_finite() {
        return Err(ScoringError::NonFinite {
            scorer: scorer.name(),
            value,
        });
    }
    Ok(value)
}
