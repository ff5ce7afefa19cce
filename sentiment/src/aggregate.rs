use common::{CompanySentiment, ScoredListing, SentimentDistribution, SentimentLabel};

/// Averages strictly above this are positive. Fixed, not configurable.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Averages strictly below this are negative. Fixed, not configurable.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Maps a score to its label. Both thresholds are exclusive, so exactly
/// ±0.1 is neutral.
pub fn label_for(score: f64) -> SentimentLabel {
    if score > POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if score < NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Three-way mean. Non-finite inputs count as 0.0 so the result is always
/// finite.
pub fn average_score(a: f64, b: f64, c: f64) -> f64 {
    let finite = |x: f64| if x.is_finite() { x } else { 0.0 };
    (finite(a) + finite(b) + finite(c)) / 3.0
}

pub fn overall_sentiment(a: f64, b: f64, c: f64) -> SentimentLabel {
    label_for(average_score(a, b, c))
}

/// Rolls many scored listings up into one label plus a distribution.
pub fn company_sentiment(records: &[ScoredListing]) -> CompanySentiment {
    if records.is_empty() {
        return CompanySentiment::default();
    }

    let mut distribution = SentimentDistribution::default();
    let mut total = 0.0;

    for record in records {
        let result = &record.sentiment_analysis;
        distribution.record(result.label());
        let [a, b, c] = result.scores();
        total += average_score(a, b, c);
    }

    CompanySentiment {
        average_sentiment: label_for(total / records.len() as f64),
        total_postings: records.len(),
        sentiment_distribution: distribution,
    }
}

/// `company_sentiment` over the listings whose company matches `company`,
/// ignoring case and surrounding whitespace.
pub fn company_sentiment_for(records: &[ScoredListing], company: &str) -> CompanySentiment {
    let wanted = company.trim().to_lowercase();
    let matching: Vec<ScoredListing> = records
        .iter()
        .filter(|r| r.listing.company.trim().to_lowercase() == wanted)
        .cloned()
        .collect();
    company_sentiment(&matching)
}
