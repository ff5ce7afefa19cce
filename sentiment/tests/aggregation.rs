// tests/aggregation.rs
use common::{
    CompanySentiment, ListingRecord, ScoredListing, SentimentDistribution, SentimentLabel,
    SentimentResult,
};
use sentiment::{
    NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD, SentimentAnalyzer, average_score, company_sentiment,
    company_sentiment_for, label_for, overall_sentiment,
};

fn scored(company: &str, scores: [f64; 3]) -> ScoredListing {
    ScoredListing {
        listing: ListingRecord {
            company: company.to_string(),
            ..Default::default()
        },
        sentiment_analysis: SentimentResult::new(
            scores,
            overall_sentiment(scores[0], scores[1], scores[2]),
        ),
    }
}

#[test]
fn documented_examples() {
    assert_eq!(overall_sentiment(0.8, 0.6, 0.7), SentimentLabel::Positive);
    assert_eq!(overall_sentiment(-0.5, -0.3, -0.4), SentimentLabel::Negative);
    assert_eq!(overall_sentiment(0.05, -0.02, 0.0), SentimentLabel::Neutral);
}

#[test]
fn average_just_inside_the_thresholds_is_neutral() {
    // 0.3 / 3 rounds to just below 0.1; no three f64 scores average to 0.1 exactly
    assert!(average_score(0.3, 0.0, 0.0) < POSITIVE_THRESHOLD);
    assert_eq!(overall_sentiment(0.3, 0.0, 0.0), SentimentLabel::Neutral);
    assert_eq!(overall_sentiment(-0.3, 0.0, 0.0), SentimentLabel::Neutral);
    assert_eq!(overall_sentiment(0.15, 0.15, 0.0), SentimentLabel::Neutral);
}

#[test]
fn average_just_past_the_thresholds_is_labelled() {
    assert!(average_score(0.1, 0.1, 0.1) > POSITIVE_THRESHOLD);
    assert_eq!(overall_sentiment(0.1, 0.1, 0.1), SentimentLabel::Positive);
    assert_eq!(overall_sentiment(-0.1, -0.1, -0.1), SentimentLabel::Negative);
}

#[test]
fn exact_thresholds_are_neutral() {
    assert_eq!(label_for(POSITIVE_THRESHOLD), SentimentLabel::Neutral);
    assert_eq!(label_for(NEGATIVE_THRESHOLD), SentimentLabel::Neutral);
}

#[test]
fn scores_outside_nominal_range_still_label() {
    assert_eq!(overall_sentiment(3.0, -0.5, 0.0), SentimentLabel::Positive);
    assert_eq!(overall_sentiment(-3.0, 0.5, 0.0), SentimentLabel::Negative);
}

#[test]
fn empty_company_is_neutral_with_zero_counts() {
    assert_eq!(
        company_sentiment(&[]),
        CompanySentiment {
            average_sentiment: SentimentLabel::Neutral,
            total_postings: 0,
            sentiment_distribution: SentimentDistribution {
                positive: 0,
                neutral: 0,
                negative: 0,
            },
        }
    );
}

#[test]
fn distribution_sums_to_number_of_postings() {
    let records = vec![
        scored("Acme", [0.8, 0.6, 0.7]),
        scored("Acme", [0.6, 0.5, 0.6]),
        scored("Acme", [0.0, 0.0, 0.0]),
        scored("Acme", [-0.9, -0.8, -0.2]),
    ];
    let summary = company_sentiment(&records);

    assert_eq!(summary.total_postings, 4);
    assert_eq!(summary.sentiment_distribution.total(), records.len());
    assert_eq!(summary.sentiment_distribution.positive, 2);
    assert_eq!(summary.sentiment_distribution.neutral, 1);
    assert_eq!(summary.sentiment_distribution.negative, 1);
    // (0.7 + 0.5667 + 0.0 - 0.6333) / 4 ≈ 0.158
    assert_eq!(summary.average_sentiment, SentimentLabel::Positive);
}

#[test]
fn company_filter_ignores_case() {
    let records = vec![
        scored("Tech Corp", [-0.9, -0.9, -0.9]),
        scored("tech corp ", [-0.6, -0.6, -0.6]),
        scored("Other", [0.9, 0.9, 0.9]),
    ];
    let summary = company_sentiment_for(&records, "TECH CORP");

    assert_eq!(summary.total_postings, 2);
    assert_eq!(summary.average_sentiment, SentimentLabel::Negative);
    assert_eq!(company_sentiment_for(&records, "Nobody").total_postings, 0);
}

#[test]
fn analyzer_labels_typical_descriptions() {
    let analyzer = SentimentAnalyzer::new();

    let positive = "We are looking for a talented developer to join our amazing team! \
        Our company offers excellent benefits, a supportive work environment, \
        and opportunities for growth.";
    let negative = "Stressful role with unpaid overtime, tight deadlines and a demanding, \
        toxic manager. Poor work life balance.";
    let neutral = "The position requires a bachelor's degree in computer science. \
        The role is full-time and located in our downtown office.";

    assert_eq!(analyzer.analyze(positive).label(), SentimentLabel::Positive);
    assert_eq!(analyzer.analyze(negative).label(), SentimentLabel::Negative);
    assert_eq!(analyzer.analyze(neutral).label(), SentimentLabel::Neutral);
    assert_eq!(analyzer.analyze("").label(), SentimentLabel::Neutral);
}
