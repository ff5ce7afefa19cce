//! Aggregations over scored listings for the text report.

use common::{CompanySentiment, ListingRecord, ScoredListing};
use sentiment::company_sentiment_for;
use std::collections::HashMap;

/// Most frequent non-empty values of `key`, largest first, ties by name.
///
/// Values are grouped case-insensitively after trimming, the same way
/// `company_sentiment_for` matches companies. Each group is shown with the
/// first spelling seen.
pub fn top_counts<F>(records: &[ScoredListing], key: F, n: usize) -> Vec<(String, usize)>
where
    F: Fn(&ListingRecord) -> &str,
{
    let mut counts: HashMap<String, (&str, usize)> = HashMap::new();
    for record in records {
        let value = key(&record.listing).trim();
        if !value.is_empty() {
            counts.entry(value.to_lowercase()).or_insert((value, 0)).1 += 1;
        }
    }

    let mut sorted: Vec<(String, usize)> = counts
        .into_values()
        .map(|(shown, v)| (shown.to_string(), v))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(n);
    sorted
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryStats {
    pub count: usize,
    pub min: i64,
    pub max: i64,
    pub mean: f64,
}

/// Statistics over `salary_min`; `None` when no listing has one.
pub fn salary_stats(records: &[ScoredListing]) -> Option<SalaryStats> {
    let salaries: Vec<i64> = records
        .iter()
        .filter_map(|r| r.listing.salary_min)
        .collect();
    let min = *salaries.iter().min()?;
    let max = *salaries.iter().max()?;
    let mean = salaries.iter().map(|&s| s as f64).sum::<f64>() / salaries.len() as f64;
    Some(SalaryStats {
        count: salaries.len(),
        min,
        max,
        mean,
    })
}

/// Sentiment roll-up for each of the `n` companies with the most postings.
pub fn top_company_sentiment(
    records: &[ScoredListing],
    n: usize,
) -> Vec<(String, CompanySentiment)> {
    top_counts(records, |l| l.company.as_str(), n)
        .into_iter()
        .map(|(company, _)| {
            let summary = company_sentiment_for(records, &company);
            (company, summary)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{SentimentLabel, SentimentResult};

    fn job(company: &str, location: &str, salary_min: Option<i64>, score: f64) -> ScoredListing {
        ScoredListing {
            listing: ListingRecord {
                company: company.into(),
                location: location.into(),
                salary_min,
                ..Default::default()
            },
            sentiment_analysis: SentimentResult::new(
                [score; 3],
                sentiment::label_for(score),
            ),
        }
    }

    fn sample() -> Vec<ScoredListing> {
        vec![
            job("TechCorp", "Remote", Some(120_000), 0.7),
            job("StartupCo", "San Francisco", Some(140_000), 0.5),
            job("TechCorp", "Remote", None, -0.4),
            job("DataCorp", "Remote", Some(100_000), 0.0),
            job("", "", None, 0.0),
        ]
    }

    #[test]
    fn counts_are_sorted_and_skip_empty() {
        let top = top_counts(&sample(), |l| l.company.as_str(), 10);
        assert_eq!(
            top,
            vec![
                ("TechCorp".to_string(), 2),
                ("DataCorp".to_string(), 1),
                ("StartupCo".to_string(), 1),
            ]
        );
        assert_eq!(
            top_counts(&sample(), |l| l.location.as_str(), 1),
            vec![("Remote".to_string(), 3)]
        );
    }

    #[test]
    fn company_spellings_share_one_row() {
        let records = vec![
            job("Acme", "Remote", None, 0.6),
            job("ACME ", "Remote", None, 0.6),
            job("acme", "Remote", None, -0.9),
            job("Other", "Remote", None, 0.0),
        ];
        assert_eq!(
            top_counts(&records, |l| l.company.as_str(), 10),
            vec![("Acme".to_string(), 3), ("Other".to_string(), 1)]
        );

        let rows = top_company_sentiment(&records, 10);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, "Acme");
        assert_eq!(rows[0].1.total_postings, 3);
        assert_eq!(rows[1].1.total_postings, 1);
    }

    #[test]
    fn salary_stats_ignore_missing() {
        let stats = salary_stats(&sample()).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 100_000);
        assert_eq!(stats.max, 140_000);
        assert!((stats.mean - 120_000.0).abs() < 1e-6);
        assert_eq!(salary_stats(&[]), None);
    }

    #[test]
    fn company_sentiment_follows_posting_order() {
        let rows = top_company_sentiment(&sample(), 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, "TechCorp");
        assert_eq!(rows[0].1.total_postings, 2);
        // (0.7 - 0.4) / 2 = 0.15
        assert_eq!(rows[0].1.average_sentiment, SentimentLabel::Positive);
        assert_eq!(rows[0].1.sentiment_distribution.negative, 1);
    }
}
