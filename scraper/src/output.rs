//! Persisting scored listings as JSON or CSV.

use chrono::{DateTime, Local};
use common::{ListingRecord, ScoredListing};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unsupported output format: {other}")),
        }
    }
}

/// Keeps the first listing per URL. Listings without a URL are all kept.
pub fn dedup_by_url(listings: Vec<ListingRecord>) -> Vec<ListingRecord> {
    let mut seen_urls: HashSet<String> = HashSet::new();
    listings
        .into_iter()
        .filter(|l| l.url.is_empty() || seen_urls.insert(l.url.clone()))
        .collect()
}

/// `{platform}_{query}_{location}_{YYYYmmdd_HHMMSS}` with anything outside
/// `[A-Za-z0-9-]` replaced by `_`.
pub fn output_stem(platform: &str, query: &str, location: &str, at: DateTime<Local>) -> String {
    let safe = |s: &str| -> String {
        s.trim()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect()
    };
    format!(
        "{}_{}_{}_{}",
        safe(platform),
        safe(query),
        safe(location),
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Writes `records` to `dir/stem.ext`, creating `dir` if needed.
pub fn save(
    records: &[ScoredListing],
    dir: &Path,
    stem: &str,
    format: OutputFormat,
) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{stem}.{}", format.extension()));
    match format {
        OutputFormat::Json => write_json(records, &path)?,
        OutputFormat::Csv => write_csv(records, &path)?,
    }
    Ok(path)
}

pub fn write_json(records: &[ScoredListing], path: &Path) -> Result<(), OutputError> {
    let json_output = serde_json::to_string_pretty(records)?;
    fs::write(path, json_output)?;
    Ok(())
}

/// Flat row; the csv crate cannot serialize flattened structs.
#[derive(Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    company: &'a str,
    location: &'a str,
    description: &'a str,
    url: &'a str,
    posted_date: &'a str,
    job_type: &'a str,
    salary: &'a str,
    salary_min: Option<i64>,
    source: &'a str,
    scraped_date: &'a str,
    polarity_score: f64,
    compound_score: f64,
    token_score: f64,
    overall_sentiment: &'a str,
}

impl<'a> From<&'a ScoredListing> for CsvRow<'a> {
    fn from(s: &'a ScoredListing) -> Self {
        let l = &s.listing;
        let sentiment = &s.sentiment_analysis;
        Self {
            title: &l.title,
            company: &l.company,
            location: &l.location,
            description: &l.description,
            url: &l.url,
            posted_date: &l.posted_date,
            job_type: &l.job_type,
            salary: &l.salary,
            salary_min: l.salary_min,
            source: &l.source,
            scraped_date: &l.scraped_date,
            polarity_score: sentiment.polarity_score(),
            compound_score: sentiment.compound_score(),
            token_score: sentiment.token_score(),
            overall_sentiment: sentiment.label().as_str(),
        }
    }
}

pub fn write_csv(records: &[ScoredListing], path: &Path) -> Result<(), OutputError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}
