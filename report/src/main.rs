//! Job Listing Report
//!
//! Loads scored listings written by the scraper and prints the breakdowns
//! that used to feed the charts: top companies and locations, job types,
//! salary range and sentiment.

mod summary;

use anyhow::{Context, Result, bail};
use clap::Parser;
use common::ScoredListing;
use sentiment::company_sentiment;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::summary::{salary_stats, top_company_sentiment, top_counts};

#[derive(Debug, Parser)]
#[command(name = "report", about = "Summarise scraped job listings")]
struct Args {
    /// Scraper JSON output; defaults to the newest .json file in --data-dir
    input: Option<PathBuf>,

    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Rows per ranking
    #[arg(long, default_value_t = 10)]
    top: usize,
}

/// Newest `.json` file directly inside `dir`.
fn latest_json(dir: &Path) -> Result<PathBuf> {
    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading data directory {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let modified = fs::metadata(&path)?.modified()?;
        if newest.as_ref().is_none_or(|(t, _)| modified > *t) {
            newest = Some((modified, path));
        }
    }

    match newest {
        Some((_, path)) => Ok(path),
        None => bail!("no .json files in {}. Run the scraper first!", dir.display()),
    }
}

fn load(path: &Path) -> Result<Vec<ScoredListing>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn print_ranking(title: &str, rows: &[(String, usize)]) {
    println!("\n{title}");
    if rows.is_empty() {
        println!("  (none)");
    }
    for (name, count) in rows {
        println!("  {count:>4}  {name}");
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();

    let args = Args::parse();
    let path = match args.input {
        Some(p) => p,
        None => latest_json(&args.data_dir)?,
    };

    println!("📂 Loading jobs from {:?}", path);
    let records = load(&path)?;
    info!(count = records.len(), "loaded listings");
    println!("📊 Loaded {} jobs", records.len());

    print_ranking(
        &format!("🏢 Top {} companies by postings", args.top),
        &top_counts(&records, |l| l.company.as_str(), args.top),
    );
    print_ranking(
        &format!("📍 Top {} locations by postings", args.top),
        &top_counts(&records, |l| l.location.as_str(), args.top),
    );
    print_ranking(
        "🗂  Job types",
        &top_counts(&records, |l| l.job_type.as_str(), usize::MAX),
    );

    println!("\n💰 Salary (minimum advertised)");
    match salary_stats(&records) {
        Some(s) => println!(
            "  {} listings, min {}, max {}, mean {:.0}",
            s.count, s.min, s.max, s.mean
        ),
        None => println!("  (no salaries found)"),
    }

    let overall = company_sentiment(&records);
    let dist = overall.sentiment_distribution;
    println!(
        "\n🧭 Sentiment: {} overall (positive {}, neutral {}, negative {})",
        overall.average_sentiment, dist.positive, dist.neutral, dist.negative
    );
    for (company, s) in top_company_sentiment(&records, args.top) {
        println!(
            "  {:<9} {:>3} posting(s)  {}",
            s.average_sentiment.as_str(),
            s.total_postings,
            company
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{ListingRecord, SentimentResult};

    #[test]
    fn loads_what_the_scraper_writes() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![ScoredListing {
            listing: ListingRecord {
                title: "Rust Dev".into(),
                ..Default::default()
            },
            sentiment_analysis: SentimentResult::default(),
        }];
        let path = dir.path().join("indeed_rust.json");
        fs::write(&path, serde_json::to_string_pretty(&records).unwrap()).unwrap();

        assert_eq!(latest_json(dir.path()).unwrap(), path);
        assert_eq!(load(&path).unwrap(), records);
    }

    #[test]
    fn empty_data_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        assert!(latest_json(dir.path()).is_err());
    }
}
