//! Job Board Scraper
//!
//! Scrapes job listings from Indeed or LinkedIn, scores every description
//! for sentiment and saves the result to the data directory.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use job_scraper::extract::validate_url;
use job_scraper::output::{self, OutputFormat};
use job_scraper::watch::LEDGER_FILE;
use job_scraper::{
    scrape_listings, FetchPolicy, Fetcher, HttpTransport, Platform, SeenLedger, ThreadSleep,
    WatchCriteria,
};
use sentiment::{company_sentiment, company_sentiment_for, SentimentAnalyzer};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "job-scraper", about = "Scrape job listings and score their sentiment")]
struct Args {
    /// Job board to scrape (indeed, linkedin)
    #[arg(long)]
    platform: Platform,

    /// Search keywords
    #[arg(long)]
    query: String,

    /// Search location
    #[arg(long)]
    location: String,

    /// Maximum number of search pages to fetch
    #[arg(long, default_value_t = 5)]
    max_pages: usize,

    /// json or csv
    #[arg(long, default_value = "json")]
    output_format: OutputFormat,

    #[arg(long, default_value = "data")]
    output_dir: PathBuf,

    /// TOML file with fetch policy overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from this search URL instead of building one from query/location
    #[arg(long)]
    start_url: Option<String>,

    /// Print sentiment for this company's postings after scraping
    #[arg(long)]
    company: Option<String>,

    /// TOML watch criteria; reports matches not seen in earlier runs
    #[arg(long)]
    watch: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();
    let args = Args::parse();

    // Everything that can be wrong with the input fails here, before any request
    let policy = match &args.config {
        Some(path) => FetchPolicy::load(path)?,
        None => FetchPolicy::default(),
    };
    policy.validate()?;

    let start_url = match &args.start_url {
        Some(raw) => validate_url(raw)?,
        None => args.platform.search_url(&args.query, &args.location)?,
    };
    let watch = args.watch.as_deref().map(WatchCriteria::load).transpose()?;
    let transport = HttpTransport::new(&policy)?;
    let fetcher = Fetcher::new(transport, ThreadSleep, policy);

    println!(
        "🔍 Scraping {} for '{}' in {}...\n",
        args.platform.source_label(),
        args.query,
        args.location
    );

    let outcome = scrape_listings(&fetcher, &args.platform, start_url.as_str(), args.max_pages);
    let listings = output::dedup_by_url(outcome.listings);
    println!(
        "📊 {} unique jobs from {} page(s) (stopped: {:?})",
        listings.len(),
        outcome.pages_fetched,
        outcome.stop
    );

    if let Some(criteria) = &watch {
        let mut ledger = SeenLedger::load(&args.output_dir.join(LEDGER_FILE))?;
        let fresh = ledger.check_new(criteria, &listings, Local::now())?;
        println!("🔔 {} new matching job(s)", fresh.len());
        for job in fresh {
            println!("   {} at {} ({}) {}", job.title, job.company, job.location, job.url);
        }
    }

    let analyzer = SentimentAnalyzer::new();
    let scored = analyzer.score_all(listings);

    let stem = output::output_stem(
        args.platform.name(),
        &args.query,
        &args.location,
        Local::now(),
    );
    let path = output::save(&scored, &args.output_dir, &stem, args.output_format)
        .with_context(|| format!("saving results to {}", args.output_dir.display()))?;
    println!("💾 Saved {} jobs to {:?}", scored.len(), path);

    let overall = company_sentiment(&scored);
    println!(
        "🧭 Overall sentiment: {} (positive {}, neutral {}, negative {})",
        overall.average_sentiment,
        overall.sentiment_distribution.positive,
        overall.sentiment_distribution.neutral,
        overall.sentiment_distribution.negative
    );

    if let Some(company) = &args.company {
        let summary = company_sentiment_for(&scored, company);
        println!(
            "🏢 {}: {} across {} posting(s)",
            company, summary.average_sentiment, summary.total_postings
        );
    }

    println!("\n✨ Scraping complete!");
    Ok(())
}
