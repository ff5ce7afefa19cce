//! Job board scraper.
//!
//! `Fetcher` owns the retry/backoff policy for a single URL,
//! `scrape_listings` walks search pages and detail pages with it, and the
//! `extract` module knows each board's markup.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod output;
pub mod paginate;
pub mod watch;

pub use config::{ConfigError, FetchPolicy};
pub use extract::{Platform, SiteExtractor};
pub use fetch::{
    FetchError, FetchOutcome, FetchRequest, Fetcher, Pause, RecordingSleep, Sleep, ThreadSleep,
    Transport,
};
pub use http::HttpTransport;
pub use paginate::{scrape_listings, ScrapeOutcome, StopReason};
pub use watch::{SeenLedger, WatchCriteria};
