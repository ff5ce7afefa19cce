//! Per-site extraction of listings from search and detail pages.
//!
//! Extraction is pure: the same markup always yields the same fields, and a
//! selector that matches nothing leaves its field as an empty string.

mod indeed;
mod linkedin;

use common::ListingRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::config::ConfigError;

/// What the pagination loop needs from a job board.
pub trait SiteExtractor {
    /// Listing stubs (title/company/location/url) from a search page.
    fn extract_listing_stubs(&self, page: &Html) -> Vec<ListingRecord>;

    /// Full fields from a listing's detail page.
    fn extract_details(&self, page: &Html, url: &str) -> ListingRecord;

    /// Absolute URL of the next search page, if the page links one.
    fn next_page_url(&self, page: &Html) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Indeed,
    LinkedIn,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Indeed, Platform::LinkedIn];

    /// Lower-case identifier used on the command line and in file names.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Indeed => "indeed",
            Platform::LinkedIn => "linkedin",
        }
    }

    /// Value stored in `ListingRecord::source`.
    pub fn source_label(&self) -> &'static str {
        match self {
            Platform::Indeed => "Indeed",
            Platform::LinkedIn => "LinkedIn",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Platform::Indeed => indeed::BASE_URL,
            Platform::LinkedIn => linkedin::BASE_URL,
        }
    }

    /// First search page for `query` in `location`.
    pub fn search_url(&self, query: &str, location: &str) -> Result<Url, ConfigError> {
        let (path, params) = match self {
            Platform::Indeed => ("/jobs", [("q", query), ("l", location)]),
            Platform::LinkedIn => (
                "/jobs/search/",
                [("keywords", query), ("location", location)],
            ),
        };
        let raw = format!("{}{}", self.base_url(), path);
        let url = Url::parse_with_params(&raw, params).map_err(|e| ConfigError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        validate_url(url.as_str())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| ConfigError::UnsupportedPlatform(s.to_string()))
    }
}

impl SiteExtractor for Platform {
    fn extract_listing_stubs(&self, page: &Html) -> Vec<ListingRecord> {
        match self {
            Platform::Indeed => indeed::listing_stubs(page),
            Platform::LinkedIn => linkedin::listing_stubs(page),
        }
    }

    fn extract_details(&self, page: &Html, url: &str) -> ListingRecord {
        match self {
            Platform::Indeed => indeed::details(page, url),
            Platform::LinkedIn => linkedin::details(page, url),
        }
    }

    fn next_page_url(&self, page: &Html) -> Option<String> {
        match self {
            Platform::Indeed => indeed::next_page(page),
            Platform::LinkedIn => linkedin::next_page(page),
        }
    }
}

/// Accepts only absolute http(s) URLs with a host.
pub fn validate_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(url)
}

/// Collapses whitespace runs to one space and trims.
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<Vec<_>>().join(" "))
}

pub(crate) fn first_text(scope: ElementRef<'_>, sel: &Selector) -> String {
    scope.select(sel).next().map(text_of).unwrap_or_default()
}

pub(crate) fn first_attr<'a>(scope: ElementRef<'a>, sel: &Selector, attr: &str) -> Option<&'a str> {
    scope.select(sel).find_map(|el| el.value().attr(attr))
}

/// Resolves `href` against `base`. Links that do not end up http(s) are dropped.
pub(crate) fn resolve(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let url = Url::parse(base).ok()?.join(href).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.into())
}

static SALARY_RE: Lazy<Regex> = Lazy::new(|| {
    // "50,000", "60000", "120.5k"
    Regex::new(r"(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)\s*([kK]\b)?").expect("valid salary regex")
});

/// Extracts the minimum salary from a raw salary string.
/// Returns the first number that looks like a yearly amount (at least 1000).
pub fn extract_salary(salary_raw: &str) -> Option<i64> {
    for cap in SALARY_RE.captures_iter(salary_raw) {
        let clean_number: String = cap[1].chars().filter(|c| *c != ',').collect();
        let Ok(mut value) = clean_number.parse::<f64>() else {
            continue;
        };
        if cap.get(2).is_some() {
            value *= 1000.0;
        }
        // Hourly rates and years of experience fall below this
        if value >= 1000.0 {
            return Some(value.round() as i64);
        }
    }
    None
}

/// Guesses employment type from the job title.
pub fn infer_job_type(title: &str) -> &'static str {
    let title = title.to_lowercase();
    if title.contains("contract") {
        "Contract"
    } else if title.contains("part-time") || title.contains("part time") {
        "Part-time"
    } else if title.contains("intern") {
        "Internship"
    } else if title.contains("temporary") {
        "Temporary"
    } else {
        "Full-time"
    }
}

/// Fills derived fields once stub and details are merged.
pub fn finalize(record: &mut ListingRecord) {
    if record.salary_min.is_none() {
        record.salary_min = extract_salary(&record.salary);
    }
    if record.job_type.is_empty() && !record.title.is_empty() {
        record.job_type = infer_job_type(&record.title).to_string();
    }
}
