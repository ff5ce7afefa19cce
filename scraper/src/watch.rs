//! Watch lists: flag listings that match saved criteria and have not been
//! reported before.
//!
//! Criteria come from a TOML file:
//!
//! ```toml
//! keywords = ["rust", "embedded"]
//! locations = ["remote"]
//! companies = ["ferrous"]
//! ```
//!
//! Reported URLs are kept in a JSON ledger (`last_notified.json` in the
//! output directory) mapping each URL to the time it was first reported.

use chrono::{DateTime, Local};
use common::ListingRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ConfigError;

pub const LEDGER_FILE: &str = "last_notified.json";

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("accessing ledger {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ledger {} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchCriteria {
    /// Matched against title and description.
    pub keywords: Vec<String>,
    pub locations: Vec<String>,
    pub companies: Vec<String>,
}

impl WatchCriteria {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Case-insensitive substring match on any single criterion. Empty
    /// criteria match nothing.
    pub fn matches(&self, listing: &ListingRecord) -> bool {
        let title = listing.title.to_lowercase();
        let description = listing.description.to_lowercase();
        let location = listing.location.to_lowercase();
        let company = listing.company.to_lowercase();

        let hit = |needles: &[String], haystacks: &[&str]| {
            needles.iter().any(|needle| {
                let needle = needle.trim().to_lowercase();
                !needle.is_empty() && haystacks.iter().any(|h| h.contains(&needle))
            })
        };

        hit(&self.keywords, &[title.as_str(), description.as_str()])
            || hit(&self.locations, &[location.as_str()])
            || hit(&self.companies, &[company.as_str()])
    }
}

#[derive(Debug)]
pub struct SeenLedger {
    path: PathBuf,
    seen: BTreeMap<String, String>,
}

impl SeenLedger {
    /// Opens the ledger at `path`. A missing file is an empty ledger.
    pub fn load(path: &Path) -> Result<Self, WatchError> {
        let seen = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| WatchError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(WatchError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            seen,
        })
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Returns the listings that match `criteria` and are not in the ledger
    /// yet, and records them at `now`. Listings without a URL are skipped.
    /// The ledger is written back only when something new was found.
    pub fn check_new<'a>(
        &mut self,
        criteria: &WatchCriteria,
        listings: &'a [ListingRecord],
        now: DateTime<Local>,
    ) -> Result<Vec<&'a ListingRecord>, WatchError> {
        let stamp = now.to_rfc3339();
        let mut fresh = Vec::new();
        for listing in listings {
            if listing.url.is_empty() || self.contains(&listing.url) {
                continue;
            }
            if criteria.matches(listing) {
                self.seen.insert(listing.url.clone(), stamp.clone());
                fresh.push(listing);
            }
        }
        debug!(checked = listings.len(), new = fresh.len(), "watch list checked");

        if !fresh.is_empty() {
            self.save()?;
        }
        Ok(fresh)
    }

    pub fn save(&self) -> Result<(), WatchError> {
        let io_err = |source| WatchError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.seen).map_err(|source| WatchError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_err)?;
        info!(path = %self.path.display(), entries = self.seen.len(), "saved watch ledger");
        Ok(())
    }
}
