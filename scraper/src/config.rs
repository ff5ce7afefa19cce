//! Fetch policy and configuration errors.
//!
//! Everything the fetch loop needs to know about pacing lives in
//! `FetchPolicy`, which is handed to the `Fetcher` explicitly. A policy can
//! be loaded from a TOML file where every key is optional:
//!
//! ```toml
//! max_attempts = 3
//! initial_backoff_secs = 5.0
//! min_delay_secs = 2.0
//! max_delay_secs = 5.0
//! timeout_secs = 30.0
//! rotate_user_agent = true
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised before any network activity starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid fetch policy: {0}")]
    InvalidPolicy(String),

    #[error("reading config from {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("building HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Upper bound for every seconds value in a policy (one day).
pub const MAX_SECS: f64 = 86_400.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchPolicy {
    /// Total attempts per URL, the first one included.
    pub max_attempts: u32,
    /// Wait after the first failed attempt; doubles after each further one.
    pub initial_backoff_secs: f64,
    /// Bounds of the random pause taken before every attempt.
    pub min_delay_secs: f64,
    pub max_delay_secs: f64,
    pub timeout_secs: f64,
    /// Pick a fresh browser user agent for each request.
    pub rotate_user_agent: bool,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_secs: 5.0,
            min_delay_secs: 2.0,
            max_delay_secs: 5.0,
            timeout_secs: 30.0,
            rotate_user_agent: true,
        }
    }
}

impl FetchPolicy {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let policy: FetchPolicy = toml::from_str(s)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidPolicy(
                "max_attempts must be at least 1".into(),
            ));
        }
        let secs = [
            ("initial_backoff_secs", self.initial_backoff_secs),
            ("min_delay_secs", self.min_delay_secs),
            ("max_delay_secs", self.max_delay_secs),
            ("timeout_secs", self.timeout_secs),
        ];
        for (name, value) in secs {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidPolicy(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
            if value > MAX_SECS {
                return Err(ConfigError::InvalidPolicy(format!(
                    "{name} must be at most {MAX_SECS} seconds, got {value}"
                )));
            }
        }
        if self.min_delay_secs > self.max_delay_secs {
            return Err(ConfigError::InvalidPolicy(format!(
                "min_delay_secs ({}) is greater than max_delay_secs ({})",
                self.min_delay_secs, self.max_delay_secs
            )));
        }
        if self.timeout_secs == 0.0 {
            return Err(ConfigError::InvalidPolicy("timeout_secs must be positive".into()));
        }
        // The backoff doubles after each failed attempt except the last.
        let doublings = self.max_attempts.saturating_sub(2).min(1024) as i32;
        let longest_backoff = self.initial_backoff_secs * 2f64.powi(doublings);
        if self.initial_backoff_secs > 0.0 && longest_backoff > MAX_SECS {
            return Err(ConfigError::InvalidPolicy(format!(
                "initial_backoff_secs {} doubled over {} attempts exceeds {MAX_SECS} seconds",
                self.initial_backoff_secs, self.max_attempts
            )));
        }
        Ok(())
    }

    /// Policy with every pause set to zero. Used by tests and dry runs.
    pub fn without_delays() -> Self {
        Self {
            initial_backoff_secs: 0.0,
            min_delay_secs: 0.0,
            max_delay_secs: 0.0,
            ..Self::default()
        }
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_secs_f64(self.initial_backoff_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }

    /// Uniform draw from `[min_delay_secs, max_delay_secs]`.
    pub fn politeness_delay(&self) -> Duration {
        if self.max_delay_secs <= self.min_delay_secs {
            return Duration::from_secs_f64(self.min_delay_secs);
        }
        let secs = rand::rng().random_range(self.min_delay_secs..=self.max_delay_secs);
        Duration::from_secs_f64(secs)
    }
}
