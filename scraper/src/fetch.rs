//! Single-page fetch with retry and exponential backoff.

use std::cell::RefCell;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::FetchPolicy;

/// One HTTP call. `attempt` starts at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub attempt: u32,
}

/// What a transport saw for exactly one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(String),
    RateLimited,
    TransientError(String),
    FatalError(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("giving up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: String,
    },

    #[error("fatal error fetching {url}: {reason}")]
    Fatal { url: String, reason: String },
}

pub trait Transport {
    fn get(&self, request: &FetchRequest) -> FetchOutcome;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, request: &FetchRequest) -> FetchOutcome {
        (**self).get(request)
    }
}

/// Why the fetcher is pausing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Random delay taken before every attempt.
    Politeness,
    /// Wait after failed attempt number `attempt` (0-based).
    Backoff { attempt: u32 },
}

pub trait Sleep {
    fn sleep(&self, pause: Pause, duration: Duration);
}

impl<S: Sleep + ?Sized> Sleep for &S {
    fn sleep(&self, pause: Pause, duration: Duration) {
        (**self).sleep(pause, duration)
    }
}

/// Blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
    fn sleep(&self, _pause: Pause, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Records pauses instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingSleep {
    pauses: RefCell<Vec<(Pause, Duration)>>,
}

impl RecordingSleep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<(Pause, Duration)> {
        self.pauses.borrow().clone()
    }

    /// Durations of the backoff pauses only, in order.
    pub fn backoffs(&self) -> Vec<Duration> {
        self.pauses
            .borrow()
            .iter()
            .filter(|(p, _)| matches!(p, Pause::Backoff { .. }))
            .map(|(_, d)| *d)
            .collect()
    }
}

impl Sleep for RecordingSleep {
    fn sleep(&self, pause: Pause, duration: Duration) {
        self.pauses.borrow_mut().push((pause, duration));
    }
}

pub struct Fetcher<T, S> {
    transport: T,
    sleeper: S,
    policy: FetchPolicy,
}

impl<T: Transport, S: Sleep> Fetcher<T, S> {
    pub fn new(transport: T, sleeper: S, policy: FetchPolicy) -> Self {
        Self {
            transport,
            sleeper,
            policy,
        }
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Fetches `url`, retrying rate limits and transient failures.
    ///
    /// Every attempt is preceded by a politeness pause. After a retryable
    /// failure the fetcher waits `backoff` and doubles it, except after the
    /// final attempt. A fatal outcome stops at once. Failures are always
    /// returned as errors, never as an empty body.
    pub fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut backoff = self.policy.initial_backoff();
        let mut last = String::new();

        for attempt in 0..max_attempts {
            self.sleeper
                .sleep(Pause::Politeness, self.policy.politeness_delay());

            let request = FetchRequest {
                url: url.to_string(),
                attempt,
            };
            match self.transport.get(&request) {
                FetchOutcome::Success(body) => {
                    debug!(url, attempt, bytes = body.len(), "fetched");
                    return Ok(body);
                }
                FetchOutcome::RateLimited => {
                    warn!(url, attempt = attempt + 1, max_attempts, "rate limited");
                    last = "rate limited".to_string();
                }
                FetchOutcome::TransientError(reason) => {
                    warn!(url, attempt = attempt + 1, max_attempts, %reason, "request failed");
                    last = reason;
                }
                FetchOutcome::FatalError(reason) => {
                    return Err(FetchError::Fatal {
                        url: url.to_string(),
                        reason,
                    });
                }
            }

            if attempt + 1 < max_attempts {
                debug!(url, wait_secs = backoff.as_secs_f64(), "backing off");
                self.sleeper.sleep(Pause::Backoff { attempt }, backoff);
                backoff *= 2;
            }
        }

        Err(FetchError::RetriesExhausted {
            url: url.to_string(),
            attempts: max_attempts,
            last,
        })
    }
}
