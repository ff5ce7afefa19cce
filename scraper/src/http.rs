//! Blocking reqwest transport with browser-like headers.

use rand::seq::IndexedRandom;
use reqwest::blocking::Client;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use reqwest::StatusCode;

use crate::config::{ConfigError, FetchPolicy};
use crate::fetch::{FetchOutcome, FetchRequest, Transport};

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.4; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
];

pub struct HttpTransport {
    client: Client,
    rotate_user_agent: bool,
}

impl HttpTransport {
    pub fn new(policy: &FetchPolicy) -> Result<Self, ConfigError> {
        let client = Client::builder().timeout(policy.timeout()).build()?;
        Ok(Self {
            client,
            rotate_user_agent: policy.rotate_user_agent,
        })
    }

    fn headers(&self) -> HeaderMap {
        let agent = if self.rotate_user_agent {
            random_user_agent()
        } else {
            USER_AGENTS[0]
        };

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(agent));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        headers
    }
}

impl Transport for HttpTransport {
    fn get(&self, request: &FetchRequest) -> FetchOutcome {
        let response = match self.client.get(&request.url).headers(self.headers()).send() {
            Ok(resp) => resp,
            Err(e) => return classify_send_error(&e),
        };

        if let Some(outcome) = classify_status(response.status()) {
            return outcome;
        }

        match response.text() {
            Ok(body) => FetchOutcome::Success(body),
            Err(e) => FetchOutcome::TransientError(format!("reading body: {e}")),
        }
    }
}

pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// `None` for 2xx, otherwise the outcome a status maps to.
///
/// 403 counts as rate limiting: the job boards answer throttled clients
/// with it more often than with 429.
pub fn classify_status(status: StatusCode) -> Option<FetchOutcome> {
    if status.is_success() {
        return None;
    }
    let outcome = match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::FORBIDDEN => FetchOutcome::RateLimited,
        StatusCode::REQUEST_TIMEOUT => FetchOutcome::TransientError(format!("HTTP {status}")),
        s if s.is_server_error() => FetchOutcome::TransientError(format!("HTTP {s}")),
        s => FetchOutcome::FatalError(format!("HTTP {s}")),
    };
    Some(outcome)
}

/// Builder errors (bad URL or scheme) and redirect loops fail the same way
/// on every attempt. Connection and timeout errors may not.
pub fn classify_send_error(err: &reqwest::Error) -> FetchOutcome {
    if err.is_builder() || err.is_redirect() {
        FetchOutcome::FatalError(err.to_string())
    } else {
        FetchOutcome::TransientError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttling_statuses_are_rate_limits() {
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            Some(FetchOutcome::RateLimited)
        );
        assert_eq!(classify_status(StatusCode::FORBIDDEN), Some(FetchOutcome::RateLimited));
    }

    #[test]
    fn server_errors_are_transient_and_client_errors_fatal() {
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY),
            Some(FetchOutcome::TransientError(_))
        ));
        assert!(matches!(
            classify_status(StatusCode::REQUEST_TIMEOUT),
            Some(FetchOutcome::TransientError(_))
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND),
            Some(FetchOutcome::FatalError(_))
        ));
        assert_eq!(classify_status(StatusCode::OK), None);
    }

    #[test]
    fn unsendable_urls_are_fatal() {
        let transport = HttpTransport::new(&FetchPolicy::default()).unwrap();
        for url in ["javascript:void(0)", "mailto:jobs@acme.test", "not a url"] {
            let outcome = transport.get(&FetchRequest {
                url: url.into(),
                attempt: 0,
            });
            assert!(
                matches!(outcome, FetchOutcome::FatalError(_)),
                "{url} gave {outcome:?}"
            );
        }
    }

    #[test]
    fn user_agent_comes_from_pool() {
        for _ in 0..20 {
            assert!(USER_AGENTS.contains(&random_user_agent()));
        }
    }

    #[test]
    fn headers_look_like_a_browser() {
        let transport = HttpTransport::new(&FetchPolicy::default()).unwrap();
        let headers = transport.headers();
        assert!(headers.get(USER_AGENT).is_some());
        assert_eq!(
            headers.get(ACCEPT_LANGUAGE).unwrap().to_str().unwrap(),
            "en-US,en;q=0.5"
        );
    }
}
