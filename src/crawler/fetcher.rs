//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - Gating every request through a shared counting permit pool
//! - Classifying failures so callers can degrade to "no data"
//!
//! A fetch never returns `Err`: transport failures and non-2xx statuses are
//! logged here and reported as a [`FetchResult`] variant. There is no retry.

use crate::config::Config;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// 2xx response with its body
    Success {
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Non-2xx response
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Transport failure (timeout, connection refused, body read error)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns the page body on success, `None` for every failure
    pub fn into_body(self) -> Option<String> {
        match self {
            Self::Success { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Builds an HTTP client with the configured user agent and timeout
///
/// # Example
///
/// ```no_run
/// use provider_harvest::crawler::build_http_client;
///
/// let client = build_http_client("Mozilla/5.0 (compatible)", 10).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs one GET and classifies the outcome
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: "Connection refused".to_string(),
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                }
            }
        }
    }
}

/// A cloneable fetcher sharing one client and one admission gate
///
/// Every clone draws from the same permit pool, so the number of in-flight
/// requests across all department crawls never exceeds the gate size.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    gate: Arc<Semaphore>,
}

impl Fetcher {
    /// Creates a fetcher from the crawler and site configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.site.user_agent, config.crawler.request_timeout_secs)?;
        Ok(Self::with_client(
            client,
            config.crawler.max_concurrent_requests as usize,
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, max_in_flight: usize) -> Self {
        Self {
            client,
            gate: Arc::new(Semaphore::new(max_in_flight)),
        }
    }

    /// Permits currently free in the admission gate
    pub fn available_permits(&self) -> usize {
        self.gate.available_permits()
    }

    /// Fetches a URL while holding a gate permit
    ///
    /// The permit is released when this call returns, whatever the outcome.
    /// Failures are logged at `warn`.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let _permit = match self.gate.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                return FetchResult::NetworkError {
                    error: "admission gate closed".to_string(),
                }
            }
        };

        tracing::debug!(url = %url, "Fetching");
        let result = fetch_url(&self.client, url).await;

        match &result {
            FetchResult::Success { status_code, body } => {
                tracing::debug!(url = %url, status = status_code, bytes = body.len(), "Fetched");
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!(url = %url, status = status_code, "Failed to fetch: HTTP error");
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!(url = %url, error = %error, "Failed to fetch");
            }
        }

        result
    }
}
