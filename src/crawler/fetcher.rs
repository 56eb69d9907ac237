//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests with bodies decoded as UTF-8 regardless of headers
//! - Retry with capped exponential backoff for transient failures
//! - Classification of 404 as a distinct, non-retryable outcome

use crate::config::FetchConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Why a fetch gave up
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The server answered with a success status
    Page {
        /// HTTP status code
        status: u16,
        /// Page body decoded as UTF-8
        body: String,
        /// Final URL after redirects
        final_url: String,
    },

    /// The server answered 404
    NotFound,

    /// Retries were exhausted
    Failed {
        /// Last HTTP status seen, if any
        status: Option<u16>,
        /// What went wrong on the last attempt
        error: FetchError,
    },
}

impl FetchOutcome {
    /// Body of a fetched page, if the fetch succeeded
    pub fn into_body(self) -> Option<String> {
        match self {
            Self::Page { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Source of page bodies
///
/// The coordinator only talks to this trait, so tests can swap the network
/// out for canned responses.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one URL, retrying as configured
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use khabargir::config::FetchConfig;
/// use khabargir::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Delay before retry number `attempt` (0-based)
///
/// Doubles from `retry_delay_ms` and never exceeds `max_backoff_ms`.
pub fn backoff_delay(config: &FetchConfig, attempt: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    let delay = config.retry_delay_ms.saturating_mul(factor);
    Duration::from_millis(delay.min(config.max_backoff_ms))
}

/// reqwest-backed page fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from the configuration
    pub fn new(config: FetchConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    async fn fetch_once(&self, url: &str) -> Attempt {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Attempt::Retry(None, classify_error(&e)),
        };

        let status = response.status();
        let final_url = response.url().to_string();

        if status == StatusCode::NOT_FOUND {
            return Attempt::Done(FetchOutcome::NotFound);
        }

        if !status.is_success() {
            return Attempt::Retry(Some(status.as_u16()), FetchError::Status(status.as_u16()));
        }

        // Sites mislabel their charset often enough that headers are ignored
        match response.bytes().await {
            Ok(bytes) => Attempt::Done(FetchOutcome::Page {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
                final_url,
            }),
            Err(e) => Attempt::Retry(Some(status.as_u16()), classify_error(&e)),
        }
    }
}

enum Attempt {
    Done(FetchOutcome),
    Retry(Option<u16>, FetchError),
}

fn classify_error(e: &reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Connect(e.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Attempt::Done(outcome) => return outcome,
                Attempt::Retry(status, error) => {
                    if attempt >= self.config.max_retries {
                        tracing::debug!("Giving up on {} after {} attempts: {}", url, attempt + 1, error);
                        return FetchOutcome::Failed { status, error };
                    }
                    let delay = backoff_delay(&self.config, attempt);
                    tracing::debug!("Retrying {} in {:?}: {}", url, delay, error);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
