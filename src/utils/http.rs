// src/utils/http.rs

//! HTTP client utilities.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::Result;
use crate::models::CrawlerConfig;

/// Why a fetch produced no page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    Timeout,
    Status(u16),
    Network(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Timeout => f.write_str("request timed out"),
            FetchFailure::Status(code) => write!(f, "HTTP status {code}"),
            FetchFailure::Network(message) => f.write_str(message),
        }
    }
}

/// Classified result of fetching one solve page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(String),
    NotFound,
    RateLimited,
    Failed(FetchFailure),
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Solve page URL for an ID.
pub fn solve_url(base_url: &str, id: u64) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), id)
}

/// [`PageFetcher`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self::new(create_async_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => return FetchOutcome::Failed(map_reqwest_error(err)),
        };

        match response.status() {
            StatusCode::NOT_FOUND => FetchOutcome::NotFound,
            StatusCode::TOO_MANY_REQUESTS => FetchOutcome::RateLimited,
            status if status.is_success() => match response.text().await {
                Ok(body) => FetchOutcome::Success(body),
                Err(err) => FetchOutcome::Failed(map_reqwest_error(err)),
            },
            status => FetchOutcome::Failed(FetchFailure::Status(status.as_u16())),
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchFailure {
    if err.is_timeout() {
        return FetchFailure::Timeout;
    }
    FetchFailure::Network(err.to_string())
}
