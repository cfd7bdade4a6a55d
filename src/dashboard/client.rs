use crate::types::health::HealthReport;
use crate::types::welcome::WelcomeMessage;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const WELCOME_PATH: &str = "/api";
pub const HEALTH_PATH: &str = "/health";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request { url: Url, source: reqwest::Error },
    #[error("{url} returned non-success status: {status}")]
    BadStatus { url: Url, status: StatusCode },
    #[error("failed to decode response from {url}: {source}")]
    Decode { url: Url, source: reqwest::Error },
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid backend URL {0:?}")]
    InvalidBaseUrl(String),
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Thin client for the two backend endpoints. Both paths are resolved
/// against the backend root, the same routing the browser dev proxy applies.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| ClientError::InvalidBaseUrl(base_url.to_string()))?;
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn fetch_welcome(&self) -> Result<WelcomeMessage, FetchError> {
        self.get_json(WELCOME_PATH).await
    }

    pub async fn fetch_health(&self) -> Result<HealthReport, FetchError> {
        self.get_json(HEALTH_PATH).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let mut url = self.base_url.clone();
        url.set_path(path);

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus { url, status });
        }

        response
            .json()
            .await
            .map_err(|source| FetchError::Decode { url, source })
    }
}
