// Every outbound request goes through here. Connection errors, timeouts,
// non-2xx statuses and undecodable bodies all collapse to `None`; callers
// must treat every fetch as potentially empty and fall back.

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),

    #[error("body decode failed: {0}")]
    Decode(String),
}

#[derive(Debug, Clone)]
pub struct FetchGuard {
    client: Client,
}

impl FetchGuard {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config::FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// GET a JSON document. Returns `None` on any failure; never panics and
    /// never surfaces an error to the caller.
    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Option<Value> {
        match self.try_get_json(url, query).await {
            Ok(value) => {
                debug!(url, "fetched json");
                Some(value)
            }
            Err(e) => {
                warn!(url, error = %e, "fetch failed, treating as absent");
                metrics::counter!("coindash_fetch_failures").increment(1);
                None
            }
        }
    }

    /// GET a raw text body (RSS feeds are XML, not JSON). Same contract.
    pub async fn get_text(&self, url: &str) -> Option<String> {
        match self.try_get_text(url).await {
            Ok(body) => {
                debug!(url, bytes = body.len(), "fetched text");
                Some(body)
            }
            Err(e) => {
                warn!(url, error = %e, "fetch failed, treating as absent");
                metrics::counter!("coindash_fetch_failures").increment(1);
                None
            }
        }
    }

    async fn try_get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let resp = self.client.get(url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        resp.json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn try_get_text(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        resp.text()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}
