use crate::config::FETCH_TIMEOUT;
use crate::error::UpstreamError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Source of the raw, category-nested stream schedule.
#[async_trait]
pub trait StreamSource: Send + Sync {
    async fn fetch(&self) -> Result<Value, UpstreamError>;
}

/// HTTP client for the upstream schedule API. One GET per call, no retries.
pub struct ScheduleApi {
    client: Client,
    url: String,
}

impl ScheduleApi {
    pub fn new(url: impl Into<String>) -> Result<Self, UpstreamError> {
        Self::with_timeout(url, FETCH_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl StreamSource for ScheduleApi {
    async fn fetch(&self) -> Result<Value, UpstreamError> {
        debug!("Sending request to {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = response.bytes().await?;
        let json: Value = serde_json::from_slice(&body)?;
        debug!("Received {} bytes of schedule data", body.len());
        Ok(json)
    }
}
