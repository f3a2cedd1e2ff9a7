use std::time::Duration;

use async_trait::async_trait;
use nw_core::{FeedFetcher, FetchError, PipelineConfig};
use reqwest::Client;

/// Fetches feed documents over HTTP with a shared client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, FetchError> {
        Self::new(config.timeout, &config.user_agent)
    }

    /// Create a new HttpFetcher with a custom reqwest Client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("Fetching feed from: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        tracing::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
