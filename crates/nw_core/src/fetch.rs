use async_trait::async_trait;

use crate::error::FetchError;

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Retrieve the raw feed document at `url`
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
