use async_trait::async_trait;

use crate::error::WriteError;
use crate::types::MergedFeed;

#[async_trait]
pub trait FeedSink: Send + Sync {
    /// Publish the merged feed, replacing whatever was published before
    async fn publish(&self, feed: &MergedFeed) -> Result<(), WriteError>;

    /// Human readable destination, used in log lines
    fn describe(&self) -> String;
}
