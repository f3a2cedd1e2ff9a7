use std::sync::Arc;

use async_trait::async_trait;
use nw_core::{FeedSink, MergedFeed, WriteError};
use tokio::sync::RwLock;

use crate::serializer::render_rss;

/// Keeps the last rendered document in memory instead of on disk.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    document: Arc<RwLock<Option<Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contents(&self) -> Option<String> {
        let document = self.document.read().await;
        document
            .as_ref()
            .map(|bytes| String::from_utf8_lossy(bytes).to_string())
    }
}

#[async_trait]
impl FeedSink for MemorySink {
    async fn publish(&self, feed: &MergedFeed) -> Result<(), WriteError> {
        let bytes = render_rss(feed)?;
        *self.document.write().await = Some(bytes);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory://".to_string()
    }
}
