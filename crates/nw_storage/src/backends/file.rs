use std::path::{Path, PathBuf};

use async_trait::async_trait;
use nw_core::{FeedSink, MergedFeed, WriteError};
use tracing::debug;

use crate::serializer::render_rss;

/// Writes the rendered feed to a file through a sibling temporary file, so a
/// failed run never leaves a half-written document behind.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "rss.xml".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl FeedSink for FileSink {
    async fn publish(&self, feed: &MergedFeed) -> Result<(), WriteError> {
        let bytes = render_rss(feed)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let temp = self.temp_path();
        if let Err(source) = tokio::fs::write(&temp, &bytes).await {
            // a short write can leave a partial temp file
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(WriteError::Write { path: temp, source });
        }

        if let Err(source) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(WriteError::Write {
                path: self.path.clone(),
                source,
            });
        }

        debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
