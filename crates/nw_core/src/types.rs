use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::merge;

/// A configured feed URL together with the label shown next to its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub url: String,
    pub label: String,
}

impl FeedSource {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
    /// Set when the feed carried no usable date and `published_at` is the parse time.
    pub date_synthesized: bool,
    /// Date text as it appeared in the feed, empty when absent.
    pub raw_date: String,
    pub description: String,
    pub guid: String,
    pub source_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMeta {
    pub title: String,
    pub link: String,
    pub description: String,
}

/// The deduplicated, newest-first item list that gets published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedFeed {
    pub channel: ChannelMeta,
    pub built_at: DateTime<Utc>,
    pub items: Vec<Item>,
}

impl MergedFeed {
    /// Merges `items` (in encounter order) and stamps the build time.
    pub fn build(channel: ChannelMeta, items: Vec<Item>, max_items: usize) -> Self {
        Self {
            channel,
            built_at: Utc::now(),
            items: merge::merge(items, max_items),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
