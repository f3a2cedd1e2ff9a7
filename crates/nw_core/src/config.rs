use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::{ChannelMeta, FeedSource};
use crate::{Error, Result};

pub const DEFAULT_OUTPUT_PATH: &str = "docs/rss.xml";
pub const DEFAULT_MAX_ITEMS: usize = 1000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

const FEED_URLS: &[&str] = &["https://rss.app/feeds/ONebqtvoXhDJAEzd.xml"];

/// Maps feed URLs containing `pattern` (case-insensitive) to `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRule {
    pub pattern: String,
    pub label: String,
}

impl LabelRule {
    pub fn new(pattern: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            label: label.into(),
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        url.to_lowercase().contains(&self.pattern.to_lowercase())
    }
}

/// Known press-release providers. The rss.app feed is a GlobeNewswire search export.
pub fn default_label_rules() -> Vec<LabelRule> {
    vec![
        LabelRule::new("globenewswire.com", "GlobeNewswire"),
        LabelRule::new("rss.app/feeds/ONebqtvoXhDJAEzd", "GlobeNewswire"),
        LabelRule::new("prnewswire.com", "PR Newswire"),
        LabelRule::new("businesswire.com", "Business Wire"),
        LabelRule::new("newsfilecorp.com", "Newsfile"),
        LabelRule::new("accessnewswire.com", "ACCESS Newswire"),
    ]
}

/// First matching rule wins; `default_label` otherwise.
pub fn resolve_label(url: &str, rules: &[LabelRule], default_label: &str) -> String {
    rules
        .iter()
        .find(|rule| rule.matches(url))
        .map(|rule| rule.label.clone())
        .unwrap_or_else(|| default_label.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub feeds: Vec<String>,
    pub labels: Vec<LabelRule>,
    pub default_label: String,
    pub channel: ChannelMeta,
    pub output_path: PathBuf,
    pub max_items: usize,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feeds: FEED_URLS.iter().map(|url| url.to_string()).collect(),
            labels: default_label_rules(),
            default_label: "Press Release".to_string(),
            channel: ChannelMeta {
                title: "Geomega — GlobeNewswire (Merged)".to_string(),
                link: "https://christiangomezstudio.github.io/geomega-rss/rss.xml".to_string(),
                description: "Merged GlobeNewswire items for Geomega (GitHub Pages build).".to_string(),
            },
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            max_items: DEFAULT_MAX_ITEMS,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Configured feeds with their resolved labels, in configured order.
    pub fn sources(&self) -> Vec<FeedSource> {
        self.feeds
            .iter()
            .map(|url| FeedSource::new(url.clone(), resolve_label(url, &self.labels, &self.default_label)))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.feeds.is_empty() {
            return Err(Error::Config("no feeds configured".to_string()));
        }
        if self.max_items == 0 {
            return Err(Error::Config("max_items must be greater than zero".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }
        for feed in &self.feeds {
            let url = Url::parse(feed).map_err(|e| Error::InvalidUrl(format!("{}: {}", feed, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::InvalidUrl(format!("{}: unsupported scheme", feed)));
            }
        }
        Ok(())
    }
}
