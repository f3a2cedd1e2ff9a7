pub mod config;
pub mod error;
pub mod fetch;
pub mod merge;
pub mod storage;
pub mod types;

pub use config::{LabelRule, PipelineConfig};
pub use error::{Error, FetchError, ParseError, Result, WriteError};
pub use fetch::FeedFetcher;
pub use storage::FeedSink;
pub use types::{ChannelMeta, FeedSource, Item, MergedFeed};
