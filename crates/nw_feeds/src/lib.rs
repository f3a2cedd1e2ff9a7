pub mod fetcher;
pub mod logging;
pub mod manager;
pub mod parsers;

pub use fetcher::HttpFetcher;
pub use logging::{feed_span, init_logging};
pub use manager::{FeedManager, RunReport};
pub use parsers::{normalize, parse_feed, FeedFormat};

