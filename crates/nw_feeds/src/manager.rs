use std::sync::Arc;

use futures::future::join_all;
use nw_core::{FeedFetcher, FeedSink, FeedSource, Item, MergedFeed, PipelineConfig, WriteError};
use serde::Serialize;
use tracing::{debug, info, warn, Instrument};

use crate::logging::feed_span;
use crate::parsers;

/// Outcome counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub feeds_total: usize,
    pub feeds_ok: usize,
    pub feeds_failed: usize,
    /// Fetched but yielded no items, unparseable documents included
    pub feeds_empty: usize,
    pub items_collected: usize,
    pub items_published: usize,
}

enum SourceOutcome {
    Items(Vec<Item>),
    Failed,
}

/// Runs fetch → normalize → merge for the configured feeds.
pub struct FeedManager {
    fetcher: Arc<dyn FeedFetcher>,
    config: PipelineConfig,
}

impl FeedManager {
    pub fn new(fetcher: Arc<dyn FeedFetcher>, config: PipelineConfig) -> Self {
        Self { fetcher, config }
    }

    async fn collect_source(&self, source: &FeedSource) -> SourceOutcome {
        debug!("Fetching {}", source.url);
        match self.fetcher.fetch(&source.url).await {
            Ok(body) => {
                let items = parsers::normalize(&body, &source.label);
                info!("📰 {} items from {}", items.len(), source.url);
                SourceOutcome::Items(items)
            }
            Err(e) => {
                warn!("⚠️ Skipping {}: {}", source.url, e);
                SourceOutcome::Failed
            }
        }
    }

    /// Fetches every configured feed concurrently and returns their items in
    /// configured feed order.
    pub async fn collect(&self) -> (Vec<Item>, RunReport) {
        let sources = self.config.sources();
        let total = sources.len();
        let outcomes = join_all(
            sources
                .iter()
                .enumerate()
                .map(|(i, source)| {
                    self.collect_source(source)
                        .instrument(feed_span(&source.label, i + 1, total))
                }),
        )
        .await;

        let mut report = RunReport {
            feeds_total: total,
            ..Default::default()
        };
        let mut items = Vec::new();
        for outcome in outcomes {
            match outcome {
                SourceOutcome::Items(found) => {
                    report.feeds_ok += 1;
                    if found.is_empty() {
                        report.feeds_empty += 1;
                    }
                    items.extend(found);
                }
                SourceOutcome::Failed => report.feeds_failed += 1,
            }
        }
        report.items_collected = items.len();
        (items, report)
    }

    pub async fn build(&self) -> (MergedFeed, RunReport) {
        let (items, report) = self.collect().await;
        let feed = MergedFeed::build(self.config.channel.clone(), items, self.config.max_items);
        (feed, report)
    }

    /// Full run. Per-feed failures are logged and skipped; only publishing can fail.
    pub async fn run(&self, sink: &dyn FeedSink) -> Result<RunReport, WriteError> {
        let (feed, mut report) = self.build().await;

        info!("📝 Publishing {} items to {}", feed.len(), sink.describe());
        sink.publish(&feed).await?;
        report.items_published = feed.len();

        info!(
            "✨ Done: {}/{} feeds fetched ({} failed, {} empty), {} items collected, {} published",
            report.feeds_ok,
            report.feeds_total,
            report.feeds_failed,
            report.feeds_empty,
            report.items_collected,
            report.items_published
        );
        Ok(report)
    }
}
