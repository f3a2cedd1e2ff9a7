use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use nw_core::PipelineConfig;
use nw_feeds::{init_logging, FeedManager, HttpFetcher};
use nw_storage::FileSink;
use tracing::{debug, info};

/// Merge the configured press-release feeds into a single RSS 2.0 file.
///
/// The feed list, channel metadata and output path are built in; the command
/// takes no options.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();
    init_logging();

    let config = PipelineConfig::default();
    config.validate().context("invalid built-in configuration")?;

    let sources = config.sources();
    info!(
        "🗞️ Merging {} feeds: {}",
        sources.len(),
        sources
            .iter()
            .map(|s| format!("{} ({})", s.label, s.url))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let fetcher = HttpFetcher::from_config(&config).context("failed to build HTTP client")?;
    let sink = FileSink::new(config.output_path.clone());
    let manager = FeedManager::new(Arc::new(fetcher), config);

    let report = manager
        .run(&sink)
        .await
        .with_context(|| format!("failed to write {}", sink.path().display()))?;

    debug!("Run report: {}", serde_json::to_string(&report)?);
    Ok(())
}
