use tracing::{Level, Span};

/// Span wrapping all work on one feed. Lines logged inside it carry the
/// source label and the feed's position in the run, e.g.
/// `feed{label=GlobeNewswire position=1 total=3}`.
pub fn feed_span(label: &str, position: usize, total: usize) -> Span {
    tracing::info_span!("feed", label = %label, position, total)
}

/// Installs the fmt subscriber at `INFO`. Later calls, or a subscriber set by
/// the embedding program, leave the existing one in place.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .try_init();
}
