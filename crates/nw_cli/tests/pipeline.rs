use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use nw_core::{FeedFetcher, FetchError, LabelRule, PipelineConfig};
use nw_feeds::{parse_feed, FeedFormat, FeedManager};
use nw_storage::{FileSink, MemorySink};

struct StaticFetcher(HashMap<String, String>);

#[async_trait]
impl FeedFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.0.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 500,
        })
    }
}

const GLOBE: &str = "https://www.globenewswire.com/RssFeed/orgclass/1/organization/geomega";
const NEWSFILE: &str = "https://feeds.newsfilecorp.com/company/geomega";
const BROKEN: &str = "https://www.prnewswire.com/rss/broken.rss";
const DOWN: &str = "https://www.businesswire.com/rss/down.xml";

const GLOBE_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Globe</title>
  <item>
    <title>Geomega closes financing</title>
    <link>http://a/1</link>
    <guid>http://a/1</guid>
    <pubDate>Tue, 07 Oct 2025 12:00:00 GMT</pubDate>
    <description>&lt;p&gt;Financing &amp; more&lt;/p&gt;</description>
  </item>
  <item>
    <title>Geomega AGM results</title>
    <link>http://a/2</link>
    <pubDate>Fri, 03 Oct 2025 12:00:00 GMT</pubDate>
  </item>
</channel></rss>"#;

const NEWSFILE_BODY: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title>Geomega closes financing</title>
    <link href="http://a/1"/>
    <id>http://a/1</id>
    <updated>2025-10-08T12:00:00Z</updated>
  </entry>
  <entry>
    <title>Geomega pilot plant update</title>
    <link href="http://b/7"/>
    <published>2025-10-05T12:00:00Z</published>
    <summary>Pilot plant</summary>
  </entry>
</feed>"#;

fn config(output: std::path::PathBuf) -> PipelineConfig {
    PipelineConfig {
        feeds: [GLOBE, BROKEN, NEWSFILE, DOWN].iter().map(|f| f.to_string()).collect(),
        output_path: output,
        ..PipelineConfig::default()
    }
}

fn fetcher() -> Arc<StaticFetcher> {
    Arc::new(StaticFetcher(
        [
            (GLOBE, GLOBE_BODY),
            (NEWSFILE, NEWSFILE_BODY),
            (BROKEN, "<rss><channel><item><title>cut off"),
        ]
        .iter()
        .map(|(url, body)| (url.to_string(), body.to_string()))
        .collect(),
    ))
}

#[tokio::test]
async fn merges_feeds_into_rss_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("docs").join("rss.xml");
    let config = config(output.clone());
    assert!(config.validate().is_ok());

    let manager = FeedManager::new(fetcher(), config);
    let report = manager.run(&FileSink::new(&output)).await.unwrap();
    assert_eq!(report.feeds_total, 4);
    assert_eq!(report.feeds_failed, 1);
    assert_eq!(report.feeds_empty, 1);
    assert_eq!(report.items_collected, 4);
    assert_eq!(report.items_published, 3);

    let xml = std::fs::read_to_string(&output).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<lastBuildDate>"));

    let (format, items) = parse_feed(&xml, "Merged").unwrap();
    assert_eq!(format, FeedFormat::Rss);

    let links: Vec<_> = items.iter().map(|i| i.link.as_str()).collect();
    assert_eq!(links, vec!["http://a/1", "http://b/7", "http://a/2"]);

    let financing = &items[0];
    assert_eq!(
        financing.published_at,
        DateTime::parse_from_rfc2822("Tue, 07 Oct 2025 12:00:00 GMT").unwrap()
    );
    assert_eq!(financing.description, "<p>Financing & more</p>\n(Source: GlobeNewswire)");
    assert_eq!(items[1].description, "Pilot plant\n(Source: Newsfile)");
    assert_eq!(items[2].description, "(Source: GlobeNewswire)");
    assert!(items.windows(2).all(|w| w[0].published_at >= w[1].published_at));
}

#[tokio::test]
async fn republishing_output_does_not_double_annotate() {
    let sink = MemorySink::new();
    let manager = FeedManager::new(fetcher(), config("unused.xml".into()));
    manager.run(&sink).await.unwrap();
    let first = sink.contents().await.unwrap();

    // feed the merged output back in as the only source
    let merged_url = "https://example.github.io/rss.xml";
    let fetcher = Arc::new(StaticFetcher(HashMap::from([(merged_url.to_string(), first.clone())])));
    let config = PipelineConfig {
        feeds: vec![merged_url.to_string()],
        labels: vec![LabelRule::new("github.io", "Mirror")],
        ..PipelineConfig::default()
    };
    let again = MemorySink::new();
    FeedManager::new(fetcher, config).run(&again).await.unwrap();
    let second = again.contents().await.unwrap();

    let (_, before) = parse_feed(&first, "x").unwrap();
    let (_, after) = parse_feed(&second, "x").unwrap();
    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(after.iter()) {
        assert_eq!(a.link, b.link);
        assert_eq!(a.guid, b.guid);
        assert_eq!(a.published_at, b.published_at);
        assert_eq!(a.description, b.description);
    }
    assert!(!second.contains("Mirror"));
}
