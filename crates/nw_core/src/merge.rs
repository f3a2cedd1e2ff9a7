use std::collections::HashSet;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::types::Item;

const SOURCE_MARKER: &str = "(Source:";

/// Identity of an item across feeds: guid, else link, else title + raw date.
pub fn dedup_key(item: &Item) -> String {
    let base = if !item.guid.is_empty() {
        item.guid.clone()
    } else if !item.link.is_empty() {
        item.link.clone()
    } else {
        format!("{}{}", item.title, item.raw_date)
    };
    format!("{:x}", Sha256::digest(base.as_bytes()))
}

/// Appends a `(Source: <label>)` marker unless one is already present.
pub fn annotate_description(description: &str, label: &str) -> String {
    let description = description.trim();
    if description.contains(SOURCE_MARKER) {
        return description.to_string();
    }
    if description.is_empty() {
        format!("{} {})", SOURCE_MARKER, label)
    } else {
        format!("{}\n{} {})", description, SOURCE_MARKER, label)
    }
}

/// Deduplicates, sorts newest-first and caps `items`, then annotates the survivors.
///
/// Items must be given in encounter order (configured feed order, then
/// document order): on a key collision the earliest item wins, and items with
/// equal timestamps keep their relative order.
pub fn merge(items: Vec<Item>, max_items: usize) -> Vec<Item> {
    let total = items.len();
    let mut seen = HashSet::new();
    let mut unique: Vec<Item> = items
        .into_iter()
        .filter(|item| seen.insert(dedup_key(item)))
        .collect();
    let duplicates = total - unique.len();

    // sort_by is stable, so ties keep encounter order
    unique.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    if unique.len() > max_items {
        debug!("Dropping {} items over the cap of {}", unique.len() - max_items, max_items);
        unique.truncate(max_items);
    }

    for item in &mut unique {
        item.description = annotate_description(&item.description, &item.source_label);
    }

    debug!("Merged {} items into {} ({} duplicates)", total, unique.len(), duplicates);
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn item(title: &str, link: &str, guid: &str, secs: i64, label: &str) -> Item {
        Item {
            title: title.to_string(),
            link: link.to_string(),
            published_at: at(secs),
            date_synthesized: false,
            raw_date: at(secs).to_rfc2822(),
            description: String::new(),
            guid: guid.to_string(),
            source_label: label.to_string(),
        }
    }

    #[test]
    fn test_dedup_keeps_first_encountered() {
        let items = vec![
            item("X", "http://a/1", "http://a/1", 0, "A"),
            item("X", "http://a/1", "http://a/1", 100, "B"),
        ];
        let merged = merge(items, 10);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source_label, "A");
        assert_eq!(merged[0].published_at, at(0));
    }

    #[test]
    fn test_dedup_key_falls_back_to_link_then_title_and_date() {
        let with_guid = item("T", "http://a/1", "g-1", 0, "A");
        let with_link = item("T", "http://a/1", "", 0, "A");
        let bare = item("T", "", "", 0, "A");

        assert_eq!(dedup_key(&with_link), dedup_key(&item("Other", "http://a/1", "", 5, "B")));
        assert_ne!(dedup_key(&with_guid), dedup_key(&with_link));
        assert_eq!(dedup_key(&bare), dedup_key(&item("T", "", "", 0, "B")));
        assert_ne!(dedup_key(&bare), dedup_key(&item("T", "", "", 1, "A")));
        assert_eq!(dedup_key(&bare).len(), 64);
    }

    #[test]
    fn test_sorts_newest_first() {
        let items = vec![
            item("old", "http://a/1", "", 0, "A"),
            item("new", "http://a/2", "", 300, "A"),
            item("mid", "http://a/3", "", 150, "A"),
        ];
        let merged = merge(items, 10);
        let titles: Vec<_> = merged.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "mid", "old"]);
        assert!(merged.windows(2).all(|w| w[0].published_at >= w[1].published_at));
    }

    #[test]
    fn test_equal_timestamps_keep_encounter_order() {
        let items = vec![
            item("first", "http://a/1", "", 10, "A"),
            item("second", "http://a/2", "", 10, "A"),
            item("third", "http://a/3", "", 10, "B"),
        ];
        let merged = merge(items, 10);
        let titles: Vec<_> = merged.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_caps_after_sorting() {
        let items: Vec<Item> = (0..25)
            .map(|i| item(&format!("item {}", i), &format!("http://a/{}", i), "", i, "A"))
            .collect();
        let merged = merge(items, 10);
        assert_eq!(merged.len(), 10);
        assert_eq!(merged[0].title, "item 24");
        assert_eq!(merged[9].title, "item 15");
    }

    #[test]
    fn test_annotation() {
        assert_eq!(annotate_description("", "GlobeNewswire"), "(Source: GlobeNewswire)");
        assert_eq!(
            annotate_description("  Body text ", "GlobeNewswire"),
            "Body text\n(Source: GlobeNewswire)"
        );
        assert_eq!(
            annotate_description("Body (Source: Other)", "GlobeNewswire"),
            "Body (Source: Other)"
        );
    }

    #[test]
    fn test_annotation_is_idempotent() {
        for desc in ["", "Body", "<p>Body</p>", "Body\n(Source: Wire)"] {
            let once = annotate_description(desc, "Wire");
            assert_eq!(annotate_description(&once, "Wire"), once);
        }
    }

    #[test]
    fn test_merge_annotates_survivors() {
        let mut first = item("X", "http://a/1", "", 0, "Wire");
        first.description = "Hello".to_string();
        let merged = merge(vec![first], 10);
        assert_eq!(merged[0].description, "Hello\n(Source: Wire)");

        let again = merge(merged.clone(), 10);
        assert_eq!(again, merged);
    }

    #[test]
    fn test_build_merged_feed() {
        let channel = crate::types::ChannelMeta {
            title: "T".to_string(),
            link: "http://example.com/rss.xml".to_string(),
            description: "D".to_string(),
        };
        let before = Utc::now() - Duration::seconds(1);
        let feed = crate::types::MergedFeed::build(
            channel,
            vec![item("a", "http://a/1", "", 0, "A"), item("a", "http://a/1", "", 0, "A")],
            5,
        );
        assert_eq!(feed.len(), 1);
        assert!(!feed.is_empty());
        assert!(feed.built_at >= before);
    }
}
