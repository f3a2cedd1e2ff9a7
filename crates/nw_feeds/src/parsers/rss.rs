use chrono::{DateTime, Utc};
use nw_core::Item;

use super::document::Element;
use super::{first_non_empty, EntryFields};

/// Extracts the items of an RSS document.
///
/// RSS 2.0 nests items directly under `channel`; RSS 1.0 puts them directly
/// under the root, next to the channel. Deeper `item` elements belong to
/// extensions and are not entries.
pub(crate) fn parse_rss(root: &Element, label: &str, now: DateTime<Utc>) -> Vec<Item> {
    root.children_local("channel")
        .flat_map(|channel| channel.children_local("item"))
        .chain(root.children_local("item"))
        .map(|item| {
            EntryFields {
                title: item.child_text("title"),
                link: item.child_text("link"),
                guid: item.child_text("guid"),
                description: item.child_text("description"),
                raw_date: first_non_empty([item.child_text("pubDate"), item.child_text("dc:date")]),
            }
            .into_item(label, now)
        })
        .collect()
}
