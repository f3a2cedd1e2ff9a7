use chrono::{DateTime, Utc};
use nw_core::Item;

use super::document::Element;
use super::{first_non_empty, EntryFields};

/// The entry's web link: `rel="alternate"` or no rel at all, else the first link.
fn entry_link(entry: &Element) -> String {
    let mut links = entry.children_local("link");
    let alternate = entry
        .children_local("link")
        .find(|link| matches!(link.attr("rel"), None | Some("alternate")));

    alternate
        .or_else(|| links.next())
        .and_then(|link| link.attr("href"))
        .map(|href| href.trim().to_string())
        .unwrap_or_default()
}

pub(crate) fn parse_atom(root: &Element, label: &str, now: DateTime<Utc>) -> Vec<Item> {
    root.descendants_local("entry")
        .into_iter()
        .map(|entry| {
            let content = entry
                .child_local("content")
                .map(Element::deep_text)
                .unwrap_or_default();

            EntryFields {
                title: entry.child_local_text("title"),
                link: entry_link(entry),
                guid: entry.child_local_text("id"),
                description: first_non_empty([entry.child_local_text("summary"), content]),
                raw_date: first_non_empty([
                    entry.child_local_text("published"),
                    entry.child_local_text("updated"),
                ]),
            }
            .into_item(label, now)
        })
        .collect()
}
