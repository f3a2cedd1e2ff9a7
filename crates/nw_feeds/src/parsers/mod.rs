use chrono::{DateTime, Utc};
use nw_core::{Item, ParseError};

mod atom;
pub mod date;
pub(crate) mod document;
mod rss;

use document::Element;

/// Shape of a feed document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Rss,
    Atom,
}

impl FeedFormat {
    /// RSS when the root holds a `channel`; Atom is the fallback for everything else.
    pub(crate) fn detect(root: &Element) -> Self {
        if root.child_local("channel").is_some() {
            FeedFormat::Rss
        } else {
            FeedFormat::Atom
        }
    }
}

/// Fields pulled out of one RSS item or Atom entry, already trimmed.
#[derive(Debug, Default)]
pub(crate) struct EntryFields {
    pub title: String,
    pub link: String,
    pub guid: String,
    pub description: String,
    pub raw_date: String,
}

impl EntryFields {
    pub(crate) fn into_item(self, label: &str, now: DateTime<Utc>) -> Item {
        let (published_at, date_synthesized) = date::resolve_published(&self.raw_date, now);

        let guid = if !self.guid.is_empty() {
            self.guid
        } else if !self.link.is_empty() {
            self.link.clone()
        } else {
            format!("{}{}", self.title, self.raw_date)
        };
        let title = if self.title.is_empty() {
            self.link.clone()
        } else {
            self.title
        };

        Item {
            title,
            link: self.link,
            published_at,
            date_synthesized,
            raw_date: self.raw_date,
            description: self.description,
            guid,
            source_label: label.to_string(),
        }
    }
}

/// First non-empty value, or an empty string
pub(crate) fn first_non_empty<const N: usize>(values: [String; N]) -> String {
    values.into_iter().find(|v| !v.is_empty()).unwrap_or_default()
}

/// Parses a feed document, using `now` for entries without a usable date.
pub fn parse_feed_at(xml: &str, label: &str, now: DateTime<Utc>) -> Result<(FeedFormat, Vec<Item>), ParseError> {
    let root = document::parse_document(xml)?;
    let format = FeedFormat::detect(&root);
    let items = match format {
        FeedFormat::Rss => rss::parse_rss(&root, label, now),
        FeedFormat::Atom => atom::parse_atom(&root, label, now),
    };
    Ok((format, items))
}

pub fn parse_feed(xml: &str, label: &str) -> Result<(FeedFormat, Vec<Item>), ParseError> {
    parse_feed_at(xml, label, Utc::now())
}

/// Tolerant entry point: a document that cannot be parsed yields no items.
pub fn normalize(xml: &str, label: &str) -> Vec<Item> {
    match parse_feed(xml, label) {
        Ok((format, items)) => {
            let synthesized = items.iter().filter(|i| i.date_synthesized).count();
            if synthesized > 0 {
                tracing::debug!(
                    "{} of {} entries had no usable date, using current time",
                    synthesized,
                    items.len()
                );
            }
            tracing::debug!("Parsed {} entries as {:?}", items.len(), format);
            items
        }
        Err(e) => {
            tracing::warn!("Skipping unparseable feed: {}", e);
            Vec::new()
        }
    }
}
