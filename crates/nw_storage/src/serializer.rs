use std::io::Write;

use chrono::{DateTime, Utc};
use nw_core::{MergedFeed, WriteError};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// RFC-2822 with a `GMT` zone, as RSS readers expect.
pub fn format_rfc2822(dt: &DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

// Strip characters XML 1.0 cannot carry: C0 controls other than tab, LF, CR.
fn sanitize_text(input: &str) -> String {
    input
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || c >= ' ')
        .collect()
}

fn write_text_element<W: Write>(w: &mut Writer<W>, name: &str, text: &str) -> Result<(), WriteError> {
    let text = sanitize_text(text);
    w.write_event(Event::Start(BytesStart::new(name)))
        .and_then(|_| w.write_event(Event::Text(BytesText::new(&text))))
        .and_then(|_| w.write_event(Event::End(BytesEnd::new(name))))
        .map_err(|e| WriteError::Serialize(e.to_string()))
}

fn write_event<W: Write>(w: &mut Writer<W>, event: Event) -> Result<(), WriteError> {
    w.write_event(event).map_err(|e| WriteError::Serialize(e.to_string()))
}

/// Renders the merged feed as a UTF-8 RSS 2.0 document.
pub fn render_rss(feed: &MergedFeed) -> Result<Vec<u8>, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut rss_start = BytesStart::new("rss");
    rss_start.push_attribute(("version", "2.0"));
    write_event(&mut writer, Event::Start(rss_start))?;
    write_event(&mut writer, Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &feed.channel.title)?;
    write_text_element(&mut writer, "link", &feed.channel.link)?;
    write_text_element(&mut writer, "description", &feed.channel.description)?;
    write_text_element(&mut writer, "lastBuildDate", &format_rfc2822(&feed.built_at))?;

    for item in &feed.items {
        write_event(&mut writer, Event::Start(BytesStart::new("item")))?;
        write_text_element(&mut writer, "title", &item.title)?;
        write_text_element(&mut writer, "link", &item.link)?;
        let guid = if item.guid.is_empty() { &item.link } else { &item.guid };
        write_text_element(&mut writer, "guid", guid)?;
        write_text_element(&mut writer, "pubDate", &format_rfc2822(&item.published_at))?;
        write_text_element(&mut writer, "description", &item.description)?;
        write_event(&mut writer, Event::End(BytesEnd::new("item")))?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new("channel")))?;
    write_event(&mut writer, Event::End(BytesEnd::new("rss")))?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}
