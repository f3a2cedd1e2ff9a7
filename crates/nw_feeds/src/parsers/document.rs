use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use nw_core::ParseError;

/// A parsed XML element. Only the pieces feed extraction needs are kept.
#[derive(Debug, Default, Clone)]
pub(crate) struct Element {
    /// Qualified name as written, e.g. `dc:date`
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Text and CDATA directly inside this element, concatenated
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart) -> Self {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let attributes = start
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                let value = unescape_lenient(&String::from_utf8_lossy(&attr.value));
                (key, value)
            })
            .collect();

        Self {
            name,
            attributes,
            ..Default::default()
        }
    }

    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with exactly this qualified name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// First direct child with this local name, whatever its prefix
    pub fn child_local(&self, local: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local_name() == local)
    }

    pub fn children_local<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.local_name() == local)
    }

    /// Trimmed text of the named child, empty when the child is missing
    pub fn child_text(&self, name: &str) -> String {
        self.child(name).map(Element::trimmed_text).unwrap_or_default()
    }

    pub fn child_local_text(&self, local: &str) -> String {
        self.child_local(local).map(Element::trimmed_text).unwrap_or_default()
    }

    pub fn trimmed_text(&self) -> String {
        self.text.trim().to_string()
    }

    /// Text of this element and all of its descendants, in document order
    pub fn deep_text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            let text = child.deep_text();
            if !text.is_empty() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(&text);
            }
        }
        out.trim().to_string()
    }

    /// All descendants (not including self) with this local name, in document order
    pub fn descendants_local<'a>(&'a self, local: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_local(local, &mut found);
        found
    }

    fn collect_local<'a>(&'a self, local: &str, found: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.local_name() == local {
                found.push(child);
            }
            child.collect_local(local, found);
        }
    }
}

/// Resolves predefined and numeric character references one at a time.
/// References XML does not know (HTML ones such as `&nbsp;`) and stray `&`
/// are copied through unchanged.
fn unescape_lenient(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let end = tail[1..]
            .find(|c: char| c == ';' || c == '&' || c.is_whitespace())
            .map(|i| i + 1);
        match end {
            Some(end) if tail.as_bytes()[end] == b';' => {
                let reference = &tail[..=end];
                match unescape(reference) {
                    Ok(resolved) => out.push_str(&resolved),
                    Err(_) => out.push_str(reference),
                }
                rest = &tail[end + 1..];
            }
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(ParseError::Xml(format!(
            "unexpected element <{}> after the root element",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

/// Reads a whole XML document into an element tree.
///
/// Fails on any reader error, on elements still open at the end of input and
/// on input without a root element. Text is kept untrimmed so that pieces split
/// by CDATA sections or comments join with their whitespace intact.
pub(crate) fn parse_document(xml: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(Element::from_start(&e)),
            Ok(Event::Empty(e)) => attach(&mut stack, &mut root, Element::from_start(&e))?,
            Ok(Event::End(e)) => {
                let element = stack.pop().ok_or_else(|| {
                    ParseError::Xml(format!(
                        "unmatched closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&unescape_lenient(&String::from_utf8_lossy(&e)));
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::Xml(format!(
                    "error at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ParseError::UnexpectedEof);
    }
    root.ok_or(ParseError::NoRootElement)
}
