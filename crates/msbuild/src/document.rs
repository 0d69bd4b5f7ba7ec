use std::ops::Range;

use anyhow::{Context, Result, bail};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

const BOM: &str = "\u{feff}";

/// An MSBuild project parsed into its flat list of XML events.
///
/// Every event keeps its raw bytes (attribute quoting, whitespace text, comments,
/// entity references), so serializing an untouched document reproduces its input.
/// Documents are values: rewriting produces a new document and leaves this one as is.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDocument {
    bom: bool,
    nodes: Vec<Event<'static>>,
}

/// An element located in a document: its start tag and, unless self-closing, the
/// index of its matching end tag.
#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag: BytesStart<'static>,
    pub(crate) start: usize,
    pub(crate) end: Option<usize>,
}

impl Element {
    fn last(&self) -> usize {
        self.end.unwrap_or(self.start)
    }
}

impl ProjectDocument {
    /// Parses project XML.
    ///
    /// # Errors
    /// Returns error if the content is not well-formed XML.
    pub fn parse(content: &str) -> Result<Self> {
        let (bom, content) = match content.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, content),
        };
        let mut reader = Reader::from_str(content);
        let mut buf = Vec::new();
        let mut nodes = Vec::new();
        let mut depth = 0usize;
        let mut has_root = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Eof) => break,
                Ok(event) => {
                    match &event {
                        Event::Start(_) => {
                            depth += 1;
                            has_root = true;
                        }
                        Event::End(_) => depth = depth.saturating_sub(1),
                        Event::Empty(_) => has_root = true,
                        _ => {}
                    }
                    nodes.push(event.into_owned());
                }
                Err(e) => return Err(anyhow::anyhow!("XML parsing error: {e}")),
            }
            buf.clear();
        }

        if depth > 0 {
            bail!("XML parsing error: unclosed element at end of document");
        }
        if !has_root {
            bail!("XML parsing error: root element is missing");
        }
        Ok(Self { bom, nodes })
    }

    /// Serializes the document back to XML text.
    ///
    /// # Errors
    /// Returns error if writing an event fails.
    pub fn to_xml(&self) -> Result<String> {
        let mut output = Vec::new();
        if self.bom {
            output.extend_from_slice(BOM.as_bytes());
        }
        let mut writer = Writer::new(output);
        for node in &self.nodes {
            writer.write_event(node.borrow())?;
        }
        let result = writer.into_inner();
        String::from_utf8(result).context("Failed to convert XML to UTF-8")
    }

    /// Every element with the given local name, in document order, at any depth.
    pub(crate) fn elements_named(&self, name: &str) -> Vec<Element> {
        (0..self.nodes.len())
            .filter_map(|index| self.element_at(index))
            .filter(|element| is_named(&element.tag, name))
            .collect()
    }

    /// The element whose start (or self-closing) tag sits at `index`.
    pub(crate) fn element_at(&self, index: usize) -> Option<Element> {
        match self.nodes.get(index)? {
            Event::Empty(tag) => Some(Element {
                tag: tag.clone(),
                start: index,
                end: None,
            }),
            Event::Start(tag) => {
                let mut depth = 0usize;
                for (offset, node) in self.nodes[index + 1..].iter().enumerate() {
                    match node {
                        Event::Start(_) => depth += 1,
                        Event::End(_) if depth == 0 => {
                            return Some(Element {
                                tag: tag.clone(),
                                start: index,
                                end: Some(index + 1 + offset),
                            });
                        }
                        Event::End(_) => depth -= 1,
                        _ => {}
                    }
                }
                None
            }
            _ => None,
        }
    }

    /// Node ranges of the direct children of `element`: one range per child element
    /// (start tag through end tag) or per text, comment or other node.
    pub(crate) fn children(&self, element: &Element) -> Vec<Range<usize>> {
        let Some(end) = element.end else {
            return Vec::new();
        };
        let mut children = Vec::new();
        let mut index = element.start + 1;
        while index < end {
            let last = self
                .element_at(index)
                .map_or(index, |child| child.last());
            children.push(index..last + 1);
            index = last + 1;
        }
        children
    }

    /// First direct child element of `element` with the given local name.
    pub(crate) fn child_element(&self, element: &Element, name: &str) -> Option<Element> {
        self.children(element)
            .into_iter()
            .filter_map(|child| self.element_at(child.start))
            .find(|child| is_named(&child.tag, name))
    }

    /// Concatenated text and CDATA content of `element`.
    pub(crate) fn inner_text(&self, element: &Element) -> String {
        let Some(end) = element.end else {
            return String::new();
        };
        let mut text = String::new();
        for node in &self.nodes[element.start + 1..end] {
            match node {
                Event::Text(t) => match t.decode() {
                    Ok(decoded) => text.push_str(&decoded),
                    Err(_) => text.push_str(&String::from_utf8_lossy(t)),
                },
                Event::CData(t) => text.push_str(&String::from_utf8_lossy(t)),
                Event::GeneralRef(r) => {
                    if let Ok(Some(ch)) = r.resolve_char_ref() {
                        text.push(ch);
                    } else if let Some(value) = r
                        .decode()
                        .ok()
                        .and_then(|name| resolve_predefined_entity(&name))
                    {
                        text.push_str(value);
                    }
                }
                _ => {}
            }
        }
        text
    }

    /// Whether `range` is a single text node made of whitespace only.
    pub(crate) fn is_whitespace(&self, range: &Range<usize>) -> bool {
        range.len() == 1
            && matches!(
                &self.nodes[range.start],
                Event::Text(t) if t.iter().all(u8::is_ascii_whitespace)
            )
    }

    pub(crate) fn replace(&mut self, index: usize, event: Event<'static>) {
        self.nodes[index] = event;
    }

    /// Removes the given node ranges; ranges must not overlap.
    pub(crate) fn remove(&mut self, mut ranges: Vec<Range<usize>>) {
        ranges.sort_by(|a, b| b.start.cmp(&a.start));
        for range in ranges {
            self.nodes.drain(range);
        }
    }
}

pub(crate) fn is_named(tag: &BytesStart<'_>, name: &str) -> bool {
    tag.local_name().as_ref() == name.as_bytes()
}
