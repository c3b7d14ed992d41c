//! XML parser that builds position-tracking trees.
//!
//! This parser uses quick-xml's streaming API and records, for every node,
//! the byte range of the source text it came from.

use std::ops::Range;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::tree::{NodeId, TreeBuilder, XTree};

/// Text accumulated across consecutive text, entity and CDATA events.
struct TextRun {
    range: Range<usize>,
    value: String,
}

/// XML parser over a borrowed source text.
pub struct XmlParser<'a> {
    source: &'a str,
}

impl<'a> XmlParser<'a> {
    /// Creates a new parser for the given text.
    pub fn new(source: &'a str) -> Self {
        XmlParser { source }
    }

    /// Parses the whole document into an `XTree`.
    pub fn parse(&self) -> Result<XTree> {
        let mut reader = Reader::from_str(self.source);
        // Text ranges are trimmed by us so offsets stay exact
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        let mut builder = TreeBuilder::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut root: Option<NodeId> = None;
        let mut text: Option<TextRun> = None;

        loop {
            let start = reader.buffer_position() as usize;
            let event = reader.read_event().map_err(|e| {
                Error::Parse(format!("at byte {}: {}", reader.error_position(), e))
            })?;
            let end = reader.buffer_position() as usize;

            match event {
                Event::Start(ref e) => {
                    self.flush_text(&mut builder, &stack, text.take())?;
                    let id = self.open_element(&mut builder, e, start..end, &stack, &mut root)?;
                    stack.push(id);
                }
                Event::Empty(ref e) => {
                    self.flush_text(&mut builder, &stack, text.take())?;
                    self.open_element(&mut builder, e, start..end, &stack, &mut root)?;
                }
                Event::End(_) => {
                    self.flush_text(&mut builder, &stack, text.take())?;
                    let id = stack.pop().ok_or_else(|| {
                        Error::Parse(format!("unexpected end tag at byte {}", start))
                    })?;
                    builder.close_element(id, end);
                }
                Event::Text(_) | Event::GeneralRef(_) => {
                    // Text and entity events carry no markup, so the source slice
                    // is exactly what needs unescaping
                    let raw = &self.source[start..end];
                    let value = unescape(raw).map_err(|e| Error::Parse(e.to_string()))?;
                    append_text(&mut text, start..end, &value);
                }
                Event::CData(ref e) => {
                    let value = String::from_utf8_lossy(e.as_ref());
                    append_text(&mut text, start..end, &value);
                }
                Event::Comment(_) => {
                    // Comments are not part of the compared tree but still split text
                    self.flush_text(&mut builder, &stack, text.take())?;
                }
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        self.flush_text(&mut builder, &stack, text.take())?;
        if let Some(open) = stack.last() {
            return Err(Error::Parse(format!(
                "element {} is never closed",
                open.index()
            )));
        }
        let root = root.ok_or_else(|| Error::Parse("document has no root element".to_string()))?;
        Ok(builder.finish(root))
    }

    /// Adds an element and its attributes below the current stack top.
    fn open_element(
        &self,
        builder: &mut TreeBuilder,
        e: &BytesStart,
        tag: Range<usize>,
        stack: &[NodeId],
        root: &mut Option<NodeId>,
    ) -> Result<NodeId> {
        let name = std::str::from_utf8(e.name().as_ref())
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();

        let parent = stack.last().copied();
        if parent.is_none() && root.is_some() {
            return Err(Error::Parse(format!(
                "second root element <{}> at byte {}",
                name, tag.start
            )));
        }

        let tag_text = &self.source[tag.clone()];
        let self_closing = tag_text.ends_with("/>");
        let content_start = if self_closing { tag.end - 2 } else { tag.end };
        let id = builder.add_element(parent, name, tag.clone(), content_start);
        if parent.is_none() {
            *root = Some(id);
        }

        let spans = attribute_spans(tag_text, tag.start);
        let mut count = 0;
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|e| Error::Parse(format!("Attribute error: {}", e)))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            let span = spans.get(count).cloned().ok_or_else(|| {
                Error::Parse(format!("cannot locate attribute {} at byte {}", key, tag.start))
            })?;
            builder.add_attribute(id, key, value, span);
            count += 1;
        }

        Ok(id)
    }

    /// Turns pending text into a node, dropping whitespace-only runs.
    fn flush_text(
        &self,
        builder: &mut TreeBuilder,
        stack: &[NodeId],
        text: Option<TextRun>,
    ) -> Result<()> {
        let Some(run) = text else {
            return Ok(());
        };
        let value = run.value.trim();
        if value.is_empty() {
            return Ok(());
        }
        let Some(&parent) = stack.last() else {
            return Err(Error::Parse(format!(
                "text outside of the root element at byte {}",
                run.range.start
            )));
        };

        let raw = &self.source[run.range.clone()];
        let leading = raw.len() - raw.trim_start().len();
        let trailing = raw.len() - raw.trim_end().len();
        let range = if leading + trailing >= raw.len() {
            run.range
        } else {
            run.range.start + leading..run.range.end - trailing
        };
        builder.add_text(parent, value.to_string(), range);
        Ok(())
    }
}

fn append_text(text: &mut Option<TextRun>, range: Range<usize>, value: &str) {
    match text {
        Some(run) => {
            run.range.end = range.end;
            run.value.push_str(value);
        }
        None => {
            *text = Some(TextRun {
                range,
                value: value.to_string(),
            })
        }
    }
}

/// Locates `name="value"` spans inside a start tag.
///
/// `tag` is the full tag text starting at `<`, `offset` its position in the
/// document. The tag has already been validated by quick-xml.
fn attribute_spans(tag: &str, offset: usize) -> Vec<Range<usize>> {
    let bytes = tag.as_bytes();
    let is_delimiter = |b: u8| b.is_ascii_whitespace() || b == b'/' || b == b'>';

    // Skip `<` and the element name
    let mut i = 1;
    while i < bytes.len() && !is_delimiter(bytes[i]) {
        i += 1;
    }

    let mut spans = Vec::new();
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] == b'/' || bytes[i] == b'>' {
            break;
        }
        let start = i;
        while i < bytes.len() && bytes[i] != b'=' {
            i += 1;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let Some(&quote) = bytes.get(i) else {
            break;
        };
        i += 1;
        while i < bytes.len() && bytes[i] != quote {
            i += 1;
        }
        i = (i + 1).min(bytes.len());
        spans.push(offset + start..offset + i);
    }
    spans
}

/// Parses XML from a string.
pub fn parse_str(xml: &str) -> Result<XTree> {
    XmlParser::new(xml).parse()
}
