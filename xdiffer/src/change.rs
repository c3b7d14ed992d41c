//! Text-level changes.
//!
//! A `Change` describes one difference in terms of byte ranges into the two
//! compared texts. Applying a set of changes to the first text splices in
//! the corresponding pieces of the second text, leaving everything else
//! (formatting, comments, declarations) untouched.

use std::cmp::Reverse;

use crate::error::{Error, Result};

/// A byte range into one of the compared texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Range { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the slice of `text` covered by this range.
    pub fn slice<'t>(&self, text: &'t str) -> Result<&'t str> {
        text.get(self.start..self.end).ok_or_else(|| {
            Error::InvalidChange(format!(
                "range {}..{} does not fit a text of {} bytes",
                self.start,
                self.end,
                text.len()
            ))
        })
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(value: std::ops::Range<usize>) -> Self {
        Self {
            start: value.start,
            end: value.end,
        }
    }
}

impl From<Range> for std::ops::Range<usize> {
    fn from(value: Range) -> Self {
        value.start..value.end
    }
}

/// One applicable difference between two texts.
///
/// The combination of fields selects the operation:
///
/// | `range1` | `range2` | `insert_pos` | operation                         |
/// |----------|----------|--------------|-----------------------------------|
/// | none     | some     | some         | insert `text2[range2]` at pos     |
/// | some     | none     | none         | delete `text1[range1]`            |
/// | some     | some     | none         | replace `text1[range1]`           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Change {
    pub range1: Option<Range>,
    pub range2: Option<Range>,
    pub insert_pos: Option<usize>,
    pub is_attribute: bool,
}

impl Change {
    pub fn new(
        range1: Option<Range>,
        range2: Option<Range>,
        insert_pos: Option<usize>,
        is_attribute: bool,
    ) -> Self {
        Self {
            range1,
            range2,
            insert_pos,
            is_attribute,
        }
    }

    /// Insertion of `text2[range2]` at `pos` of the first text.
    pub fn insert(range2: Range, pos: usize, is_attribute: bool) -> Self {
        Self::new(None, Some(range2), Some(pos), is_attribute)
    }

    /// Deletion of `text1[range1]`.
    pub fn delete(range1: Range, is_attribute: bool) -> Self {
        Self::new(Some(range1), None, None, is_attribute)
    }

    /// Replacement of `text1[range1]` by `text2[range2]`.
    pub fn replace(range1: Range, range2: Range, is_attribute: bool) -> Self {
        Self::new(Some(range1), Some(range2), None, is_attribute)
    }

    /// Offset in the first text where this change takes effect.
    fn position(&self) -> usize {
        self.range1
            .map(|r| r.start)
            .or(self.insert_pos)
            .unwrap_or(0)
    }

    /// Sort key for `apply_changes`, which applies the largest key first.
    ///
    /// Among changes at one position, changes of existing text rank
    /// highest, attribute inserts lowest, and inserts with a later source
    /// in the second text run earlier.
    fn apply_order(&self) -> (usize, u8, usize, usize, usize) {
        let rank = match (self.range1, self.is_attribute) {
            (Some(_), _) => 2,
            (None, false) => 1,
            (None, true) => 0,
        };
        let (source_start, source_end) = self.range2.map_or((0, 0), |r| (r.start, r.end));
        let target_end = self.range1.map_or(0, |r| r.end);
        (self.position(), rank, source_start, source_end, target_end)
    }
}

/// Applies `changes` to `text1`, taking inserted and replacement text from
/// `text2`.
///
/// All positions refer to the unmodified texts; changes are applied from
/// the end of `text1` towards its start so earlier offsets stay valid.
/// The result does not depend on the order of `changes`: at one position,
/// replacements and deletions go first, then content, then attributes, and
/// inserts end up in the order of their source in `text2`.
pub fn apply_changes(text1: &str, text2: &str, changes: &[Change]) -> Result<String> {
    let mut changes: Vec<Change> = changes.to_vec();

    // Attributes are inserted at the end of the start tag
    for change in &mut changes {
        if change.range1.is_none() && change.range2.is_some() && change.is_attribute {
            let pos = insert_position(text1, change)?;
            change.insert_pos = Some(attribute_anchor(text1, pos)?);
        }
    }

    changes.sort_by_key(|change| Reverse(change.apply_order()));

    let mut final_text = text1.to_string();
    for change in &changes {
        final_text = match (change.range1, change.range2, change.insert_pos) {
            (None, Some(r2), Some(pos)) => {
                let insert = r2.slice(text2)?.trim();
                check_boundary(text1, pos)?;
                if change.is_attribute {
                    insert_attribute(text1, &final_text, pos, insert)?
                } else {
                    insert_content(text1, &final_text, pos, insert)?
                }
            }
            (Some(r1), None, None) => {
                r1.slice(text1)?;
                splice(&final_text, r1.start, r1.end, "")?
            }
            (Some(r1), Some(r2), None) => {
                r1.slice(text1)?;
                splice(&final_text, r1.start, r1.end, r2.slice(text2)?)?
            }
            _ => {
                return Err(Error::InvalidChange(format!(
                    "unsupported change shape {:?}",
                    change
                )))
            }
        };
    }
    Ok(final_text)
}

fn insert_position(text1: &str, change: &Change) -> Result<usize> {
    let pos = change
        .insert_pos
        .ok_or_else(|| Error::InvalidChange(format!("insert without position {:?}", change)))?;
    check_boundary(text1, pos)?;
    Ok(pos)
}

fn check_boundary(text: &str, pos: usize) -> Result<()> {
    if text.is_char_boundary(pos) {
        Ok(())
    } else {
        Err(Error::InvalidChange(format!(
            "position {} is not a character boundary of a text of {} bytes",
            pos,
            text.len()
        )))
    }
}

/// Moves an attribute insert position to the closing `>` (or `/>`) of the
/// start tag containing `pos`. Quoted attribute values are skipped.
fn attribute_anchor(text1: &str, pos: usize) -> Result<usize> {
    let mut quote = None;
    let mut close = None;
    for (offset, c) in text1[pos..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => {
                close = Some(pos + offset);
                break;
            }
            _ => {}
        }
    }
    let close =
        close.ok_or_else(|| Error::InvalidChange(format!("no start tag after position {}", pos)))?;
    if text1[..close].ends_with('/') {
        Ok(close - 1)
    } else {
        Ok(close)
    }
}

/// Inserts an attribute at the end of a start tag, keeping one space on
/// each side of it.
fn insert_attribute(text1: &str, final_text: &str, pos: usize, insert: &str) -> Result<String> {
    let prefix_space = match text1[..pos].chars().next_back() {
        Some(c) if c.is_whitespace() => "",
        _ => " ",
    };
    let suffix_space = match final_text.get(pos..).and_then(|rest| rest.chars().next()) {
        Some(c) if c.is_whitespace() || c == '>' => "",
        Some(_) => " ",
        None => "",
    };
    splice(
        final_text,
        pos,
        pos,
        &format!("{prefix_space}{insert}{suffix_space}"),
    )
}

/// Inserts element or text content. Inserting into a self-closing element
/// expands it into a start/end tag pair.
fn insert_content(text1: &str, final_text: &str, pos: usize, insert: &str) -> Result<String> {
    if !text1[pos..].starts_with("/>") {
        return splice(final_text, pos, pos, insert);
    }

    // Content inserts at one position run before attribute inserts there,
    // so `final_text[pos..]` is either the untouched `/>` or the `>` of an
    // expansion made by a previous content insert.
    if final_text.get(pos..).is_some_and(|rest| rest.starts_with("/>")) {
        let name = enclosing_tag_name(text1, pos)?;
        splice(final_text, pos, pos + 2, &format!(">{}</{}>", insert, name))
    } else if final_text.get(pos..).is_some_and(|rest| rest.starts_with('>')) {
        splice(final_text, pos + 1, pos + 1, insert)
    } else {
        Err(Error::InvalidChange(format!(
            "self-closing tag at {} was modified before its content was inserted",
            pos
        )))
    }
}

/// Replaces `text[start..end]` by `insert`.
fn splice(text: &str, start: usize, end: usize, insert: &str) -> Result<String> {
    match (text.get(..start), text.get(end..)) {
        (Some(head), Some(tail)) if start <= end => Ok(format!("{}{}{}", head, insert, tail)),
        _ => Err(Error::InvalidChange(format!(
            "changes overlap around {}..{}",
            start, end
        ))),
    }
}

fn enclosing_tag_name(text1: &str, pos: usize) -> Result<&str> {
    let open = text1[..pos]
        .rfind('<')
        .ok_or_else(|| Error::InvalidChange(format!("no start tag before position {}", pos)))?;
    let tag = &text1[open + 1..pos];
    let end = tag
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(tag.len());
    Ok(&tag[..end])
}

/// A text cut into three pieces around a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitText {
    head: String,
    middle: String,
    tail: String,
}

impl SplitText {
    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn middle(&self) -> &str {
        &self.middle
    }

    pub fn tail(&self) -> &str {
        &self.tail
    }
}

/// Splits `text` into the part before, inside and after `range`. Without a
/// range the whole text is the head.
pub fn split_by_range(text: &str, range: Option<Range>) -> Result<SplitText> {
    match range {
        Some(r) => {
            let middle = r.slice(text)?;
            Ok(SplitText {
                head: text[..r.start].to_string(),
                middle: middle.to_string(),
                tail: text[r.end..].to_string(),
            })
        }
        None => Ok(SplitText {
            head: text.to_string(),
            middle: String::new(),
            tail: String::new(),
        }),
    }
}
