//! XML parsing.
//!
//! Documents are read with quick-xml into position-tracking `XTree`s.
//! Changes are applied to the original text through byte ranges, see
//! [`crate::change`].

mod parser;

pub use parser::{parse_str, XmlParser};

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::tree::XTree;

/// Reads a file and parses it. The text is returned with the tree because
/// node ranges point into it.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<(String, XTree)> {
    let text = fs::read_to_string(path)?;
    let tree = parse_str(&text)?;
    Ok((text, tree))
}
