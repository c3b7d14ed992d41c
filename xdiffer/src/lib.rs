//! xdiffer - structural XML comparison
//!
//! This library compares two XML documents as unordered trees and maps the
//! differences back onto the original texts, so a view can show them side
//! by side and let the user accept them one by one.
//!
//! # Overview
//!
//! - [`XTree`] parses a document and remembers the byte range of every
//!   element, attribute and text.
//! - [`diff()`] computes a minimum-cost edit script between two trees.
//!   Sibling order and whitespace between elements are not significant.
//! - [`build_diff_tree`] turns the script into a [`DiffTree`] that mirrors
//!   the first document, ready to be rendered and navigated.
//! - [`Change`] and [`apply_changes`] splice accepted differences into the
//!   first text without reformatting it.
//! - [`UiState`] is the shared state of a comparison view: the changes the
//!   user applied and the selected diff node.
//!
//! # Example
//!
//! ```
//! use xdiffer::{apply_changes, build_diff_tree, DiffTreeKind};
//!
//! let before = r#"<order><item>tea</item></order>"#;
//! let after = r#"<order status="paid"><item>coffee</item></order>"#;
//!
//! let tree = build_diff_tree(before, after).unwrap();
//! assert_eq!(tree.kind(), DiffTreeKind::PartialDiff);
//!
//! let changes: Vec<_> = tree.changes().into_iter().map(|(_, c)| c).collect();
//! let merged = apply_changes(before, after, &changes).unwrap();
//! assert_eq!(merged, after);
//! ```

pub mod change;
pub mod constants;
pub mod diff;
pub mod diff_tree;
pub mod error;
pub mod fixtures;
pub mod state;
pub mod tree;
pub mod xml;

// Re-export commonly used types
pub use change::{apply_changes, split_by_range, Change, Range, SplitText};
pub use diff::{diff, Edit};
pub use diff_tree::{
    build_diff_tree, DiffNode, DiffNodeHandle, DiffNodeKind, DiffTree, DiffTreeKind,
};
pub use error::{Error, Result};
pub use fixtures::{DEMO_XML_1, DEMO_XML_2};
pub use state::{
    AppliedEdits, DisplayMode, EditEvent, Observable, Subscription, UiState, STATE_COMPARE,
    STATE_EDIT, STATE_PREVIEW,
};
pub use tree::{NodeId, XNode, XNodeName, XTree};
pub use xml::{parse_file, parse_str, XmlParser};
