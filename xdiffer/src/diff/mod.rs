//! Structural diff of two XML trees.
//!
//! The comparison treats sibling order as insignificant: two documents that
//! differ only in the order of elements or attributes, or in whitespace
//! between elements, compare equal. The result is a flat edit script
//! describing how to turn the first tree into the second.

mod assignment;
mod matcher;

use log::debug;

use crate::tree::{XNode, XTree};

use matcher::Matcher;

/// One edit turning the first tree into the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit<'a> {
    /// `child_node` (from the second tree) is added below `to_node` (from
    /// the first tree).
    Insert {
        child_node: XNode<'a>,
        to_node: XNode<'a>,
    },
    /// The node (from the first tree) is removed with its subtree.
    Delete(XNode<'a>),
    /// The value of a text or attribute node changes.
    Update { old: XNode<'a>, new: XNode<'a> },
    /// The root elements differ; nothing can be matched.
    ReplaceRoot,
}

impl<'a> Edit<'a> {
    /// Returns the node of the first tree this edit is attached to.
    pub fn anchor(&self) -> Option<XNode<'a>> {
        match self {
            Edit::Insert { to_node, .. } => Some(*to_node),
            Edit::Delete(node) => Some(*node),
            Edit::Update { old, .. } => Some(*old),
            Edit::ReplaceRoot => None,
        }
    }
}

/// Computes the edit script turning `tree1` into `tree2`.
///
/// Returns an empty script when the trees are equal and `[ReplaceRoot]`
/// when their root elements have different names.
pub fn diff<'a>(tree1: &'a XTree, tree2: &'a XTree) -> Vec<Edit<'a>> {
    let root1 = tree1.root();
    let root2 = tree2.root();

    if !root1.is_comparable(&root2) {
        debug!("root elements differ, replacing the whole document");
        return vec![Edit::ReplaceRoot];
    }
    if root1.signature() == root2.signature() {
        debug!("documents are structurally identical");
        return Vec::new();
    }

    let mut matcher = Matcher::new(tree1, tree2);
    let distance = matcher.distance(root1.id(), root2.id());
    let mut edits = Vec::new();
    collect_edits(&mut matcher, root1, root2, &mut edits);
    debug!(
        "diff found {} edits with total cost {}",
        edits.len(),
        distance
    );
    edits
}

/// Emits the edits below a matched pair of nodes.
fn collect_edits<'a>(
    matcher: &mut Matcher<'a>,
    old: XNode<'a>,
    new: XNode<'a>,
    edits: &mut Vec<Edit<'a>>,
) {
    if old.signature() == new.signature() {
        return;
    }
    if !old.is_element() {
        edits.push(Edit::Update { old, new });
        return;
    }

    let tree2 = new.tree();
    let pairs = matcher.child_pairs(old.id(), new.id());

    for child in old.children() {
        match pairs.iter().find(|(l, _)| *l == child.id()) {
            Some(&(_, r)) => collect_edits(matcher, child, tree2.node(r), edits),
            None => edits.push(Edit::Delete(child)),
        }
    }
    for child in new.children() {
        if !pairs.iter().any(|(_, r)| *r == child.id()) {
            edits.push(Edit::Insert {
                child_node: child,
                to_node: old,
            });
        }
    }
}
