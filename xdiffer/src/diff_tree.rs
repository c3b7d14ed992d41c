//! Presentation tree of a diff.
//!
//! A `DiffTree` mirrors the first document and marks every node with how it
//! changed. Nodes added by the second document are attached below the node
//! they are inserted into, carrying the position in the first text where
//! they would be spliced in. This is the shape a diff view renders and
//! navigates.

use std::fmt;
use std::str::FromStr;

use log::debug;
use rustc_hash::FxHashMap;

use crate::change::{Change, Range};
use crate::diff::{self, Edit};
use crate::error::{Error, Result};
use crate::tree::{NodeId, XNode, XNodeName, XTree};

/// Overall result of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTreeKind {
    /// The documents are structurally equal.
    Same,
    /// The root elements differ; there is nothing to show node by node.
    TotalDiff,
    /// Some nodes differ.
    PartialDiff,
}

/// How one node changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffNodeKind {
    NoDiff,
    /// Removed with its subtree.
    DeletedNode,
    /// Descendant of a deleted node.
    DeletedSubNode,
    /// Added with its subtree.
    AddedNode,
    /// Descendant of an added node.
    AddedSubNode,
    /// Value of a text or attribute node changed.
    UpdatedNode,
}

/// A node of the presentation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffNode {
    name: String,
    range1: Option<Range>,
    range2: Option<Range>,
    kind: DiffNodeKind,
    insert_pos: Option<usize>,
    children: Vec<DiffNode>,
    is_attribute: bool,
}

impl DiffNode {
    /// Display name: `<tag>`, `[attribute]` or `TEXT`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Range in the first text, for deleted and updated nodes.
    pub fn range1(&self) -> Option<Range> {
        self.range1
    }

    /// Range in the second text, for added and updated nodes.
    pub fn range2(&self) -> Option<Range> {
        self.range2
    }

    pub fn kind(&self) -> DiffNodeKind {
        self.kind
    }

    pub fn children(&self) -> &[DiffNode] {
        &self.children
    }

    /// Position in the first text where an added node would be inserted.
    pub fn insert_pos(&self) -> Option<usize> {
        self.insert_pos
    }

    pub fn is_attribute(&self) -> bool {
        self.is_attribute
    }

    /// Returns true if this node or any descendant differs.
    pub fn has_diff(&self) -> bool {
        self.kind != DiffNodeKind::NoDiff || self.children.iter().any(DiffNode::has_diff)
    }

    /// The change that applying this node would make, for deleted, added and
    /// updated nodes. Sub-nodes are covered by their ancestor's change.
    pub fn change(&self) -> Option<Change> {
        match (self.kind, self.range1, self.range2, self.insert_pos) {
            (DiffNodeKind::DeletedNode, Some(r1), _, _) => {
                Some(Change::delete(r1, self.is_attribute))
            }
            (DiffNodeKind::AddedNode, _, Some(r2), Some(pos)) => {
                Some(Change::insert(r2, pos, self.is_attribute))
            }
            (DiffNodeKind::UpdatedNode, Some(r1), Some(r2), _) => {
                Some(Change::replace(r1, r2, self.is_attribute))
            }
            _ => None,
        }
    }
}

/// Opaque reference to a node of a `DiffTree`: the child indices leading to
/// it from the root.
///
/// A handle never owns the node; resolve it with [`DiffTree::node`]. Its
/// string form (`/` for the root, `/0/3` for a descendant) is stable and
/// can be used as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DiffNodeHandle(Vec<usize>);

impl DiffNodeHandle {
    /// Handle of the root node.
    pub fn root() -> Self {
        DiffNodeHandle(Vec::new())
    }

    /// Handle of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        DiffNodeHandle(path)
    }

    /// Handle of the parent node, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(DiffNodeHandle(rest.to_vec()))
    }

    pub fn path(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for DiffNodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

impl FromStr for DiffNodeHandle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix('/')
            .ok_or_else(|| Error::InvalidHandle(s.to_string()))?;
        if rest.is_empty() {
            return Ok(DiffNodeHandle::root());
        }
        rest.split('/')
            .map(|part| part.parse().map_err(|_| Error::InvalidHandle(s.to_string())))
            .collect::<Result<Vec<usize>>>()
            .map(DiffNodeHandle)
    }
}

/// Result of comparing two documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffTree {
    kind: DiffTreeKind,
    root: Option<DiffNode>,
    diff_count: usize,
}

impl DiffTree {
    /// Compares two parsed documents.
    pub fn from_trees(tree1: &XTree, tree2: &XTree) -> DiffTree {
        let edits = diff::diff(tree1, tree2);

        if edits.is_empty() {
            return DiffTree {
                kind: DiffTreeKind::Same,
                root: None,
                diff_count: 0,
            };
        }
        if matches!(edits[0], Edit::ReplaceRoot) {
            return DiffTree {
                kind: DiffTreeKind::TotalDiff,
                root: None,
                diff_count: 1,
            };
        }

        let diff_count = edits.len();
        let mut changed_nodes: FxHashMap<NodeId, Vec<Edit>> = FxHashMap::default();
        for edit in edits {
            if let Some(anchor) = edit.anchor() {
                changed_nodes.entry(anchor.id()).or_default().push(edit);
            }
        }
        debug!(
            "building diff tree for {} edits on {} nodes",
            diff_count,
            changed_nodes.len()
        );

        let builder = DiffTreeBuilder { changed_nodes };
        DiffTree {
            kind: DiffTreeKind::PartialDiff,
            root: Some(builder.matched(tree1.root())),
            diff_count,
        }
    }

    pub fn kind(&self) -> DiffTreeKind {
        self.kind
    }

    pub fn root(&self) -> Option<&DiffNode> {
        self.root.as_ref()
    }

    /// Number of edits found.
    pub fn diff_count(&self) -> usize {
        self.diff_count
    }

    /// Resolves a handle into the node it refers to.
    pub fn node(&self, handle: &DiffNodeHandle) -> Option<&DiffNode> {
        let mut node = self.root.as_ref()?;
        for &index in handle.path() {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    /// Lists every node in depth-first order with its handle.
    pub fn walk(&self) -> Vec<(DiffNodeHandle, &DiffNode)> {
        let mut nodes = Vec::new();
        let mut stack = Vec::new();
        if let Some(root) = &self.root {
            stack.push((DiffNodeHandle::root(), root));
        }
        while let Some((handle, node)) = stack.pop() {
            for (index, child) in node.children.iter().enumerate().rev() {
                stack.push((handle.child(index), child));
            }
            nodes.push((handle, node));
        }
        nodes
    }

    /// Lists the change of every deleted, added or updated node.
    pub fn changes(&self) -> Vec<(DiffNodeHandle, Change)> {
        self.walk()
            .into_iter()
            .filter_map(|(handle, node)| node.change().map(|change| (handle, change)))
            .collect()
    }
}

/// Parses and compares two documents.
pub fn build_diff_tree(xml1: &str, xml2: &str) -> Result<DiffTree> {
    let tree1 = XTree::parse(xml1).map_err(|e| context("first", e))?;
    let tree2 = XTree::parse(xml2).map_err(|e| context("second", e))?;
    Ok(DiffTree::from_trees(&tree1, &tree2))
}

fn context(which: &str, error: Error) -> Error {
    match error {
        Error::Parse(message) => Error::Parse(format!("cannot parse {} document: {}", which, message)),
        other => other,
    }
}

fn display_name(node: &XNode<'_>) -> String {
    match node.name() {
        XNodeName::TagName(name) => format!("<{}>", name),
        XNodeName::AttributeName(name) => format!("[{}]", name),
        XNodeName::Text => "TEXT".to_string(),
    }
}

struct DiffTreeBuilder<'a> {
    changed_nodes: FxHashMap<NodeId, Vec<Edit<'a>>>,
}

impl<'a> DiffTreeBuilder<'a> {
    /// Builds the node for a first-document node that is still present in
    /// the second, unless an edit says otherwise.
    fn matched(&self, node: XNode<'a>) -> DiffNode {
        let mut inserted = Vec::new();
        if let Some(edits) = self.changed_nodes.get(&node.id()) {
            for edit in edits {
                match *edit {
                    Edit::Insert { child_node, .. } => inserted.push(child_node),
                    Edit::Delete(deleted) => return Self::subtree(deleted, DiffNodeKind::DeletedNode, None),
                    Edit::Update { old, new } => {
                        return DiffNode {
                            name: display_name(&node),
                            range1: Some(old.range().into()),
                            range2: Some(new.range().into()),
                            kind: DiffNodeKind::UpdatedNode,
                            insert_pos: None,
                            children: Vec::new(),
                            is_attribute: old.is_attribute(),
                        }
                    }
                    Edit::ReplaceRoot => {}
                }
            }
        }

        let mut children: Vec<DiffNode> = node.children().map(|c| self.matched(c)).collect();
        let content_end = node
            .children()
            .filter(|c| !c.is_attribute())
            .map(|c| c.range().end)
            .max()
            .unwrap_or_else(|| node.content_start());
        for added in inserted {
            let insert_pos = if added.is_attribute() {
                node.start_tag_end()
            } else {
                content_end
            };
            children.push(Self::subtree(added, DiffNodeKind::AddedNode, Some(insert_pos)));
        }

        DiffNode {
            name: display_name(&node),
            range1: None,
            range2: None,
            kind: DiffNodeKind::NoDiff,
            insert_pos: None,
            children,
            is_attribute: node.is_attribute(),
        }
    }

    /// Builds a wholly deleted or wholly added subtree.
    fn subtree(node: XNode<'_>, kind: DiffNodeKind, insert_pos: Option<usize>) -> DiffNode {
        let (range1, range2, child_kind) = match kind {
            DiffNodeKind::DeletedNode | DiffNodeKind::DeletedSubNode => {
                (Some(node.range().into()), None, DiffNodeKind::DeletedSubNode)
            }
            _ => (None, Some(node.range().into()), DiffNodeKind::AddedSubNode),
        };
        DiffNode {
            name: display_name(&node),
            range1,
            range2,
            kind,
            insert_pos,
            children: node
                .children()
                .map(|c| Self::subtree(c, child_kind, None))
                .collect(),
            is_attribute: node.is_attribute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::apply_changes;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_same() {
        let tree = build_diff_tree("<a><b/></a>", "<a>\n <b/>\n</a>").unwrap();
        assert_eq!(tree.kind(), DiffTreeKind::Same);
        assert_eq!(tree.diff_count(), 0);
        assert!(tree.root().is_none());
        assert!(tree.walk().is_empty());
    }

    #[test]
    fn test_total_diff() {
        let tree = build_diff_tree("<a/>", "<b/>").unwrap();
        assert_eq!(tree.kind(), DiffTreeKind::TotalDiff);
        assert_eq!(tree.diff_count(), 1);
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_parse_errors_name_the_document() {
        match build_diff_tree("<a/>", "<b>") {
            Err(Error::Parse(message)) => assert!(message.contains("second")),
            other => panic!("expected parse error, got {:?}", other),
        }
        match build_diff_tree("<a", "<b/>") {
            Err(Error::Parse(message)) => assert!(message.contains("first")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_diff_shape() {
        let xml1 = r#"<a><b>x</b><c k="1"><d/></c></a>"#;
        let xml2 = r#"<a><b>y</b><e/></a>"#;
        let tree = build_diff_tree(xml1, xml2).unwrap();
        assert_eq!(tree.kind(), DiffTreeKind::PartialDiff);
        assert_eq!(tree.diff_count(), 3);

        let root = tree.root().unwrap();
        assert_eq!(root.name(), "<a>");
        assert_eq!(root.kind(), DiffNodeKind::NoDiff);
        assert!(root.has_diff());

        let names: Vec<&str> = root.children().iter().map(DiffNode::name).collect();
        assert_eq!(names, vec!["<b>", "<c>", "<e>"]);

        let text = &root.children()[0].children()[0];
        assert_eq!(text.name(), "TEXT");
        assert_eq!(text.kind(), DiffNodeKind::UpdatedNode);
        assert_eq!(&xml1[std::ops::Range::from(text.range1().unwrap())], "x");
        assert_eq!(&xml2[std::ops::Range::from(text.range2().unwrap())], "y");

        let deleted = &root.children()[1];
        assert_eq!(deleted.kind(), DiffNodeKind::DeletedNode);
        let sub_kinds: Vec<DiffNodeKind> = deleted.children().iter().map(DiffNode::kind).collect();
        assert_eq!(
            sub_kinds,
            vec![DiffNodeKind::DeletedSubNode, DiffNodeKind::DeletedSubNode]
        );
        assert!(deleted.children()[0].is_attribute());
        assert_eq!(deleted.children()[0].name(), "[k]");

        let added = &root.children()[2];
        assert_eq!(added.kind(), DiffNodeKind::AddedNode);
        assert_eq!(added.insert_pos(), Some(xml1.find("</a>").unwrap()));
    }

    #[test]
    fn test_added_attribute_anchors_at_start_tag_end() {
        let xml1 = r#"<a><b/></a>"#;
        let xml2 = r#"<a><b n="1"/></a>"#;
        let tree = build_diff_tree(xml1, xml2).unwrap();
        let handle: DiffNodeHandle = "/0/0".parse().unwrap();
        let attr = tree.node(&handle).unwrap();
        assert_eq!(attr.kind(), DiffNodeKind::AddedNode);
        assert!(attr.is_attribute());
        assert_eq!(attr.insert_pos(), Some(xml1.find("/>").unwrap()));
    }

    #[test]
    fn test_added_attribute_skips_gt_in_values() {
        let xml1 = r#"<a x="1>2"/>"#;
        let xml2 = r#"<a x="1>2" y="3"/>"#;
        let tree = build_diff_tree(xml1, xml2).unwrap();
        let (_, change) = tree.changes().pop().unwrap();
        assert_eq!(change.insert_pos, Some(xml1.find("/>").unwrap()));

        let merged = apply_changes(xml1, xml2, &[change]).unwrap();
        assert_eq!(merged, r#"<a x="1>2" y="3" />"#);
        let check = build_diff_tree(&merged, xml2).unwrap();
        assert_eq!(check.kind(), DiffTreeKind::Same);
    }

    #[test]
    fn test_attribute_and_child_added_to_self_closing_element() {
        let xml1 = "<a><b/></a>";
        let xml2 = r#"<a><b k="v"><c/></b></a>"#;
        let tree = build_diff_tree(xml1, xml2).unwrap();
        let mut changes: Vec<Change> = tree.changes().into_iter().map(|(_, c)| c).collect();
        assert_eq!(changes.len(), 2);

        let merged = apply_changes(xml1, xml2, &changes).unwrap();
        assert_eq!(merged, r#"<a><b k="v"><c/></b></a>"#);
        changes.reverse();
        assert_eq!(apply_changes(xml1, xml2, &changes).unwrap(), merged);

        let check = build_diff_tree(&merged, xml2).unwrap();
        assert_eq!(check.kind(), DiffTreeKind::Same);
    }

    #[test]
    fn test_insert_into_element_without_content() {
        let xml1 = r#"<a x="1"></a>"#;
        let xml2 = r#"<a x="1"><b/></a>"#;
        let tree = build_diff_tree(xml1, xml2).unwrap();
        let changes: Vec<Change> = tree.changes().into_iter().map(|(_, c)| c).collect();
        assert_eq!(changes, vec![Change::insert(Range::new(9, 13), 9, false)]);
        assert_eq!(apply_changes(xml1, xml2, &changes).unwrap(), xml2);
    }

    #[test]
    fn test_walk_and_lookup_agree() {
        let tree = build_diff_tree("<a><b>1</b><c/></a>", "<a><b>2</b></a>").unwrap();
        for (handle, node) in tree.walk() {
            assert_eq!(tree.node(&handle), Some(node));
        }
        assert_eq!(tree.walk()[0].0, DiffNodeHandle::root());
        assert!(tree.node(&DiffNodeHandle::root().child(9)).is_none());
    }

    #[test]
    fn test_handle_string_form() {
        let handle = DiffNodeHandle::root().child(0).child(3);
        assert_eq!(handle.to_string(), "/0/3");
        assert_eq!("/0/3".parse::<DiffNodeHandle>().unwrap(), handle);
        assert_eq!(DiffNodeHandle::root().to_string(), "/");
        assert_eq!("/".parse::<DiffNodeHandle>().unwrap(), DiffNodeHandle::root());
        assert_eq!(handle.parent(), Some(DiffNodeHandle::root().child(0)));
        assert_eq!(DiffNodeHandle::root().parent(), None);

        assert!("0/3".parse::<DiffNodeHandle>().is_err());
        assert!("/x".parse::<DiffNodeHandle>().is_err());
        assert!("/1//2".parse::<DiffNodeHandle>().is_err());
    }

    #[test]
    fn test_sub_nodes_have_no_change() {
        let tree = build_diff_tree("<a><b><c/></b></a>", "<a/>").unwrap();
        let changes = tree.changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].0, DiffNodeHandle::root().child(0));
    }
}
