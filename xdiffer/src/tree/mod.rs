//! Position-tracking XML trees.
//!
//! An `XTree` is an arena of nodes parsed from a source text. Every node
//! remembers the byte range it was parsed from, so differences found on the
//! tree can be mapped back onto the original text without re-serializing.
//!
//! Attributes are modelled as child nodes of their element, placed before
//! the element's content children. Text nodes hold trimmed text; text made
//! only of whitespace never becomes a node.

mod signature;

pub use signature::Signature;

use signature::{subtree_signature, Label};

use std::fmt;
use std::ops::Range;

use crate::error::Result;

/// Identifier of a node within one `XTree`.
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XNodeName<'a> {
    /// Element tag name.
    TagName(&'a str),
    /// Attribute name.
    AttributeName(&'a str),
    /// Text nodes have no name.
    Text,
}

#[derive(Debug, Clone)]
enum NodeData {
    Element { name: String },
    Attribute { name: String, value: String },
    Text { value: String },
}

#[derive(Debug, Clone)]
struct NodeEntry {
    data: NodeData,
    range: Range<usize>,
    /// Offset where children of an element may be inserted when it has none.
    content_start: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    signature: Signature,
    size: usize,
}

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct XTree {
    nodes: Vec<NodeEntry>,
    root: NodeId,
}

impl XTree {
    /// Parses an XML document.
    pub fn parse(xml: &str) -> Result<XTree> {
        crate::xml::parse_str(xml)
    }

    /// Returns the root element.
    pub fn root(&self) -> XNode<'_> {
        self.node(self.root)
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree. Use [`XTree::get`] for
    /// ids of unknown origin.
    pub fn node(&self, id: NodeId) -> XNode<'_> {
        assert!(id.0 < self.nodes.len(), "node id {} out of range", id.0);
        XNode { tree: self, id }
    }

    /// Returns the node with the given id, or `None` if it is out of range.
    pub fn get(&self, id: NodeId) -> Option<XNode<'_>> {
        (id.0 < self.nodes.len()).then_some(XNode { tree: self, id })
    }

    /// Returns the number of nodes, attributes and texts included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root element.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn entry(&self, id: NodeId) -> &NodeEntry {
        &self.nodes[id.0]
    }
}

/// A borrowed handle to one node of an `XTree`.
#[derive(Clone, Copy)]
pub struct XNode<'a> {
    tree: &'a XTree,
    id: NodeId,
}

impl<'a> XNode<'a> {
    /// Returns the node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the tree this node belongs to.
    pub fn tree(&self) -> &'a XTree {
        self.tree
    }

    /// Returns the name of this node.
    pub fn name(&self) -> XNodeName<'a> {
        match &self.tree.entry(self.id).data {
            NodeData::Element { name } => XNodeName::TagName(name),
            NodeData::Attribute { name, .. } => XNodeName::AttributeName(name),
            NodeData::Text { .. } => XNodeName::Text,
        }
    }

    /// Returns the value of an attribute or text node.
    pub fn value(&self) -> Option<&'a str> {
        match &self.tree.entry(self.id).data {
            NodeData::Element { .. } => None,
            NodeData::Attribute { value, .. } | NodeData::Text { value } => Some(value),
        }
    }

    /// Returns the byte range of this node in the source text.
    ///
    /// Elements span from `<` to the end of their end tag, attributes cover
    /// `name="value"`, texts cover the trimmed text.
    pub fn range(&self) -> Range<usize> {
        self.tree.entry(self.id).range.clone()
    }

    /// Returns the offset just after an element's start tag, or the offset
    /// of `/>` for a self-closing element.
    pub fn content_start(&self) -> usize {
        self.tree.entry(self.id).content_start
    }

    /// Returns true for an element written as `<name .../>`.
    pub fn is_self_closing(&self) -> bool {
        let entry = self.tree.entry(self.id);
        matches!(entry.data, NodeData::Element { .. }) && entry.content_start + 2 == entry.range.end
    }

    /// Returns the offset of the `>` closing an element's start tag, or of
    /// the `/` of a self-closing tag. New attributes go there.
    pub fn start_tag_end(&self) -> usize {
        let content_start = self.content_start();
        if self.is_self_closing() {
            content_start
        } else {
            content_start.saturating_sub(1)
        }
    }

    /// Returns the parent node, if any.
    pub fn parent(&self) -> Option<XNode<'a>> {
        self.tree.entry(self.id).parent.map(|id| self.tree.node(id))
    }

    /// Returns the children, attributes first.
    pub fn children(&self) -> impl Iterator<Item = XNode<'a>> + 'a {
        let tree = self.tree;
        tree.entry(self.id)
            .children
            .iter()
            .map(move |&id| XNode { tree, id })
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.tree.entry(self.id).children.len()
    }

    pub fn is_element(&self) -> bool {
        matches!(self.tree.entry(self.id).data, NodeData::Element { .. })
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self.tree.entry(self.id).data, NodeData::Attribute { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.tree.entry(self.id).data, NodeData::Text { .. })
    }

    /// Returns the order-independent signature of the subtree rooted here.
    pub fn signature(&self) -> &'a Signature {
        &self.tree.entry(self.id).signature
    }

    /// Returns the number of nodes in the subtree rooted here.
    pub fn size(&self) -> usize {
        self.tree.entry(self.id).size
    }

    /// Returns true if both nodes have the same kind and name, which is the
    /// precondition for matching one onto the other.
    pub fn is_comparable(&self, other: &XNode<'_>) -> bool {
        match (self.name(), other.name()) {
            (XNodeName::TagName(a), XNodeName::TagName(b)) => a == b,
            (XNodeName::AttributeName(a), XNodeName::AttributeName(b)) => a == b,
            (XNodeName::Text, XNodeName::Text) => true,
            _ => false,
        }
    }
}

impl PartialEq for XNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for XNode<'_> {}

impl fmt::Debug for XNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XNode")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("range", &self.range())
            .finish()
    }
}

/// Incrementally assembles an `XTree` in document order.
///
/// Parents must be added before their children, which lets `finish`
/// compute sizes and signatures in a single reverse sweep.
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    nodes: Vec<NodeEntry>,
}

impl TreeBuilder {
    pub(crate) fn new() -> Self {
        TreeBuilder { nodes: Vec::new() }
    }

    pub(crate) fn add_element(
        &mut self,
        parent: Option<NodeId>,
        name: String,
        range: Range<usize>,
        content_start: usize,
    ) -> NodeId {
        self.push(parent, NodeData::Element { name }, range, content_start)
    }

    pub(crate) fn add_attribute(
        &mut self,
        parent: NodeId,
        name: String,
        value: String,
        range: Range<usize>,
    ) -> NodeId {
        let start = range.start;
        self.push(Some(parent), NodeData::Attribute { name, value }, range, start)
    }

    pub(crate) fn add_text(&mut self, parent: NodeId, value: String, range: Range<usize>) -> NodeId {
        let start = range.start;
        self.push(Some(parent), NodeData::Text { value }, range, start)
    }

    /// Records where an element ends once its end tag has been read.
    pub(crate) fn close_element(&mut self, id: NodeId, end: usize) {
        self.nodes[id.0].range.end = end;
    }

    fn push(
        &mut self,
        parent: Option<NodeId>,
        data: NodeData,
        range: Range<usize>,
        content_start: usize,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeEntry {
            data,
            range,
            content_start,
            parent,
            children: Vec::new(),
            signature: [0; 16],
            size: 1,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Computes subtree sizes and signatures and seals the tree.
    pub(crate) fn finish(mut self, root: NodeId) -> XTree {
        for index in (0..self.nodes.len()).rev() {
            let mut child_signatures: Vec<Signature> = self.nodes[index]
                .children
                .iter()
                .map(|child| self.nodes[child.0].signature)
                .collect();
            let size = 1 + self.nodes[index]
                .children
                .iter()
                .map(|child| self.nodes[child.0].size)
                .sum::<usize>();

            let entry = &self.nodes[index];
            let label = match &entry.data {
                NodeData::Element { name } => Label::Element(name),
                NodeData::Attribute { name, value } => Label::Attribute(name, value),
                NodeData::Text { value } => Label::Text(value),
            };
            let signature = subtree_signature(label, &mut child_signatures);

            let entry = &mut self.nodes[index];
            entry.signature = signature;
            entry.size = size;
        }
        XTree {
            nodes: self.nodes,
            root,
        }
    }
}
