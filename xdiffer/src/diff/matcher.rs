//! Minimum-cost matching between two unordered trees.
//!
//! Distances are computed bottom-up on demand and memoised per node pair.
//! Children of two matched elements are paired by a minimum-cost
//! assignment in which every child may alternatively be deleted (left side)
//! or inserted (right side) at the cost of its subtree size.

use rustc_hash::FxHashMap;

use crate::constants::{NODE_COST, UPDATE_COST};
use crate::tree::{NodeId, XNode, XTree};

use super::assignment;

/// Child pairing of two matched elements, as (left child, right child).
pub(crate) type ChildPairs = Vec<(NodeId, NodeId)>;

/// Memoising matcher for one pair of trees.
pub(crate) struct Matcher<'a> {
    left: &'a XTree,
    right: &'a XTree,
    distances: FxHashMap<(NodeId, NodeId), usize>,
    pairs: FxHashMap<(NodeId, NodeId), ChildPairs>,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(left: &'a XTree, right: &'a XTree) -> Self {
        Matcher {
            left,
            right,
            distances: FxHashMap::default(),
            pairs: FxHashMap::default(),
        }
    }

    /// Cost of removing or adding the subtree rooted at `node`.
    pub(crate) fn subtree_cost(node: &XNode<'_>) -> usize {
        node.size() * NODE_COST
    }

    /// Edit distance between two comparable nodes.
    pub(crate) fn distance(&mut self, a: NodeId, b: NodeId) -> usize {
        if let Some(&d) = self.distances.get(&(a, b)) {
            return d;
        }

        let left = self.left.node(a);
        let right = self.right.node(b);
        let d = if left.signature() == right.signature() {
            0
        } else if left.is_element() {
            let (cost, pairs) = self.match_children(a, b);
            self.pairs.insert((a, b), pairs);
            cost
        } else {
            UPDATE_COST
        };

        self.distances.insert((a, b), d);
        d
    }

    /// Returns the child pairing of two matched elements.
    pub(crate) fn child_pairs(&mut self, a: NodeId, b: NodeId) -> ChildPairs {
        if let Some(pairs) = self.pairs.get(&(a, b)) {
            return pairs.clone();
        }
        let (_, pairs) = self.match_children(a, b);
        self.pairs.insert((a, b), pairs.clone());
        pairs
    }

    /// Pairs the children of `a` and `b`, returning the total cost and the
    /// matched pairs.
    fn match_children(&mut self, a: NodeId, b: NodeId) -> (usize, ChildPairs) {
        let left_tree = self.left;
        let right_tree = self.right;
        let mut left: Vec<XNode<'a>> = left_tree.node(a).children().collect();
        let mut right: Vec<XNode<'a>> = right_tree.node(b).children().collect();

        // Identical subtrees always pair up at no cost
        let mut pairs = ChildPairs::new();
        left.retain(|l| {
            let found = right
                .iter()
                .position(|r| l.signature() == r.signature() && l.is_comparable(r));
            match found {
                Some(index) => {
                    pairs.push((l.id(), right.remove(index).id()));
                    false
                }
                None => true,
            }
        });

        if left.is_empty() || right.is_empty() {
            let cost = left.iter().chain(right.iter()).map(Self::subtree_cost).sum();
            return (cost, pairs);
        }

        let n = left.len();
        let m = right.len();
        let infinite = left
            .iter()
            .chain(right.iter())
            .map(|node| Self::subtree_cost(node) as i64)
            .sum::<i64>()
            + 1;

        // Rows: left children then one "insert" row per right child.
        // Columns: right children then one "delete" column per left child.
        let size = n + m;
        let mut cost = vec![vec![infinite; size]; size];
        for (i, l) in left.iter().enumerate() {
            for (j, r) in right.iter().enumerate() {
                if !l.is_comparable(r) {
                    continue;
                }
                let d = self.distance(l.id(), r.id());
                if d < Self::subtree_cost(l) + Self::subtree_cost(r) {
                    cost[i][j] = d as i64;
                }
            }
            cost[i][m + i] = Self::subtree_cost(l) as i64;
        }
        for (j, r) in right.iter().enumerate() {
            cost[n + j][j] = Self::subtree_cost(r) as i64;
            for dummy in m..size {
                cost[n + j][dummy] = 0;
            }
        }

        let assignment = assignment::solve(&cost);
        let mut total = 0;
        for (row, &col) in assignment.iter().enumerate() {
            total += cost[row][col] as usize;
            if row < n && col < m {
                pairs.push((left[row].id(), right[col].id()));
            }
        }
        (total, pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(xml1: &str, xml2: &str) -> usize {
        let t1 = XTree::parse(xml1).unwrap();
        let t2 = XTree::parse(xml2).unwrap();
        let mut matcher = Matcher::new(&t1, &t2);
        matcher.distance(t1.root().id(), t2.root().id())
    }

    #[test]
    fn test_identical_trees() {
        assert_eq!(distance("<a><b>x</b></a>", "<a><b>x</b></a>"), 0);
    }

    #[test]
    fn test_reordering_is_free() {
        assert_eq!(distance("<a><b/><c/></a>", "<a><c/><b/></a>"), 0);
    }

    #[test]
    fn test_text_update() {
        assert_eq!(distance("<a><b>x</b></a>", "<a><b>y</b></a>"), UPDATE_COST);
    }

    #[test]
    fn test_attribute_update() {
        assert_eq!(distance(r#"<a k="1"/>"#, r#"<a k="2"/>"#), UPDATE_COST);
    }

    #[test]
    fn test_insert_subtree() {
        // <c> plus its text
        assert_eq!(distance("<a><b/></a>", "<a><b/><c>t</c></a>"), 2 * NODE_COST);
    }

    #[test]
    fn test_rename_is_delete_plus_insert() {
        assert_eq!(distance("<a><b>t</b></a>", "<a><c>t</c></a>"), 4 * NODE_COST);
    }

    #[test]
    fn test_prefers_closest_match() {
        let t1 = XTree::parse("<a><p><x>1</x><y>2</y></p><p><x>3</x><y>4</y></p></a>").unwrap();
        let t2 = XTree::parse("<a><p><x>3</x><y>5</y></p></a>").unwrap();
        let mut matcher = Matcher::new(&t1, &t2);
        let pairs = matcher.child_pairs(t1.root().id(), t2.root().id());

        assert_eq!(pairs.len(), 1);
        let second_p = t1.root().children().nth(1).unwrap();
        assert_eq!(pairs[0].0, second_p.id());
    }
}
