//! Edit costs used by the tree matcher.

/// Cost of inserting or deleting a single node. A subtree costs this times
/// its node count.
pub const NODE_COST: usize = 1;

/// Cost of changing the value of a text or attribute node in place.
pub const UPDATE_COST: usize = 1;
