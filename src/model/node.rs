//! Persisted record types: internal nodes and root records

use super::Digest;
use serde::{Deserialize, Serialize};

/// An internal node: the two children that hash to its digest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub left: Digest,
    pub right: Digest,
}

impl TreeNode {
    pub fn new(left: Digest, right: Digest) -> Self {
        TreeNode { left, right }
    }

    /// Pick (path child, sibling) for a descent to the given side
    pub fn split(&self, go_right: bool) -> (Digest, Digest) {
        if go_right {
            (self.right, self.left)
        } else {
            (self.left, self.right)
        }
    }
}

/// A root digest and the leaf count at which the tree produced it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootRecord {
    pub root: Digest,
    pub count: u64,
}

impl RootRecord {
    pub fn new(root: Digest, count: u64) -> Self {
        RootRecord { root, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_selects_path_and_sibling() {
        let l = Digest::from_bytes([1u8; 32]);
        let r = Digest::from_bytes([2u8; 32]);
        let node = TreeNode::new(l, r);
        assert_eq!(node.split(false), (l, r));
        assert_eq!(node.split(true), (r, l));
    }
}
