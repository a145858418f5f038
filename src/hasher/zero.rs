//! Precomputed digests of empty subtrees

use super::Hasher;
use crate::model::{Digest, LeafValue};

/// `zero(level)` for every level of a tree: the digest of a subtree of that
/// height whose leaves are all empty
///
/// Index 0 is the digest of the all-zero leaf; index `k` is
/// `combine(zero(k-1), zero(k-1))`. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZeroHashes {
    levels: Vec<Digest>,
}

impl ZeroHashes {
    /// Build the table for levels `0..=height`
    pub fn new<H: Hasher + ?Sized>(hasher: &H, height: u8) -> Self {
        let mut levels = Vec::with_capacity(height as usize + 1);
        let mut current = hasher.hash_leaf(&LeafValue::ZERO);
        levels.push(current);
        for _ in 0..height {
            current = hasher.combine(&current, &current);
            levels.push(current);
        }
        ZeroHashes { levels }
    }

    /// Empty-subtree digest at `level`
    ///
    /// Panics if `level` exceeds the height the table was built for.
    pub fn get(&self, level: u8) -> Digest {
        self.levels[level as usize]
    }

    /// The empty-tree root
    pub fn root(&self) -> Digest {
        self.levels[self.levels.len() - 1]
    }

    /// Height the table was built for
    pub fn height(&self) -> u8 {
        (self.levels.len() - 1) as u8
    }

    /// Whether `digest` is the empty-subtree digest at `level`
    pub fn is_zero(&self, level: u8, digest: &Digest) -> bool {
        self.levels
            .get(level as usize)
            .map(|z| z == digest)
            .unwrap_or(false)
    }
}
