//! Authentication paths and stateless verification

use super::{IndexOrder, MAX_HEIGHT};
use crate::hasher::Hasher;
use crate::model::{Digest, LeafValue};
use serde::{Deserialize, Serialize};

/// Sibling digests authenticating one leaf under one root
///
/// `siblings[0]` is the leaf's immediate sibling, `siblings[height - 1]` the
/// child of the root on the other side of the path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub leaf_index: u64,
    pub root: Digest,
    pub siblings: Vec<Digest>,
}

impl MerkleProof {
    /// Number of levels the path spans
    pub fn height(&self) -> usize {
        self.siblings.len()
    }

    /// Path length as a tree height, if it is one a tree can have
    fn checked_height(&self) -> Option<u8> {
        match self.siblings.len() {
            0 => None,
            len if len > MAX_HEIGHT as usize => None,
            len => Some(len as u8),
        }
    }

    /// Fold `leaf` with the siblings, returning the root it implies
    ///
    /// `None` if the path is empty or longer than [`MAX_HEIGHT`].
    pub fn compute_root<H: Hasher + ?Sized>(
        &self,
        hasher: &H,
        leaf: &Digest,
        order: IndexOrder,
    ) -> Option<Digest> {
        let height = self.checked_height()?;
        let root = self
            .siblings
            .iter()
            .enumerate()
            .fold(*leaf, |current, (level, sibling)| {
                if order.is_right(self.leaf_index, level as u8, height) {
                    hasher.combine(sibling, &current)
                } else {
                    hasher.combine(&current, sibling)
                }
            });
        Some(root)
    }

    /// Check that `leaf` (already hashed) sits at `leaf_index` under `root`
    pub fn verify<H: Hasher + ?Sized>(&self, hasher: &H, leaf: &Digest, order: IndexOrder) -> bool {
        match self.checked_height() {
            Some(height) if self.leaf_index >> height == 0 => {
                self.compute_root(hasher, leaf, order) == Some(self.root)
            }
            _ => false,
        }
    }

    /// Hash `value` and [`Self::verify`] it
    pub fn verify_leaf<H: Hasher + ?Sized>(
        &self,
        hasher: &H,
        value: &LeafValue,
        order: IndexOrder,
    ) -> bool {
        self.verify(hasher, &hasher.hash_leaf(value), order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{Blake3Hasher, ZeroHashes};

    #[test]
    fn test_single_leaf_proof_by_hand() {
        let hasher = Blake3Hasher;
        let zeros = ZeroHashes::new(&hasher, 2);
        let leaf = hasher.hash_leaf(&LeafValue::from_text("a").unwrap());

        let level1 = hasher.combine(&leaf, &zeros.get(0));
        let root = hasher.combine(&level1, &zeros.get(1));

        let proof = MerkleProof {
            leaf_index: 0,
            root,
            siblings: vec![zeros.get(0), zeros.get(1)],
        };
        assert!(proof.verify(&hasher, &leaf, IndexOrder::LeafFirst));
        assert!(!proof.verify(&hasher, &zeros.get(0), IndexOrder::LeafFirst));
    }

    #[test]
    fn test_index_beyond_height_rejected() {
        let hasher = Blake3Hasher;
        let zeros = ZeroHashes::new(&hasher, 1);
        let proof = MerkleProof {
            leaf_index: 2,
            root: zeros.root(),
            siblings: vec![zeros.get(0)],
        };
        // index 2 folds like index 0 at height 1, but it is not a valid slot
        assert!(!proof.verify(&hasher, &zeros.get(0), IndexOrder::LeafFirst));
    }

    fn hashed(text: &str) -> Digest {
        Blake3Hasher.hash_leaf(&LeafValue::from_text(text).unwrap())
    }

    #[test]
    fn test_short_path_does_not_verify() {
        let hasher = Blake3Hasher;
        let zeros = ZeroHashes::new(&hasher, 4);
        let leaf = hashed("a");
        let root = (0..4).fold(leaf, |acc, l| hasher.combine(&acc, &zeros.get(l)));

        let full = MerkleProof {
            leaf_index: 0,
            root,
            siblings: (0..4).map(|l| zeros.get(l)).collect(),
        };
        assert!(full.verify(&hasher, &leaf, IndexOrder::LeafFirst));

        let mut short = full.clone();
        short.siblings.pop();
        assert!(!short.verify(&hasher, &leaf, IndexOrder::LeafFirst));
        assert!(!short.verify(&hasher, &leaf, IndexOrder::RootFirst));
    }

    #[test]
    fn test_empty_path_rejected() {
        let proof = MerkleProof {
            leaf_index: 0,
            root: hashed("a"),
            siblings: vec![],
        };
        assert_eq!(proof.compute_root(&Blake3Hasher, &hashed("a"), IndexOrder::LeafFirst), None);
        assert!(!proof.verify(&Blake3Hasher, &hashed("a"), IndexOrder::LeafFirst));
    }

    #[test]
    fn test_overlong_paths_rejected() {
        // 256 and 300 would wrap to small heights if truncated to a byte
        for len in [64usize, 65, 256, 300] {
            let proof = MerkleProof {
                leaf_index: 0,
                root: Digest::ZERO,
                siblings: vec![Digest::ZERO; len],
            };
            for order in [IndexOrder::LeafFirst, IndexOrder::RootFirst] {
                assert_eq!(proof.compute_root(&Blake3Hasher, &Digest::ZERO, order), None);
                assert!(!proof.verify(&Blake3Hasher, &Digest::ZERO, order), "len {}", len);
            }
        }
    }

    #[test]
    fn test_max_height_path_folds() {
        let proof = MerkleProof {
            leaf_index: u64::MAX >> 1,
            root: Digest::ZERO,
            siblings: vec![Digest::ZERO; MAX_HEIGHT as usize],
        };
        for order in [IndexOrder::LeafFirst, IndexOrder::RootFirst] {
            assert!(proof.compute_root(&Blake3Hasher, &Digest::ZERO, order).is_some());
        }
    }

    #[test]
    fn test_proof_json_uses_hex() {
        let proof = MerkleProof {
            leaf_index: 1,
            root: Digest::from_bytes([1u8; 32]),
            siblings: vec![Digest::from_bytes([2u8; 32])],
        };
        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["root"], serde_json::json!(proof.root.to_hex()));
        let back: MerkleProof = serde_json::from_value(json).unwrap();
        assert_eq!(back, proof);
    }
}
