//! JSON test vectors for pinning a hasher and index order
//!
//! A suite fixes one height and lists independent insertion sequences. For
//! each sequence it records the root before any insertion, the root after
//! every insertion, the final count, and the proof of leaf `i` against the
//! root produced right after leaf `i` went in.
//!
//! ```json
//! { "height": 4,
//!   "vectors": [ { "leaves": ["foo"],
//!                  "expectedRoots": ["<empty root>", "<root after foo>"],
//!                  "expectedCount": 1,
//!                  "prooves": [["<sibling 0>", "...", "<sibling 3>"]] } ] }
//! ```

use crate::hasher::Hasher;
use crate::model::{Digest, LeafValue, NetworkId};
use crate::store::MemoryStore;
use crate::tree::{IndexOrder, MerkleTree};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One insertion sequence and its expected outputs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafVector {
    /// Leaf texts, encoded with [`LeafValue::from_text`]
    pub leaves: Vec<String>,
    /// `leaves.len() + 1` roots, starting with the empty root
    pub expected_roots: Vec<Digest>,
    pub expected_count: u64,
    #[serde(rename = "prooves")]
    pub proofs: Vec<Vec<Digest>>,
}

/// A set of vectors sharing one tree height
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorSuite {
    pub height: u8,
    pub vectors: Vec<LeafVector>,
}

impl VectorSuite {
    /// Read a suite from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Replay every vector into a fresh in-memory tree, failing on the first mismatch
///
/// Returns the number of vectors checked.
pub fn run<H: Hasher>(suite: &VectorSuite, hasher: &H, order: IndexOrder) -> Result<usize> {
    for (vi, vector) in suite.vectors.iter().enumerate() {
        let mismatch = |what: String| Error::VectorMismatch(format!("vector {}: {}", vi, what));

        let mut tree =
            MerkleTree::load_with_order(MemoryStore::new(), hasher, NetworkId(1), suite.height, order)?;

        let expected_empty = vector
            .expected_roots
            .first()
            .ok_or_else(|| mismatch("no expected roots".into()))?;
        if tree.root() != *expected_empty {
            return Err(mismatch(format!(
                "empty root {} != expected {}",
                tree.root(),
                expected_empty
            )));
        }

        for (i, text) in vector.leaves.iter().enumerate() {
            let root = tree.add_leaf(&LeafValue::from_text(text)?)?;

            let expected = vector
                .expected_roots
                .get(i + 1)
                .ok_or_else(|| mismatch(format!("no expected root for leaf {}", i)))?;
            if root != *expected {
                return Err(mismatch(format!(
                    "root after leaf {} is {}, expected {}",
                    i, root, expected
                )));
            }

            let index = tree.root_index_of(&root)?;
            if index != i as u64 + 1 {
                return Err(mismatch(format!(
                    "root after leaf {} maps to count {}",
                    i, index
                )));
            }

            let siblings = tree.get_siblings(i as u64, &root)?;
            let expected = vector
                .proofs
                .get(i)
                .ok_or_else(|| mismatch(format!("no expected proof for leaf {}", i)))?;
            if siblings != *expected {
                return Err(mismatch(format!("proof for leaf {} differs", i)));
            }
        }

        if tree.count() != vector.expected_count {
            return Err(mismatch(format!(
                "final count {} != expected {}",
                tree.count(),
                vector.expected_count
            )));
        }

        tracing::debug!(vector = vi, leaves = vector.leaves.len(), "vector passed");
    }

    tracing::info!(
        vectors = suite.vectors.len(),
        height = suite.height,
        hasher = hasher.name(),
        "test vectors passed"
    );
    Ok(suite.vectors.len())
}

/// Build a suite by replaying `leaf_sets`, pinning the current behavior
pub fn generate<H: Hasher>(
    height: u8,
    leaf_sets: &[Vec<String>],
    hasher: &H,
    order: IndexOrder,
) -> Result<VectorSuite> {
    let mut vectors = Vec::with_capacity(leaf_sets.len());

    for leaves in leaf_sets {
        let mut tree =
            MerkleTree::load_with_order(MemoryStore::new(), hasher, NetworkId(1), height, order)?;
        let mut expected_roots = vec![tree.root()];
        let mut proofs = Vec::with_capacity(leaves.len());

        for (i, text) in leaves.iter().enumerate() {
            let root = tree.add_leaf(&LeafValue::from_text(text)?)?;
            expected_roots.push(root);
            proofs.push(tree.get_siblings(i as u64, &root)?);
        }

        vectors.push(LeafVector {
            leaves: leaves.clone(),
            expected_roots,
            expected_count: tree.count(),
            proofs,
        });
    }

    Ok(VectorSuite { height, vectors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{Blake3Hasher, Keccak256Hasher};

    fn sets() -> Vec<Vec<String>> {
        vec![
            vec!["foo".into()],
            vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
        ]
    }

    #[test]
    fn test_generated_suite_passes() {
        let suite = generate(4, &sets(), &Keccak256Hasher, IndexOrder::LeafFirst).unwrap();
        assert_eq!(suite.vectors[1].expected_roots.len(), 6);
        assert_eq!(suite.vectors[1].expected_count, 5);
        assert_eq!(run(&suite, &Keccak256Hasher, IndexOrder::LeafFirst).unwrap(), 2);
    }

    #[test]
    fn test_suite_json_field_names() {
        let suite = generate(2, &sets()[..1], &Blake3Hasher, IndexOrder::LeafFirst).unwrap();
        let json = suite.to_json().unwrap();
        assert!(json.contains("expectedRoots"));
        assert!(json.contains("prooves"));
        assert_eq!(VectorSuite::from_json(&json).unwrap(), suite);
    }

    #[test]
    fn test_wrong_hasher_reports_mismatch() {
        let suite = generate(4, &sets(), &Keccak256Hasher, IndexOrder::LeafFirst).unwrap();
        let err = run(&suite, &Blake3Hasher, IndexOrder::LeafFirst).unwrap_err();
        assert!(matches!(err, Error::VectorMismatch(_)));
    }

    #[test]
    fn test_wrong_order_reports_mismatch() {
        let suite = generate(4, &sets(), &Keccak256Hasher, IndexOrder::LeafFirst).unwrap();
        let err = run(&suite, &Keccak256Hasher, IndexOrder::RootFirst).unwrap_err();
        assert!(matches!(err, Error::VectorMismatch(_)));
    }
}
