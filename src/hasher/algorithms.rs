//! Concrete hash functions

use super::Hasher;
use crate::model::{Digest, LeafValue};
use serde::{Deserialize, Serialize};
use sha2::Digest as _;

const LEAF_TAG: u8 = 0x00;
const NODE_TAG: u8 = 0x01;

/// BLAKE3 with a one-byte domain tag separating leaves from internal nodes
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Hasher;

impl Hasher for Blake3Hasher {
    fn hash_leaf(&self, leaf: &LeafValue) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[LEAF_TAG]);
        hasher.update(leaf.as_bytes());
        Digest::from_bytes(*hasher.finalize().as_bytes())
    }

    fn combine(&self, left: &Digest, right: &Digest) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[NODE_TAG]);
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        Digest::from_bytes(*hasher.finalize().as_bytes())
    }

    fn name(&self) -> &'static str {
        "blake3"
    }
}

/// Keccak-256 over the raw bytes, `keccak256(left || right)` for parents
///
/// This is the EVM convention, so roots can be checked by bridge contracts.
#[derive(Clone, Copy, Debug, Default)]
pub struct Keccak256Hasher;

impl Hasher for Keccak256Hasher {
    fn hash_leaf(&self, leaf: &LeafValue) -> Digest {
        let mut hasher = sha3::Keccak256::new();
        hasher.update(leaf.as_bytes());
        Digest::from_bytes(hasher.finalize().into())
    }

    fn combine(&self, left: &Digest, right: &Digest) -> Digest {
        let mut hasher = sha3::Keccak256::new();
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        Digest::from_bytes(hasher.finalize().into())
    }

    fn name(&self) -> &'static str {
        "keccak256"
    }
}

/// SHA-256 over the raw bytes
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn hash_leaf(&self, leaf: &LeafValue) -> Digest {
        Digest::from_bytes(sha2::Sha256::digest(leaf.as_bytes()).into())
    }

    fn combine(&self, left: &Digest, right: &Digest) -> Digest {
        let mut hasher = sha2::Sha256::new();
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        Digest::from_bytes(hasher.finalize().into())
    }

    fn name(&self) -> &'static str {
        "sha256"
    }
}

/// Runtime selection of a hash function (config files, CLI flags)
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HasherKind {
    #[default]
    Blake3,
    Keccak256,
    Sha256,
}

impl Hasher for HasherKind {
    fn hash_leaf(&self, leaf: &LeafValue) -> Digest {
        match self {
            HasherKind::Blake3 => Blake3Hasher.hash_leaf(leaf),
            HasherKind::Keccak256 => Keccak256Hasher.hash_leaf(leaf),
            HasherKind::Sha256 => Sha256Hasher.hash_leaf(leaf),
        }
    }

    fn combine(&self, left: &Digest, right: &Digest) -> Digest {
        match self {
            HasherKind::Blake3 => Blake3Hasher.combine(left, right),
            HasherKind::Keccak256 => Keccak256Hasher.combine(left, right),
            HasherKind::Sha256 => Sha256Hasher.combine(left, right),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            HasherKind::Blake3 => Blake3Hasher.name(),
            HasherKind::Keccak256 => Keccak256Hasher.name(),
            HasherKind::Sha256 => Sha256Hasher.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(b: u8) -> Digest {
        Digest::from_bytes([b; 32])
    }

    #[test]
    fn test_combine_is_deterministic() {
        for kind in [HasherKind::Blake3, HasherKind::Keccak256, HasherKind::Sha256] {
            assert_eq!(kind.combine(&d(1), &d(2)), kind.combine(&d(1), &d(2)));
        }
    }

    #[test]
    fn test_combine_is_order_sensitive() {
        for kind in [HasherKind::Blake3, HasherKind::Keccak256, HasherKind::Sha256] {
            assert_ne!(kind.combine(&d(1), &d(2)), kind.combine(&d(2), &d(1)));
        }
    }

    #[test]
    fn test_keccak_empty_leaf_known_value() {
        // keccak256 of 32 zero bytes
        let expected =
            Digest::from_hex("290decd9548b62a8d60345a988386fc84ba6bc95484008f6362f93160ef3e563")
                .unwrap();
        assert_eq!(Keccak256Hasher.hash_leaf(&LeafValue::ZERO), expected);
    }

    #[test]
    fn test_sha256_empty_leaf_known_value() {
        // sha256 of 32 zero bytes
        let expected =
            Digest::from_hex("66687aadf862bd776c8fc18b8e9f8e20089714856ee233b3902a591d0d5f2925")
                .unwrap();
        assert_eq!(Sha256Hasher.hash_leaf(&LeafValue::ZERO), expected);
    }

    #[test]
    fn test_blake3_leaf_and_node_domains_differ() {
        // a 64-byte leaf cannot exist, but the tag must still separate the domains
        let leaf = LeafValue::from_bytes(&[0u8; 32]).unwrap();
        let as_leaf = Blake3Hasher.hash_leaf(&leaf);
        let raw = Digest::from_bytes(*blake3::hash(leaf.as_bytes()).as_bytes());
        assert_ne!(as_leaf, raw);
    }

    #[test]
    fn test_kind_matches_concrete_hasher() {
        let leaf = LeafValue::from_text("foo").unwrap();
        assert_eq!(HasherKind::Keccak256.hash_leaf(&leaf), Keccak256Hasher.hash_leaf(&leaf));
        assert_eq!(HasherKind::Blake3.name(), "blake3");
    }

    #[test]
    fn test_kind_serde_lowercase() {
        let json = serde_json::to_string(&HasherKind::Keccak256).unwrap();
        assert_eq!(json, "\"keccak256\"");
    }
}
