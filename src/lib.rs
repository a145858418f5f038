//! # bridgetree
//!
//! A fixed-height, append-only Merkle accumulator for cross-chain bridges.
//!
//! Leaves (deposit or exit commitments) are appended one at a time. Every
//! root the tree ever produces is recorded with the leaf count it was
//! produced at, and internal nodes are stored by content address, so proofs
//! can be served against any historical root, not only the current one.
//!
//! ## Core Concepts
//!
//! - **Digest**: fixed-width hash output, the value of every node
//! - **Node store**: content-addressed children lookup plus a root → count index
//! - **Network**: every tree and every stored record is scoped by a [`NetworkId`]
//! - **Proof**: sibling digests from the leaf level up to the root
//!
//! ## Example
//!
//! ```
//! use bridgetree::{Keccak256Hasher, LeafValue, MemoryStore, MerkleTree, NetworkId};
//!
//! let mut tree = MerkleTree::load(MemoryStore::new(), Keccak256Hasher, NetworkId(1), 4)?;
//! let root = tree.add_leaf(&LeafValue::from_text("foo")?)?;
//! assert_eq!(tree.root_index_of(&root)?, 1);
//! let proof = tree.get_proof(0, &root)?;
//! assert_eq!(proof.siblings.len(), 4);
//! # Ok::<(), bridgetree::Error>(())
//! ```

pub mod config;
pub mod hasher;
pub mod model;
pub mod store;
pub mod tree;
pub mod vectors;

mod error;

pub use config::Config;
pub use error::{Error, Result};
pub use hasher::{Blake3Hasher, Hasher, HasherKind, Keccak256Hasher, Sha256Hasher, ZeroHashes};
pub use model::{Digest, LeafValue, NetworkId, RootRecord, TreeNode, DIGEST_LEN, KEY_LEN};
pub use store::{FileStore, MemoryStore, NodeStore};
pub use tree::{IndexOrder, MerkleProof, MerkleTree, TreeReader, MAX_HEIGHT};

/// Store file format version
pub const VERSION: u32 = 1;

/// Magic bytes for store file identification
pub const MAGIC: &[u8; 8] = b"BRDGTREE";
