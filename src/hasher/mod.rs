//! Pluggable hash functions and the empty-subtree table
//!
//! The tree only ever asks two things of a hash function: how to turn a leaf
//! value into a digest, and how to combine two child digests into a parent.

mod algorithms;
mod traits;
mod zero;

pub use algorithms::{Blake3Hasher, HasherKind, Keccak256Hasher, Sha256Hasher};
pub use traits::Hasher;
pub use zero::ZeroHashes;
