//! The append-only Merkle accumulator
//!
//! - [`MerkleTree`] owns the single writer for one network: it appends leaves
//!   and records every root it produces.
//! - [`TreeReader`] answers root lookups and historical proofs; it holds no
//!   mutable state and can be cloned onto other threads.
//! - [`MerkleProof`] verifies a path without any store.

mod accumulator;
mod order;
mod proof;
mod reader;

pub use accumulator::MerkleTree;
pub use order::IndexOrder;
pub use proof::MerkleProof;
pub use reader::TreeReader;

/// Largest supported height: leaf counts up to `2^height` must fit in a `u64`
pub const MAX_HEIGHT: u8 = 63;
