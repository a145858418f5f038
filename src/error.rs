//! Error types for bridgetree

use crate::model::{Digest, NetworkId};
use thiserror::Error;

/// Result type alias for bridgetree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bridgetree operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid tree height {height}: must be between 1 and {max}")]
    InvalidHeight { height: u8, max: u8 },

    #[error("Invalid leaf encoding: {len} bytes exceeds the {max}-byte limit")]
    InvalidLeafEncoding { len: usize, max: usize },

    #[error("Tree for network {network} is full ({capacity} leaves)")]
    TreeFull { network: NetworkId, capacity: u64 },

    #[error("Unknown root {root} for network {network}")]
    UnknownRoot { network: NetworkId, root: Digest },

    #[error("Leaf index {index} out of range for network {network}: root commits {count} leaves")]
    IndexOutOfRange {
        network: NetworkId,
        index: u64,
        count: u64,
    },

    #[error("Corrupt tree for network {network} at {digest}: {reason}")]
    CorruptTree {
        network: NetworkId,
        digest: Digest,
        reason: String,
    },

    #[error("Root {root} already recorded for network {network} at count {count}")]
    DuplicateRoot {
        network: NetworkId,
        root: Digest,
        count: u64,
    },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Test vector mismatch: {0}")]
    VectorMismatch(String),
}
