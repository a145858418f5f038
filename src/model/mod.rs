//! Core data model types for bridgetree

mod hash;
mod leaf;
mod network;
mod node;

pub use hash::{Digest, DIGEST_LEN};
pub use leaf::{LeafValue, KEY_LEN};
pub use network::NetworkId;
pub use node::{RootRecord, TreeNode};
