//! Node stores: where the tree keeps its internal nodes and root history
//!
//! Every record is namespaced by [`NetworkId`]. Nodes are content-addressed
//! (digest → children) and never mutated; root records map each produced root
//! to the leaf count at which it appeared.

mod file_store;
mod index;
mod memory;
mod record;

pub use file_store::FileStore;
pub use memory::MemoryStore;

use crate::model::{Digest, NetworkId, RootRecord, TreeNode};
use crate::Result;
use std::sync::Arc;

/// Persistence contract consumed by [`crate::MerkleTree`]
///
/// Implementations must give read-your-writes consistency within a network.
/// Retries for transient failures, if any, belong inside the implementation.
pub trait NodeStore: Send + Sync {
    /// Look up the children of an internal node
    fn get_node(&self, network: NetworkId, digest: &Digest) -> Result<Option<TreeNode>>;

    /// Store an internal node. Re-putting identical children is a no-op.
    fn put_node(&self, network: NetworkId, digest: &Digest, node: &TreeNode) -> Result<()>;

    /// Record that `record.root` was produced at `record.count`
    fn put_root_record(&self, network: NetworkId, record: RootRecord) -> Result<()>;

    /// Leaf count at which `root` was produced
    fn get_root_count(&self, network: NetworkId, root: &Digest) -> Result<Option<u64>>;

    /// Root record with the highest count
    fn get_latest_root(&self, network: NetworkId) -> Result<Option<RootRecord>>;

    /// Make prior writes durable
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

impl<S: NodeStore + ?Sized> NodeStore for Arc<S> {
    fn get_node(&self, network: NetworkId, digest: &Digest) -> Result<Option<TreeNode>> {
        (**self).get_node(network, digest)
    }

    fn put_node(&self, network: NetworkId, digest: &Digest, node: &TreeNode) -> Result<()> {
        (**self).put_node(network, digest, node)
    }

    fn put_root_record(&self, network: NetworkId, record: RootRecord) -> Result<()> {
        (**self).put_root_record(network, record)
    }

    fn get_root_count(&self, network: NetworkId, root: &Digest) -> Result<Option<u64>> {
        (**self).get_root_count(network, root)
    }

    fn get_latest_root(&self, network: NetworkId) -> Result<Option<RootRecord>> {
        (**self).get_latest_root(network)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }
}

impl<S: NodeStore + ?Sized> NodeStore for &S {
    fn get_node(&self, network: NetworkId, digest: &Digest) -> Result<Option<TreeNode>> {
        (**self).get_node(network, digest)
    }

    fn put_node(&self, network: NetworkId, digest: &Digest, node: &TreeNode) -> Result<()> {
        (**self).put_node(network, digest, node)
    }

    fn put_root_record(&self, network: NetworkId, record: RootRecord) -> Result<()> {
        (**self).put_root_record(network, record)
    }

    fn get_root_count(&self, network: NetworkId, root: &Digest) -> Result<Option<u64>> {
        (**self).get_root_count(network, root)
    }

    fn get_latest_root(&self, network: NetworkId) -> Result<Option<RootRecord>> {
        (**self).get_latest_root(network)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }
}
