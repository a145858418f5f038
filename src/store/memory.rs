//! In-memory node store

use super::index::{check_node, RootIndex};
use super::NodeStore;
use crate::model::{Digest, NetworkId, RootRecord, TreeNode};
use crate::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A node store that lives for the duration of the process
///
/// Used by tests, the test-vector runner, and callers that rebuild the tree
/// from an external log on startup.
#[derive(Default)]
pub struct MemoryStore {
    nodes: RwLock<HashMap<(NetworkId, Digest), TreeNode>>,
    roots: RwLock<RootIndex>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored internal nodes across all networks
    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    /// Number of root records across all networks
    pub fn root_count(&self) -> usize {
        self.roots.read().len()
    }
}

impl NodeStore for MemoryStore {
    fn get_node(&self, network: NetworkId, digest: &Digest) -> Result<Option<TreeNode>> {
        Ok(self.nodes.read().get(&(network, *digest)).copied())
    }

    fn put_node(&self, network: NetworkId, digest: &Digest, node: &TreeNode) -> Result<()> {
        let mut nodes = self.nodes.write();
        if let Some(existing) = nodes.get(&(network, *digest)) {
            return check_node(network, digest, existing, node);
        }
        nodes.insert((network, *digest), *node);
        Ok(())
    }

    fn put_root_record(&self, network: NetworkId, record: RootRecord) -> Result<()> {
        let mut roots = self.roots.write();
        if roots.check(network, &record)? {
            roots.insert(network, record);
        }
        Ok(())
    }

    fn get_root_count(&self, network: NetworkId, root: &Digest) -> Result<Option<u64>> {
        Ok(self.roots.read().count_of(network, root))
    }

    fn get_latest_root(&self, network: NetworkId) -> Result<Option<RootRecord>> {
        Ok(self.roots.read().latest(network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn d(b: u8) -> Digest {
        Digest::from_bytes([b; 32])
    }

    #[test]
    fn test_node_roundtrip_and_idempotence() {
        let store = MemoryStore::new();
        let net = NetworkId(1);
        let node = TreeNode::new(d(1), d(2));

        store.put_node(net, &d(3), &node).unwrap();
        store.put_node(net, &d(3), &node).unwrap();

        assert_eq!(store.get_node(net, &d(3)).unwrap(), Some(node));
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn test_conflicting_node_rejected() {
        let store = MemoryStore::new();
        let net = NetworkId(1);
        store.put_node(net, &d(3), &TreeNode::new(d(1), d(2))).unwrap();

        let err = store
            .put_node(net, &d(3), &TreeNode::new(d(2), d(1)))
            .unwrap_err();
        assert!(matches!(err, Error::CorruptTree { .. }));
    }

    #[test]
    fn test_nodes_scoped_by_network() {
        let store = MemoryStore::new();
        store
            .put_node(NetworkId(1), &d(3), &TreeNode::new(d(1), d(2)))
            .unwrap();
        assert_eq!(store.get_node(NetworkId(2), &d(3)).unwrap(), None);
    }

    #[test]
    fn test_root_records() {
        let store = MemoryStore::new();
        let net = NetworkId(7);
        assert_eq!(store.get_latest_root(net).unwrap(), None);

        store.put_root_record(net, RootRecord::new(d(1), 0)).unwrap();
        store.put_root_record(net, RootRecord::new(d(2), 1)).unwrap();

        assert_eq!(store.get_root_count(net, &d(1)).unwrap(), Some(0));
        assert_eq!(store.get_root_count(net, &d(2)).unwrap(), Some(1));
        assert_eq!(
            store.get_latest_root(net).unwrap(),
            Some(RootRecord::new(d(2), 1))
        );
        assert_eq!(store.root_count(), 2);
    }
}
