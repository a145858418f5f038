//! In-memory root history shared by the store implementations

use crate::model::{Digest, NetworkId, RootRecord, TreeNode};
use crate::{Error, Result};
use std::collections::HashMap;

/// Root → count lookups plus the latest record per network
#[derive(Default)]
pub(crate) struct RootIndex {
    counts: HashMap<(NetworkId, Digest), u64>,
    latest: HashMap<NetworkId, RootRecord>,
}

impl RootIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a new record against the history.
    ///
    /// Returns `Ok(false)` when the exact record is already present.
    pub fn check(&self, network: NetworkId, record: &RootRecord) -> Result<bool> {
        if let Some(&count) = self.counts.get(&(network, record.root)) {
            if count == record.count {
                return Ok(false);
            }
            return Err(Error::DuplicateRoot {
                network,
                root: record.root,
                count,
            });
        }
        if let Some(latest) = self.latest.get(&network) {
            if record.count <= latest.count {
                return Err(Error::Storage(format!(
                    "root record count {} for network {} does not follow latest count {}",
                    record.count, network, latest.count
                )));
            }
        }
        Ok(true)
    }

    pub fn insert(&mut self, network: NetworkId, record: RootRecord) {
        self.counts.insert((network, record.root), record.count);
        let replace = self
            .latest
            .get(&network)
            .map(|l| record.count > l.count)
            .unwrap_or(true);
        if replace {
            self.latest.insert(network, record);
        }
    }

    pub fn count_of(&self, network: NetworkId, root: &Digest) -> Option<u64> {
        self.counts.get(&(network, *root)).copied()
    }

    pub fn latest(&self, network: NetworkId) -> Option<RootRecord> {
        self.latest.get(&network).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }
}

/// Validate a node write against an existing entry for the same digest.
///
/// Identical children are a no-op; different children mean two parents hash
/// to one digest, which the content addressing cannot represent.
pub(crate) fn check_node(
    network: NetworkId,
    digest: &Digest,
    existing: &TreeNode,
    new: &TreeNode,
) -> Result<()> {
    if existing == new {
        Ok(())
    } else {
        Err(Error::CorruptTree {
            network,
            digest: *digest,
            reason: "node already stored with different children".into(),
        })
    }
}
