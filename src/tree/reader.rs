//! Read side of the tree: root lookups and historical proofs

use super::{IndexOrder, MerkleProof};
use crate::hasher::ZeroHashes;
use crate::model::{Digest, NetworkId};
use crate::store::NodeStore;
use crate::{Error, Result};

/// Read-only view of one network's tree
///
/// Every persisted node and root record is immutable, so a reader can run
/// alongside the writer and always sees a consistent snapshot: the one named
/// by the root it asks about.
#[derive(Clone)]
pub struct TreeReader<S> {
    store: S,
    zeros: ZeroHashes,
    network: NetworkId,
    order: IndexOrder,
}

impl<S: NodeStore> TreeReader<S> {
    pub(crate) fn new(store: S, zeros: ZeroHashes, network: NetworkId, order: IndexOrder) -> Self {
        TreeReader {
            store,
            zeros,
            network,
            order,
        }
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn height(&self) -> u8 {
        self.zeros.height()
    }

    pub fn order(&self) -> IndexOrder {
        self.order
    }

    pub fn zero_hashes(&self) -> &ZeroHashes {
        &self.zeros
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Leaf count at which `root` was produced
    pub fn root_index_of(&self, root: &Digest) -> Result<u64> {
        self.store
            .get_root_count(self.network, root)?
            .ok_or(Error::UnknownRoot {
                network: self.network,
                root: *root,
            })
    }

    /// Authentication path for leaf `index` under the historical `root`
    pub fn get_proof(&self, index: u64, root: &Digest) -> Result<MerkleProof> {
        let count = self.root_index_of(root)?;
        if index >= count {
            return Err(Error::IndexOutOfRange {
                network: self.network,
                index,
                count,
            });
        }

        let siblings = self.path(root, index)?;
        tracing::debug!(
            network = %self.network,
            index,
            root = %root.short(),
            "built proof"
        );

        Ok(MerkleProof {
            leaf_index: index,
            root: *root,
            siblings,
        })
    }

    /// Sibling digests for leaf `index` under `root`, leaf level first
    pub fn get_siblings(&self, index: u64, root: &Digest) -> Result<Vec<Digest>> {
        Ok(self.get_proof(index, root)?.siblings)
    }

    /// Walk from `root` down to slot `index`, collecting siblings.
    ///
    /// Performs no range check: the writer also uses this to find the
    /// siblings of the next, still empty, slot.
    pub(crate) fn path(&self, root: &Digest, index: u64) -> Result<Vec<Digest>> {
        let height = self.height();
        let mut siblings = vec![Digest::ZERO; height as usize];
        let mut current = *root;

        for level in (0..height).rev() {
            // `current` is the node at `level + 1` on the path
            if self.zeros.is_zero(level + 1, &current) {
                for (l, slot) in siblings.iter_mut().enumerate().take(level as usize + 1) {
                    *slot = self.zeros.get(l as u8);
                }
                break;
            }

            let node = self
                .store
                .get_node(self.network, &current)?
                .ok_or_else(|| Error::CorruptTree {
                    network: self.network,
                    digest: current,
                    reason: format!("missing node at level {}", level + 1),
                })?;

            let (next, sibling) = node.split(self.order.is_right(index, level, height));
            siblings[level as usize] = sibling;
            current = next;
        }

        Ok(siblings)
    }
}
