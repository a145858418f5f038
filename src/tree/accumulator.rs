//! Incremental append-only Merkle accumulator

use super::{IndexOrder, MerkleProof, TreeReader, MAX_HEIGHT};
use crate::hasher::{Hasher, ZeroHashes};
use crate::model::{Digest, LeafValue, NetworkId, RootRecord, TreeNode};
use crate::store::NodeStore;
use crate::{Error, Result};

/// Fixed-height, append-only Merkle tree for one network
///
/// Each insertion touches only the `height` nodes on the new leaf's path;
/// everything else is shared with earlier versions through content
/// addressing, which is what lets any historical root still produce proofs.
///
/// There must be a single writer per network. Clone a [`TreeReader`] with
/// [`MerkleTree::reader`] for concurrent queries.
pub struct MerkleTree<H, S> {
    hasher: H,
    view: TreeReader<S>,
    root: Digest,
    count: u64,
}

impl<H: Hasher, S: NodeStore> MerkleTree<H, S> {
    /// Load the tree for `network`, creating the empty tree if it has no history
    pub fn load(store: S, hasher: H, network: NetworkId, height: u8) -> Result<Self> {
        Self::load_with_order(store, hasher, network, height, IndexOrder::default())
    }

    /// [`Self::load`] with an explicit index-bit-to-side mapping
    pub fn load_with_order(
        store: S,
        hasher: H,
        network: NetworkId,
        height: u8,
        order: IndexOrder,
    ) -> Result<Self> {
        if height == 0 || height > MAX_HEIGHT {
            return Err(Error::InvalidHeight {
                height,
                max: MAX_HEIGHT,
            });
        }

        let zeros = ZeroHashes::new(&hasher, height);
        let empty_root = zeros.root();
        let capacity = 1u64 << height;

        let (root, count) = match store.get_latest_root(network)? {
            Some(latest) => {
                // The count-0 record pins the hasher and height the history was built with
                if store.get_root_count(network, &empty_root)? != Some(0) {
                    return Err(Error::CorruptTree {
                        network,
                        digest: latest.root,
                        reason: format!(
                            "history was not built with hasher {} at height {}",
                            hasher.name(),
                            height
                        ),
                    });
                }
                if latest.count > capacity {
                    return Err(Error::CorruptTree {
                        network,
                        digest: latest.root,
                        reason: format!(
                            "latest count {} exceeds capacity {}",
                            latest.count, capacity
                        ),
                    });
                }
                tracing::info!(
                    network = %network,
                    height,
                    count = latest.count,
                    root = %latest.root.short(),
                    "loaded tree"
                );
                (latest.root, latest.count)
            }
            None => {
                store.put_root_record(network, RootRecord::new(empty_root, 0))?;
                tracing::info!(
                    network = %network,
                    height,
                    hasher = hasher.name(),
                    root = %empty_root.short(),
                    "created empty tree"
                );
                (empty_root, 0)
            }
        };

        Ok(MerkleTree {
            hasher,
            view: TreeReader::new(store, zeros, network, order),
            root,
            count,
        })
    }

    /// Current root
    pub fn root(&self) -> Digest {
        self.root
    }

    /// Number of leaves inserted so far
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn height(&self) -> u8 {
        self.view.height()
    }

    pub fn network(&self) -> NetworkId {
        self.view.network()
    }

    pub fn order(&self) -> IndexOrder {
        self.view.order()
    }

    /// Maximum number of leaves (`2^height`)
    pub fn capacity(&self) -> u64 {
        1u64 << self.height()
    }

    pub fn zero_hashes(&self) -> &ZeroHashes {
        self.view.zero_hashes()
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn store(&self) -> &S {
        self.view.store()
    }

    /// Append a leaf and return the new root
    ///
    /// Nodes are written before the root record, so a failure part way
    /// through never exposes a new latest root.
    pub fn add_leaf(&mut self, value: &LeafValue) -> Result<Digest> {
        let network = self.network();
        let height = self.height();
        let order = self.order();

        if self.count >= self.capacity() {
            return Err(Error::TreeFull {
                network,
                capacity: self.capacity(),
            });
        }

        let index = self.count;
        let siblings = self.view.path(&self.root, index)?;

        let mut current = self.hasher.hash_leaf(value);
        let mut nodes = Vec::with_capacity(height as usize);
        for (level, sibling) in siblings.iter().enumerate() {
            let node = if order.is_right(index, level as u8, height) {
                TreeNode::new(*sibling, current)
            } else {
                TreeNode::new(current, *sibling)
            };
            current = self.hasher.combine(&node.left, &node.right);
            nodes.push((current, node));
        }

        if let Some(existing) = self.view.store().get_root_count(network, &current)? {
            return Err(Error::DuplicateRoot {
                network,
                root: current,
                count: existing,
            });
        }

        let store = self.view.store();
        for (digest, node) in &nodes {
            store.put_node(network, digest, node)?;
        }
        store.put_root_record(network, RootRecord::new(current, index + 1))?;

        self.root = current;
        self.count = index + 1;

        tracing::debug!(
            network = %network,
            index,
            root = %current.short(),
            "added leaf"
        );

        Ok(current)
    }

    /// Append leaves in order, stopping at the first failure
    pub fn add_leaves<'a>(
        &mut self,
        values: impl IntoIterator<Item = &'a LeafValue>,
    ) -> Result<Digest> {
        for value in values {
            self.add_leaf(value)?;
        }
        Ok(self.root)
    }

    /// Leaf count at which `root` was produced
    pub fn root_index_of(&self, root: &Digest) -> Result<u64> {
        self.view.root_index_of(root)
    }

    /// Authentication path for leaf `index` under the historical `root`
    pub fn get_proof(&self, index: u64, root: &Digest) -> Result<MerkleProof> {
        self.view.get_proof(index, root)
    }

    /// Sibling digests for leaf `index` under `root`, leaf level first
    pub fn get_siblings(&self, index: u64, root: &Digest) -> Result<Vec<Digest>> {
        self.view.get_siblings(index, root)
    }

    /// Make every insertion so far durable
    pub fn flush(&self) -> Result<()> {
        self.view.store().flush()
    }
}

impl<H, S: Clone> MerkleTree<H, S> {
    /// A read-only handle sharing this tree's store
    pub fn reader(&self) -> TreeReader<S> {
        self.view.clone()
    }
}
