//! Trees persisted in a store file survive process restarts
//!
//! Run with:
//! ```bash
//! cargo test --test file_store_reopen
//! ```

use bridgetree::{
    Error, FileStore, IndexOrder, Keccak256Hasher, LeafValue, MerkleTree, NetworkId, NodeStore,
};
use std::sync::Arc;
use tempfile::tempdir;

fn leaf(i: usize) -> LeafValue {
    LeafValue::from_text(&format!("exit-{}", i)).unwrap()
}

#[test]
fn test_history_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tree.db");

    let mut roots = Vec::new();
    {
        let store = FileStore::create(&path).unwrap();
        let mut tree = MerkleTree::load(store, Keccak256Hasher, NetworkId(1), 8).unwrap();
        roots.push(tree.root());
        for i in 0..20 {
            roots.push(tree.add_leaf(&leaf(i)).unwrap());
        }
        tree.flush().unwrap();
    }

    let store = FileStore::open(&path).unwrap();
    let mut tree = MerkleTree::load(store, Keccak256Hasher, NetworkId(1), 8).unwrap();
    assert_eq!(tree.count(), 20);
    assert_eq!(tree.root(), roots[20]);

    for (k, root) in roots.iter().enumerate() {
        assert_eq!(tree.root_index_of(root).unwrap(), k as u64);
    }
    let proof = tree.get_proof(3, &roots[7]).unwrap();
    assert!(proof.verify_leaf(&Keccak256Hasher, &leaf(3), IndexOrder::LeafFirst));

    // Appending continues where the previous process stopped
    let next = tree.add_leaf(&leaf(20)).unwrap();
    assert_eq!(tree.root_index_of(&next).unwrap(), 21);
}

#[test]
fn test_networks_share_a_file_without_sharing_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tree.db");

    {
        let store = Arc::new(FileStore::create(&path).unwrap());
        let mut a = MerkleTree::load(store.clone(), Keccak256Hasher, NetworkId(1), 4).unwrap();
        let mut b = MerkleTree::load(store.clone(), Keccak256Hasher, NetworkId(2), 4).unwrap();
        a.add_leaf(&leaf(0)).unwrap();
        a.add_leaf(&leaf(1)).unwrap();
        b.add_leaf(&leaf(9)).unwrap();
    }

    let store = Arc::new(FileStore::open(&path).unwrap());
    let a = MerkleTree::load(store.clone(), Keccak256Hasher, NetworkId(1), 4).unwrap();
    let b = MerkleTree::load(store.clone(), Keccak256Hasher, NetworkId(2), 4).unwrap();
    assert_eq!(a.count(), 2);
    assert_eq!(b.count(), 1);
    assert!(matches!(
        b.root_index_of(&a.root()),
        Err(Error::UnknownRoot { .. })
    ));
    assert_eq!(store.get_latest_root(NetworkId(3)).unwrap(), None);
}

#[test]
fn test_sync_writes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tree.db");
    let store = FileStore::create(&path).unwrap().with_sync_writes(true);
    let mut tree = MerkleTree::load(store, Keccak256Hasher, NetworkId(1), 4).unwrap();
    let root = tree.add_leaf(&leaf(0)).unwrap();
    drop(tree);

    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get_root_count(NetworkId(1), &root).unwrap(), Some(1));
    assert!(store.node_count() >= 4);
}
