//! Hasher trait definition

use crate::model::{Digest, LeafValue};

/// Trait for the tree's hash function
///
/// Implementations must be deterministic and side-effect free. Digest width
/// is fixed at [`crate::model::DIGEST_LEN`] bytes.
pub trait Hasher: Send + Sync {
    /// Hash an encoded leaf into a level-0 digest
    fn hash_leaf(&self, leaf: &LeafValue) -> Digest;

    /// Combine a left and a right child into their parent
    fn combine(&self, left: &Digest, right: &Digest) -> Digest;

    /// Short identifier, used in logs and config
    fn name(&self) -> &'static str;
}

impl<H: Hasher + ?Sized> Hasher for &H {
    fn hash_leaf(&self, leaf: &LeafValue) -> Digest {
        (**self).hash_leaf(leaf)
    }

    fn combine(&self, left: &Digest, right: &Digest) -> Digest {
        (**self).combine(left, right)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<H: Hasher + ?Sized> Hasher for Box<H> {
    fn hash_leaf(&self, leaf: &LeafValue) -> Digest {
        (**self).hash_leaf(leaf)
    }

    fn combine(&self, left: &Digest, right: &Digest) -> Digest {
        (**self).combine(left, right)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
