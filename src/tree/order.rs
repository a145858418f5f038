//! Mapping from leaf-index bits to left/right choices

use serde::{Deserialize, Serialize};

/// Which end of the leaf index selects the side at the leaf level
///
/// Level `k` below means "combining two children at level `k`", with level 0
/// being the leaves themselves.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum IndexOrder {
    /// Bit `k` of the index picks the side at level `k`. Leaves fill the
    /// tree left to right.
    #[default]
    LeafFirst,
    /// Bit `k` of the index picks the side at level `height - 1 - k`.
    RootFirst,
}

impl IndexOrder {
    /// Whether the path to leaf `index` is the right child at `level`
    pub fn is_right(&self, index: u64, level: u8, height: u8) -> bool {
        let bit = match self {
            IndexOrder::LeafFirst => level,
            IndexOrder::RootFirst => height - 1 - level,
        };
        (index >> bit) & 1 == 1
    }
}
