//! Network identifier scoping every tree and every persisted record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a logical network; one tree per network
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NetworkId(pub u32);

impl NetworkId {
    pub fn new(id: u32) -> Self {
        NetworkId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NetworkId {
    fn from(id: u32) -> Self {
        NetworkId(id)
    }
}
