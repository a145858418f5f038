//! Fixed-width leaf values and their encoding from caller input
//!
//! Encoding is deliberately separate from hashing: a [`LeafValue`] is the
//! padded, validated byte array, and turning it into a digest is the
//! [`crate::Hasher`]'s job.

use crate::{Error, Result};
use std::fmt;

/// Width in bytes of every leaf value
pub const KEY_LEN: usize = 32;

/// A leaf value, zero-padded to [`KEY_LEN`] bytes
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeafValue([u8; KEY_LEN]);

impl LeafValue {
    /// The all-zero leaf (what an empty slot hashes from)
    pub const ZERO: LeafValue = LeafValue([0u8; KEY_LEN]);

    /// Copy `bytes` to the front of a `KEY_LEN` array, zero-filling the rest
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > KEY_LEN {
            return Err(Error::InvalidLeafEncoding {
                len: bytes.len(),
                max: KEY_LEN,
            });
        }
        let mut arr = [0u8; KEY_LEN];
        arr[..bytes.len()].copy_from_slice(bytes);
        Ok(LeafValue(arr))
    }

    /// Encode text as a bytes32 string: at most `KEY_LEN - 1` bytes so the
    /// value always keeps a trailing zero terminator
    pub fn from_text(text: &str) -> Result<Self> {
        let bytes = text.as_bytes();
        if bytes.len() > KEY_LEN - 1 {
            return Err(Error::InvalidLeafEncoding {
                len: bytes.len(),
                max: KEY_LEN - 1,
            });
        }
        Self::from_bytes(bytes)
    }

    /// Decode a hex string (optional `0x` prefix) and pad it like [`Self::from_bytes`]
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| Error::InvalidHash(format!("{}: {}", s, e)))?;
        Self::from_bytes(&bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Check if this is the all-zero leaf
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; KEY_LEN]
    }
}

impl From<[u8; KEY_LEN]> for LeafValue {
    fn from(bytes: [u8; KEY_LEN]) -> Self {
        LeafValue(bytes)
    }
}

impl fmt::Debug for LeafValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LeafValue({})", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_is_zero_padded() {
        let leaf = LeafValue::from_bytes(b"foo").unwrap();
        assert_eq!(&leaf.as_bytes()[..3], b"foo");
        assert!(leaf.as_bytes()[3..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_full_width_input_accepted() {
        let leaf = LeafValue::from_bytes(&[0xffu8; KEY_LEN]).unwrap();
        assert_eq!(leaf.as_bytes(), &[0xffu8; KEY_LEN]);
    }

    #[test]
    fn test_oversized_input_rejected() {
        let err = LeafValue::from_bytes(&[1u8; KEY_LEN + 1]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidLeafEncoding { len, max } if len == KEY_LEN + 1 && max == KEY_LEN
        ));
    }

    #[test]
    fn test_text_keeps_terminator() {
        assert!(LeafValue::from_text(&"a".repeat(KEY_LEN - 1)).is_ok());
        assert!(matches!(
            LeafValue::from_text(&"a".repeat(KEY_LEN)),
            Err(Error::InvalidLeafEncoding { .. })
        ));
    }

    #[test]
    fn test_hex_input() {
        let leaf = LeafValue::from_hex("0x0102").unwrap();
        assert_eq!(&leaf.as_bytes()[..2], &[1, 2]);
        assert!(matches!(LeafValue::from_hex("zz"), Err(Error::InvalidHash(_))));
    }

    #[test]
    fn test_empty_input_is_zero_leaf() {
        assert!(LeafValue::from_bytes(&[]).unwrap().is_zero());
        assert_eq!(LeafValue::from_text("").unwrap(), LeafValue::ZERO);
    }
}
