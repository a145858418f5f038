//! Record framing for the file store log

use crate::model::{Digest, NetworkId, RootRecord, TreeNode};
use crate::{Error, Result};

/// Bytes in a record header: type tag + body length (u32 LE)
pub(crate) const RECORD_HEADER_LEN: usize = 5;

/// Type tag for log records
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RecordType {
    /// An internal node (digest → children)
    Node,
    /// A root record (digest → count)
    Root,
}

impl RecordType {
    pub fn as_byte(&self) -> u8 {
        match self {
            RecordType::Node => 1,
            RecordType::Root => 2,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(RecordType::Node),
            2 => Some(RecordType::Root),
            _ => None,
        }
    }
}

/// A decoded log record
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Record {
    Node {
        network: NetworkId,
        digest: Digest,
        node: TreeNode,
    },
    Root {
        network: NetworkId,
        record: RootRecord,
    },
}

impl Record {
    pub fn record_type(&self) -> RecordType {
        match self {
            Record::Node { .. } => RecordType::Node,
            Record::Root { .. } => RecordType::Root,
        }
    }

    /// Frame the record as `[type][len][body]`
    pub fn encode(&self) -> Result<Vec<u8>> {
        let body = match self {
            Record::Node {
                network,
                digest,
                node,
            } => bincode::serialize(&(network, digest, node))?,
            Record::Root { network, record } => bincode::serialize(&(network, record))?,
        };

        let mut output = Vec::with_capacity(RECORD_HEADER_LEN + body.len());
        output.push(self.record_type().as_byte());
        output.extend_from_slice(&(body.len() as u32).to_le_bytes());
        output.extend(body);
        Ok(output)
    }

    /// Parse a record header into its type and body length
    pub fn decode_header(header: &[u8; RECORD_HEADER_LEN]) -> Result<(RecordType, u32)> {
        let record_type = RecordType::from_byte(header[0])
            .ok_or_else(|| Error::Storage(format!("Invalid record type: {}", header[0])))?;
        let len = u32::from_le_bytes([header[1], header[2], header[3], header[4]]);
        Ok((record_type, len))
    }

    /// Decode a record body of the given type
    pub fn decode_body(record_type: RecordType, body: &[u8]) -> Result<Self> {
        Ok(match record_type {
            RecordType::Node => {
                let (network, digest, node) = bincode::deserialize(body)?;
                Record::Node {
                    network,
                    digest,
                    node,
                }
            }
            RecordType::Root => {
                let (network, record) = bincode::deserialize(body)?;
                Record::Root { network, record }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_framing() {
        let record = Record::Root {
            network: NetworkId(3),
            record: RootRecord::new(Digest::from_bytes([4u8; 32]), 9),
        };
        let bytes = record.encode().unwrap();

        let mut header = [0u8; RECORD_HEADER_LEN];
        header.copy_from_slice(&bytes[..RECORD_HEADER_LEN]);
        let (record_type, len) = Record::decode_header(&header).unwrap();

        assert_eq!(record_type, RecordType::Root);
        assert_eq!(len as usize, bytes.len() - RECORD_HEADER_LEN);
        assert_eq!(
            Record::decode_body(record_type, &bytes[RECORD_HEADER_LEN..]).unwrap(),
            record
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let header = [0xffu8, 0, 0, 0, 0];
        assert!(matches!(Record::decode_header(&header), Err(Error::Storage(_))));
    }
}
