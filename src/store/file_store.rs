//! Single-file, append-only node store
//!
//! File format:
//! ```text
//! [HEADER: 64 bytes]
//!   - magic: 8 bytes ("BRDGTREE")
//!   - version: 4 bytes (u32 LE)
//!   - reserved: 52 bytes
//!
//! [RECORDS: variable]
//!   - type: 1 byte (1 = node, 2 = root)
//!   - body_len: 4 bytes (u32 LE)
//!   - body: bincode (network, digest, children) or (network, root record)
//! ```
//!
//! The log is replayed into memory on open. Node bodies stay on disk and are
//! read back by offset; root records are small and kept entirely in memory.
//! A torn trailing record is cut off, so a crash during an insertion leaves
//! at most some unreferenced nodes and never a half-written root record.

use super::index::{check_node, RootIndex};
use super::record::{Record, RecordType, RECORD_HEADER_LEN};
use super::NodeStore;
use crate::model::{Digest, NetworkId, RootRecord, TreeNode};
use crate::{Error, Result, MAGIC, VERSION};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

const HEADER_SIZE: u64 = 64;

/// Location of a node body in the file
#[derive(Clone, Copy, Debug)]
struct IndexEntry {
    offset: u64,
    size: u32,
}

/// A node store backed by a single append-only file
pub struct FileStore {
    /// Path to the store file
    path: PathBuf,
    /// The file handle
    file: RwLock<File>,
    /// Node locations
    index: RwLock<HashMap<(NetworkId, Digest), IndexEntry>>,
    /// Root history
    roots: RwLock<RootIndex>,
    /// Current append position
    write_offset: RwLock<u64>,
    /// fsync after every root record
    sync_writes: bool,
}

impl FileStore {
    /// Create a new store file, truncating any existing one
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| unavailable(&path, e))?;

        let mut header = [0u8; HEADER_SIZE as usize];
        header[0..8].copy_from_slice(MAGIC);
        header[8..12].copy_from_slice(&VERSION.to_le_bytes());
        file.write_all(&header)?;
        file.sync_all()?;

        tracing::debug!(path = %path.display(), "created store file");

        Ok(FileStore {
            path,
            file: RwLock::new(file),
            index: RwLock::new(HashMap::new()),
            roots: RwLock::new(RootIndex::new()),
            write_offset: RwLock::new(HEADER_SIZE),
            sync_writes: false,
        })
    }

    /// Open an existing store file and replay its log
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| unavailable(&path, e))?;

        let mut header = [0u8; HEADER_SIZE as usize];
        file.read_exact(&mut header)
            .map_err(|e| Error::Storage(format!("{}: unreadable header: {}", path.display(), e)))?;

        if &header[0..8] != MAGIC {
            return Err(Error::Storage(format!(
                "{}: invalid magic bytes",
                path.display()
            )));
        }

        let version = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);
        if version != VERSION {
            return Err(Error::Storage(format!(
                "{}: version mismatch: expected {}, found {}",
                path.display(),
                VERSION,
                version
            )));
        }

        let mut index = HashMap::new();
        let mut roots = RootIndex::new();
        let write_offset = replay(&mut file, &mut index, &mut roots)?;

        let file_len = file.metadata()?.len();
        if file_len > write_offset {
            tracing::warn!(
                path = %path.display(),
                valid = write_offset,
                len = file_len,
                "truncating torn record at end of store file"
            );
            file.set_len(write_offset)?;
            file.sync_all()?;
        }

        tracing::debug!(
            path = %path.display(),
            nodes = index.len(),
            roots = roots.len(),
            "opened store file"
        );

        Ok(FileStore {
            path,
            file: RwLock::new(file),
            index: RwLock::new(index),
            roots: RwLock::new(roots),
            write_offset: RwLock::new(write_offset),
            sync_writes: false,
        })
    }

    /// Open or create a store file
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// fsync after every root record, so an acknowledged insertion survives
    /// power loss
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// Number of stored internal nodes across all networks
    pub fn node_count(&self) -> usize {
        self.index.read().len()
    }

    /// Number of root records across all networks
    pub fn root_count(&self) -> usize {
        self.roots.read().len()
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a framed record, returning the offset of its body
    fn append(&self, record: &Record) -> Result<(u64, u32)> {
        let framed = record.encode()?;
        let body_size = (framed.len() - RECORD_HEADER_LEN) as u32;

        let mut write_offset = self.write_offset.write();
        let offset = *write_offset;

        let mut file = self.file.write();
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(&framed)?;

        *write_offset = offset + framed.len() as u64;
        Ok((offset + RECORD_HEADER_LEN as u64, body_size))
    }

    fn read_body(&self, entry: IndexEntry) -> Result<Vec<u8>> {
        let mut file = self.file.write();
        file.seek(SeekFrom::Start(entry.offset))?;
        let mut data = vec![0u8; entry.size as usize];
        file.read_exact(&mut data)?;
        Ok(data)
    }
}

impl NodeStore for FileStore {
    fn get_node(&self, network: NetworkId, digest: &Digest) -> Result<Option<TreeNode>> {
        let entry = {
            let index = self.index.read();
            index.get(&(network, *digest)).copied()
        };
        let Some(entry) = entry else {
            return Ok(None);
        };

        match Record::decode_body(RecordType::Node, &self.read_body(entry)?)? {
            Record::Node {
                network: n,
                digest: d,
                node,
            } if n == network && d == *digest => Ok(Some(node)),
            _ => Err(Error::CorruptTree {
                network,
                digest: *digest,
                reason: format!("index points at a foreign record in {}", self.path.display()),
            }),
        }
    }

    fn put_node(&self, network: NetworkId, digest: &Digest, node: &TreeNode) -> Result<()> {
        if self.index.read().contains_key(&(network, *digest)) {
            if let Some(existing) = self.get_node(network, digest)? {
                return check_node(network, digest, &existing, node);
            }
        }

        let (offset, size) = self.append(&Record::Node {
            network,
            digest: *digest,
            node: *node,
        })?;

        self.index
            .write()
            .insert((network, *digest), IndexEntry { offset, size });
        Ok(())
    }

    fn put_root_record(&self, network: NetworkId, record: RootRecord) -> Result<()> {
        let mut roots = self.roots.write();
        if !roots.check(network, &record)? {
            return Ok(());
        }

        self.append(&Record::Root { network, record })?;
        if self.sync_writes {
            self.file.write().sync_data()?;
        }

        roots.insert(network, record);
        Ok(())
    }

    fn get_root_count(&self, network: NetworkId, root: &Digest) -> Result<Option<u64>> {
        Ok(self.roots.read().count_of(network, root))
    }

    fn get_latest_root(&self, network: NetworkId) -> Result<Option<RootRecord>> {
        Ok(self.roots.read().latest(network))
    }

    fn flush(&self) -> Result<()> {
        self.file.write().sync_all()?;
        Ok(())
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        // Best-effort sync on drop
        let _ = self.flush();
    }
}

fn unavailable(path: &Path, e: std::io::Error) -> Error {
    Error::StorageUnavailable(format!("{}: {}", path.display(), e))
}

/// Replay the record log, returning the offset just past the last whole record
fn replay(
    file: &mut File,
    index: &mut HashMap<(NetworkId, Digest), IndexEntry>,
    roots: &mut RootIndex,
) -> Result<u64> {
    let mut offset = HEADER_SIZE;
    file.seek(SeekFrom::Start(offset))?;

    loop {
        let mut header = [0u8; RECORD_HEADER_LEN];
        if !read_full(file, &mut header)? {
            break;
        }
        let (record_type, len) = Record::decode_header(&header)?;

        let mut body = vec![0u8; len as usize];
        if !read_full(file, &mut body)? {
            break;
        }

        let body_offset = offset + RECORD_HEADER_LEN as u64;
        match Record::decode_body(record_type, &body)? {
            Record::Node {
                network,
                digest,
                node,
            } => {
                if index.contains_key(&(network, digest)) {
                    // Concurrent writers may both append the same node; the
                    // first copy is the one the index keeps.
                    let first = index[&(network, digest)];
                    let pos = file.stream_position()?;
                    file.seek(SeekFrom::Start(first.offset))?;
                    let mut prior = vec![0u8; first.size as usize];
                    file.read_exact(&mut prior)?;
                    file.seek(SeekFrom::Start(pos))?;
                    if let Record::Node { node: existing, .. } =
                        Record::decode_body(RecordType::Node, &prior)?
                    {
                        check_node(network, &digest, &existing, &node)?;
                    }
                } else {
                    index.insert(
                        (network, digest),
                        IndexEntry {
                            offset: body_offset,
                            size: len,
                        },
                    );
                }
            }
            Record::Root { network, record } => {
                if roots.check(network, &record)? {
                    roots.insert(network, record);
                }
            }
        }

        offset = body_offset + len as u64;
    }

    Ok(offset)
}

/// Fill `buf` completely. Returns `false` on a clean or partial EOF.
fn read_full(file: &mut File, buf: &mut [u8]) -> Result<bool> {
    match file.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e.into()),
    }
}
