//! Configuration for opening a tree
//!
//! Resolution order: built-in defaults, then a JSON file
//! (`~/.config/bridgetree/config.json` unless a path is given), then
//! whatever the caller overrides (the CLI applies its flags last).

use crate::hasher::HasherKind;
use crate::model::NetworkId;
use crate::store::{FileStore, NodeStore};
use crate::tree::{IndexOrder, MerkleTree};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default tree height (the bridge contracts use 32-level exit trees)
pub const DEFAULT_HEIGHT: u8 = 32;

/// Default store file name
pub const DEFAULT_DATABASE: &str = "bridgetree.db";

/// Settings needed to open a store and load a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the store file
    pub database: PathBuf,
    /// Network whose tree is used
    pub network: NetworkId,
    /// Fixed tree height
    pub height: u8,
    /// Hash function
    pub hasher: HasherKind,
    /// Index-bit-to-side mapping
    pub index_order: IndexOrder,
    /// fsync after every insertion
    pub sync_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: PathBuf::from(DEFAULT_DATABASE),
            network: NetworkId(0),
            height: DEFAULT_HEIGHT,
            hasher: HasherKind::default(),
            index_order: IndexOrder::default(),
            sync_writes: false,
        }
    }
}

impl Config {
    /// Default config file location (`<config_dir>/bridgetree/config.json`)
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("bridgetree").join("config.json"))
    }

    /// Load from `path`; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load an explicit file, or the default file if it exists, or defaults
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Ok(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Open (or create) the configured store file
    pub fn open_store(&self) -> Result<FileStore> {
        Ok(FileStore::open_or_create(&self.database)?.with_sync_writes(self.sync_writes))
    }

    /// Open the store and load this network's tree
    pub fn load_tree(&self) -> Result<MerkleTree<HasherKind, FileStore>> {
        MerkleTree::load_with_order(
            self.open_store()?,
            self.hasher,
            self.network,
            self.height,
            self.index_order,
        )
    }

    /// Load this network's existing tree without creating anything
    ///
    /// Fails with [`Error::StorageUnavailable`] if the store file is missing
    /// or holds no history for the network.
    pub fn open_tree(&self) -> Result<MerkleTree<HasherKind, FileStore>> {
        let store = FileStore::open(&self.database)?;
        if store.get_latest_root(self.network)?.is_none() {
            return Err(Error::StorageUnavailable(format!(
                "{}: no tree for network {}",
                self.database.display(),
                self.network
            )));
        }
        MerkleTree::load_with_order(store, self.hasher, self.network, self.height, self.index_order)
    }

    /// Write to `path` as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config dir: {}", e)))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }
}
