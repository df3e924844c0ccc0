//! Filesystem implementation of the LocalStore trait.
//!
//! Reads one record per file from `receipts/` and `accounts/` under a
//! configuration root. File I/O runs on tokio's blocking pool.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use lz_core::{Account, SchemaRegistry, VerifiedReceipt};

use crate::error::{Result, StoreError};
use crate::traits::{Loaded, LocalStore};

/// Subdirectory holding one receipt per file.
pub const RECEIPTS_DIR: &str = "receipts";

/// Subdirectory holding one account per file.
pub const ACCOUNTS_DIR: &str = "accounts";

/// A store backed by a configuration directory.
///
/// Entries are read in file-name order. Directories and dotfiles inside
/// the record folders are ignored.
#[derive(Debug, Clone)]
pub struct ConfigDirStore {
    root: PathBuf,
    registry: Arc<SchemaRegistry>,
}

impl ConfigDirStore {
    /// Open a store rooted at `root`. Nothing is read until asked.
    pub fn new(root: impl Into<PathBuf>, registry: Arc<SchemaRegistry>) -> Self {
        Self {
            root: root.into(),
            registry,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn receipts_dir(&self) -> PathBuf {
        self.root.join(RECEIPTS_DIR)
    }

    pub fn accounts_dir(&self) -> PathBuf {
        self.root.join(ACCOUNTS_DIR)
    }
}

#[async_trait]
impl LocalStore for ConfigDirStore {
    async fn read_receipts(&self) -> Result<Loaded<VerifiedReceipt>> {
        let dir = self.receipts_dir();
        let registry = self.registry.clone();

        tokio::task::spawn_blocking(move || {
            read_records(&dir, |path, bytes| {
                registry
                    .ingest_receipt_bytes(bytes)
                    .map_err(|source| StoreError::Receipt {
                        path: path.to_path_buf(),
                        source,
                    })
            })
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    async fn read_accounts(&self) -> Result<Loaded<Account>> {
        let dir = self.accounts_dir();

        tokio::task::spawn_blocking(move || {
            read_records(&dir, |path, bytes| {
                serde_json::from_slice(bytes).map_err(|source| StoreError::Account {
                    path: path.to_path_buf(),
                    source,
                })
            })
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

/// Read and parse every record file in `dir`.
///
/// Only failure to list the directory itself is an error; everything that
/// goes wrong with one file lands in `failures`.
fn read_records<T>(
    dir: &Path,
    parse: impl Fn(&Path, &[u8]) -> Result<T>,
) -> Result<Loaded<T>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "record directory missing");
            return Ok(Loaded::default());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut paths = Vec::new();
    let mut loaded = Loaded::default();
    for entry in entries {
        match entry {
            Ok(entry) => {
                if entry.file_name().to_string_lossy().starts_with('.') {
                    continue;
                }
                paths.push(entry.path());
            }
            Err(source) => loaded.failures.push(StoreError::Io {
                path: dir.to_path_buf(),
                source,
            }),
        }
    }
    paths.sort();

    for path in paths {
        // Follows symlinks; a dangling link reads as NotFound below.
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => continue,
            _ => {}
        }

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(source) => {
                loaded.failures.push(StoreError::Io { path, source });
                continue;
            }
        };

        match parse(&path, &bytes) {
            Ok(record) => {
                debug!(path = %path.display(), "read local record");
                loaded.records.push(record);
            }
            Err(e) => loaded.failures.push(e),
        }
    }

    Ok(loaded)
}
