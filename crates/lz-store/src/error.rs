//! Error types for the store module.

use std::path::PathBuf;
use thiserror::Error;

use lz_core::CoreError;

/// Errors that can occur while reading local records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure other than a missing directory.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An account file that is not valid JSON for an account.
    #[error("invalid account {}: {source}", path.display())]
    Account {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A receipt that failed schema validation or signature verification.
    #[error("invalid receipt {}: {source}", path.display())]
    Receipt {
        path: PathBuf,
        #[source]
        source: CoreError,
    },

    /// A lock guarding in-memory records was poisoned.
    #[error("store lock poisoned")]
    Poisoned,

    /// A blocking read task panicked or was cancelled.
    #[error("store task failed: {0}")]
    Task(String),
}

impl StoreError {
    /// The file this error is about, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            StoreError::Io { path, .. }
            | StoreError::Account { path, .. }
            | StoreError::Receipt { path, .. } => Some(path),
            StoreError::Poisoned | StoreError::Task(_) => None,
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
