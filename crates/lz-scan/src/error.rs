//! Error types for declaration scanning.

use std::path::PathBuf;
use thiserror::Error;

use lz_core::SchemaError;

/// Errors that abort a scan.
///
/// A missing root or a directory without a declaration is not an error;
/// those simply contribute no findings.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A declaration file exists but is not a valid declaration.
    #[error("invalid declaration {}: {source}", path.display())]
    Declaration {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    /// The scan root exists but is not a directory.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// Result type for scanning.
pub type Result<T> = std::result::Result<T, ScanError>;
