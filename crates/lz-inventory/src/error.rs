//! Error types for an inventory pass.

use lz_core::SchemaError;
use lz_directory::ResolveError;
use lz_scan::ScanError;
use lz_store::StoreError;
use thiserror::Error;

/// Conditions that end a pass without an inventory.
///
/// Offer lookups never show up here: a failed lookup files its finding
/// under [`crate::Inventory::invalid`] and the pass goes on.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Local receipts or accounts could not be read.
    #[error("local store error: {0}")]
    Store(#[from] StoreError),

    /// The project tree could not be scanned.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// The embedded schemas failed to compile.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The offer source could not be set up.
    #[error("offer source error: {0}")]
    Source(#[from] ResolveError),

    /// A background task panicked.
    #[error("task failed: {0}")]
    Task(String),
}

/// Result type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;
