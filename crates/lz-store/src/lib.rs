//! # lz-store
//!
//! Read-only access to the records a user keeps locally: receipts proving
//! license purchases, and accounts proving ownership of licensor identities.
//!
//! ## Key Types
//!
//! - [`LocalStore`] - The async trait for reading local records
//! - [`ConfigDirStore`] - `receipts/` and `accounts/` under a configuration root
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`Snapshot`] - Immutable view taken once per inventory pass
//!
//! ## Design Notes
//!
//! - **Verified only**: receipts are signature-checked before they leave a store
//! - **Absence is empty**: a missing record directory yields no records
//! - **Failures are explicit**: unreadable records are reported, and
//!   [`LocalFailurePolicy`] decides whether they stop the pass

pub mod config_dir;
pub mod error;
pub mod memory;
pub mod traits;

pub use config_dir::{ConfigDirStore, ACCOUNTS_DIR, RECEIPTS_DIR};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use traits::{Loaded, LocalFailurePolicy, LocalStore, Snapshot, StoreExt};
