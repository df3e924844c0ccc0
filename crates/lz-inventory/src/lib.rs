//! # lz-inventory
//!
//! Finds out which of a project's dependencies are offered for sale under
//! License Zero and which of those the user still needs a license for.
//!
//! ## Key Types
//!
//! - [`Reconciler`] - Runs a pass: snapshot, scan, look up offers, classify
//! - [`Inventory`] - The buckets a pass sorts findings into
//! - [`InventoryConfig`] - Ignore flags, lookup limits, local failure policy
//! - [`CancelHandle`] - Stops a running pass early
//!
//! ## Buckets
//!
//! Every finding whose offer resolves is *licensable*, and then exactly one
//! of *licensed* (a verified receipt matches), *own* (the user is the
//! licensor), *ignored* (its public license is a kind the caller chose to
//! ignore) or *unlicensed*. Findings whose offer cannot be resolved are
//! *invalid*.
//!
//! ## Example
//!
//! ```ignore
//! use lz_inventory::{InventoryConfig, Reconciler};
//!
//! let reconciler = Reconciler::open("/home/me/.config/licensezero", InventoryConfig::default())?;
//! let inventory = reconciler.compile("/home/me/project").await?;
//! for item in &inventory.unlicensed {
//!     println!("{} needs a license: {}", item.finding.label(), item.offer.url);
//! }
//! ```

pub mod cancel;
pub mod classify;
pub mod config;
pub mod error;
pub mod inventory;
pub mod license;
pub mod reconcile;

pub use cancel::CancelHandle;
pub use classify::{classify, Resolution};
pub use config::{ClassifyOptions, InventoryConfig};
pub use error::{InventoryError, Result};
pub use inventory::{InvalidItem, Inventory, InventoryItem};
pub use license::{classify_license, LicenseClass};
pub use reconcile::Reconciler;

// Re-export component crates
pub use lz_core as core;
pub use lz_directory as directory;
pub use lz_scan as scan;
pub use lz_store as store;
