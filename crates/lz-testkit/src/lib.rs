//! # lz-testkit
//!
//! Testing utilities for lz-inventory.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: manifests with the exact canonical text their signatures cover
//! - **Generators**: Proptest strategies for manifests and signed receipts
//! - **Fixtures**: signed receipts, offer documents, project trees and configuration roots
//!
//! ## Golden Vectors
//!
//! ```rust
//! use lz_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, canonical) in verify_all_vectors() {
//!     assert!(matches, "{name}: {canonical}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use lz_testkit::generators::{receipt_from_params, ManifestParams};
//!
//! proptest! {
//!     #[test]
//!     fn signed_receipts_verify(params: ManifestParams) {
//!         let receipt = receipt_from_params(&params);
//!         prop_assert!(lz_core::verify_receipt(&receipt).is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use lz_testkit::fixtures::{declared, ProjectTree, TestFixture};
//!
//! let fixture = TestFixture::new();
//! let key = fixture.offer_key();
//! let tree = ProjectTree::new();
//! tree.declare("project-a", &[declared(&key, Some("Parity-7.0.0"))]);
//! let receipt = fixture.receipt(&key);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{declared, offer_document, ConfigRoot, ProjectTree, TestFixture, TEST_API};
pub use generators::{manifest_from_params, receipt_from_params, ManifestParams};
pub use vectors::{all_vectors, receipt_from_vector, verify_all_vectors, GoldenVector};
