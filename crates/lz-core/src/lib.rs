//! # lz-core
//!
//! Records and pure checks for license inventory: offers, artifact
//! declarations, receipts, accounts, the schema registry that admits them,
//! and the canonical manifest encoding that receipt signatures cover.
//!
//! This crate does no I/O.
//!
//! ## Key Types
//!
//! - [`SchemaRegistry`] - turns untyped JSON into versioned records
//! - [`Receipt`] / [`VerifiedReceipt`] - signed proof of purchase, before and after verification
//! - [`OfferKey`] - `(api, offerID)`, the identity every stage matches on
//!
//! ## Canonicalization
//!
//! Receipt signatures cover the bytes produced by [`canonical_manifest_bytes`].

pub mod account;
pub mod artifact;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod offer;
pub mod receipt;
pub mod schema;
pub mod types;
pub mod validation;

pub use account::Account;
pub use artifact::{ArtifactDeclaration, ArtifactOffer};
pub use canonical::{canonical_manifest_bytes, canonical_manifest_string};
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::{CoreError, Result, SchemaError, SignatureError};
pub use offer::{Offer, OfferDocument, Price, Pricing};
pub use receipt::{
    sign_manifest, LicenseManifest, Licensee, Licensor, ManifestBuilder, ManifestValues, Receipt,
    Vendor,
};
pub use schema::{
    JsonSchemaValidator, Record, RecordKind, RecordValidator, SchemaEntry, SchemaRegistry,
    SchemaVersion, Versioned,
};
pub use types::{parse_uuid, OfferKey};
pub use validation::{verify_manifest, verify_receipt, VerifiedReceipt};
