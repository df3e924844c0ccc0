//! Error types for the license inventory core.

use thiserror::Error;

use crate::schema::RecordKind;

/// Errors raised while turning untyped JSON into a typed record.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The input bytes were not JSON at all.
    #[error("malformed {kind} document: {reason}")]
    Malformed { kind: RecordKind, reason: String },

    /// No registered schema version accepted the document.
    #[error("unrecognized {kind} schema: {reason}")]
    Unrecognized { kind: RecordKind, reason: String },

    /// A schema validated the document but the typed decode still failed.
    #[error("could not decode {kind} record: {reason}")]
    Decode { kind: RecordKind, reason: String },

    /// An embedded schema failed to compile.
    #[error("schema {schema_id} failed to compile: {reason}")]
    Build { schema_id: String, reason: String },
}

/// Signature checks over a receipt's license manifest.
///
/// Every variant means the receipt must not be used as proof of purchase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("signature does not match license manifest")]
    Mismatch,
}

/// Core errors that can occur while ingesting records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("invalid identifier {value:?}: {reason}")]
    InvalidIdentifier { value: String, reason: String },

    #[error("directory returned offer {returned}, expected {requested}")]
    OfferMismatch { requested: String, returned: String },

    #[error("directory answered for api {returned}, expected {requested}")]
    ApiMismatch { requested: String, returned: String },
}

impl CoreError {
    /// True when the failure came from signature verification.
    pub fn is_signature(&self) -> bool {
        matches!(self, CoreError::Signature(_))
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
