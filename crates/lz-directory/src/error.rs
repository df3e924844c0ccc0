//! Error types for offer resolution.

use std::time::Duration;
use thiserror::Error;

use lz_core::{CoreError, OfferKey, SchemaError};

/// Why an offer could not be resolved.
///
/// Resolution failures are per finding: they put that finding in the
/// Invalid bucket and never stop a pass.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The request could not be sent or the connection failed.
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The directory answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The directory does not know the offer.
    #[error("offer {0} not found")]
    NotFound(OfferKey),

    /// The response body could not be read.
    #[error("reading response from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not a recognizable offer.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The body was a valid offer, but not the one asked for.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The lookup did not finish in time.
    #[error("lookup of {key} timed out after {after:?}")]
    Timeout { key: OfferKey, after: Duration },

    /// The HTTP client could not be built.
    #[error("invalid HTTP client configuration: {0}")]
    Client(String),
}

/// Result type for resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;
