//! # lz-directory
//!
//! Resolution of offers against licensing directories.
//!
//! ## Key Types
//!
//! - [`OfferSource`] - The async trait for offer lookups
//! - [`HttpDirectory`] - `GET {api}/offers/{offerID}` over HTTPS
//! - [`MemoryDirectory`] - In-memory source for tests
//!
//! Every response body is validated by the schema registry before it
//! becomes an [`lz_core::Offer`]. Offers are never cached between passes.

pub mod error;
pub mod http;
pub mod memory;
pub mod source;

pub use error::{ResolveError, Result};
pub use http::{HttpDirectory, HttpDirectoryConfig};
pub use memory::MemoryDirectory;
pub use source::OfferSource;
