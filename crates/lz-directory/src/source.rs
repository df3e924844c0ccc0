//! OfferSource trait: where offers come from.
//!
//! The reconciler only needs "give me the offer for this key". Production
//! uses [`crate::HttpDirectory`]; tests use [`crate::MemoryDirectory`].

use async_trait::async_trait;

use lz_core::{Offer, OfferKey};

use crate::error::Result;

/// Resolves offers by `(api, offerID)`.
///
/// Implementations must be thread-safe (Send + Sync); the reconciler
/// issues lookups concurrently.
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Fetch and validate one offer.
    ///
    /// The returned offer is bound to `key`: its `api` and `offerID` are
    /// the requested ones.
    async fn fetch_offer(&self, key: &OfferKey) -> Result<Offer>;
}
