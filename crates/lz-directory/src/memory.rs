//! A simple in-memory offer source for testing.
//!
//! Documents go through the schema registry exactly as HTTP bodies do.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use lz_core::{Offer, OfferKey, SchemaRegistry};

use crate::error::{ResolveError, Result};
use crate::source::OfferSource;

#[derive(Debug, Clone)]
enum Entry {
    Document(Value),
    Status(u16),
}

/// In-memory offer source.
#[derive(Debug)]
pub struct MemoryDirectory {
    registry: Arc<SchemaRegistry>,
    entries: RwLock<HashMap<OfferKey, Entry>>,
    delays: RwLock<HashMap<OfferKey, Duration>>,
    fetches: AtomicUsize,
}

impl MemoryDirectory {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            entries: RwLock::new(HashMap::new()),
            delays: RwLock::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Serve `document` for `key`.
    pub async fn insert(&self, key: OfferKey, document: Value) {
        self.entries.write().await.insert(key, Entry::Document(document));
    }

    /// Answer lookups of `key` with an HTTP-style failure status.
    pub async fn fail_with(&self, key: OfferKey, status: u16) {
        self.entries.write().await.insert(key, Entry::Status(status));
    }

    /// Hold lookups of `key` for `delay` before answering.
    pub async fn delay(&self, key: OfferKey, delay: Duration) {
        self.delays.write().await.insert(key, delay);
    }

    /// Number of lookups served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OfferSource for MemoryDirectory {
    async fn fetch_offer(&self, key: &OfferKey) -> Result<Offer> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let delay = self.delays.read().await.get(key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let entry = self.entries.read().await.get(key).cloned();
        match entry {
            Some(Entry::Document(document)) => {
                let document = self.registry.parse_offer(&document)?.into_inner();
                Ok(Offer::resolve(key, document)?)
            }
            Some(Entry::Status(status)) => Err(ResolveError::Status {
                url: key.offer_url(),
                status,
            }),
            None => Err(ResolveError::NotFound(key.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn offer_json() -> Value {
        json!({
            "licensorID": "22222222-2222-4222-8222-222222222222",
            "url": "https://example.com/project",
            "pricing": { "single": { "amount": 1000, "currency": "USD" } }
        })
    }

    fn directory() -> MemoryDirectory {
        MemoryDirectory::new(Arc::new(SchemaRegistry::new().unwrap()))
    }

    #[tokio::test]
    async fn test_memory_directory_resolves() {
        let dir = directory();
        let key = OfferKey::new("https://api.example.com", Uuid::new_v4());
        dir.insert(key.clone(), offer_json()).await;

        let offer = dir.fetch_offer(&key).await.unwrap();
        assert_eq!(offer.key(), key);
        assert_eq!(dir.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_directory_unknown_key() {
        let dir = directory();
        let key = OfferKey::new("https://api.example.com", Uuid::new_v4());
        assert!(matches!(
            dir.fetch_offer(&key).await,
            Err(ResolveError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_directory_validates_documents() {
        let dir = directory();
        let key = OfferKey::new("https://api.example.com", Uuid::new_v4());
        dir.insert(key.clone(), json!({ "url": "https://example.com" }))
            .await;
        assert!(matches!(
            dir.fetch_offer(&key).await,
            Err(ResolveError::Schema(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_directory_status() {
        let dir = directory();
        let key = OfferKey::new("https://api.example.com", Uuid::new_v4());
        dir.fail_with(key.clone(), 503).await;
        assert!(matches!(
            dir.fetch_offer(&key).await,
            Err(ResolveError::Status { status: 503, .. })
        ));
    }
}
