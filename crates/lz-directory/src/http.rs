//! HTTP offer source: `GET {api}/offers/{offerID}`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use lz_core::{Offer, OfferKey, SchemaRegistry};

use crate::error::{ResolveError, Result};
use crate::source::OfferSource;

/// Configuration for [`HttpDirectory`].
#[derive(Debug, Clone)]
pub struct HttpDirectoryConfig {
    /// Upper bound on one request, connection included.
    pub request_timeout: Duration,
    /// Sent as the `User-Agent` header.
    pub user_agent: String,
}

impl Default for HttpDirectoryConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: format!("lz-inventory/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Resolves offers from the licensing API named in each offer key.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    http: reqwest::Client,
    registry: Arc<SchemaRegistry>,
}

impl HttpDirectory {
    /// Build a client with the given configuration.
    pub fn new(config: HttpDirectoryConfig, registry: Arc<SchemaRegistry>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| ResolveError::Client(e.to_string()))?;
        Ok(Self::with_client(http, registry))
    }

    /// Use an existing `reqwest` client.
    pub fn with_client(http: reqwest::Client, registry: Arc<SchemaRegistry>) -> Self {
        Self { http, registry }
    }
}

#[async_trait]
impl OfferSource for HttpDirectory {
    async fn fetch_offer(&self, key: &OfferKey) -> Result<Offer> {
        let url = key.offer_url();
        debug!(offer = %key, %url, "fetching offer");

        let resp = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| ResolveError::Http {
                url: url.clone(),
                source,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ResolveError::NotFound(key.clone()));
        }

        if !resp.status().is_success() {
            return Err(ResolveError::Status {
                url,
                status: resp.status().as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|source| ResolveError::Body {
                url: url.clone(),
                source,
            })?;

        let document = self.registry.parse_offer_bytes(&body)?.into_inner();
        Ok(Offer::resolve(key, document)?)
    }
}
