//! Offers: a licensor's published terms, as served by a licensing directory.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::OfferKey;

/// An amount of money in minor units of a currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Minor units, e.g. cents for USD.
    pub amount: u64,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl Price {
    pub fn new(amount: u64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

/// The price list of an offer.
///
/// Directories may publish further tiers; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    pub single: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relicense: Option<Price>,
}

/// An offer body exactly as a directory serves it.
///
/// The lookup key already names the directory and the offer, so the body
/// may leave `api` and `offerID` out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OfferDocument {
    #[serde(default)]
    pub api: Option<String>,
    #[serde(default, rename = "offerID")]
    pub offer_id: Option<Uuid>,
    #[serde(rename = "licensorID")]
    pub licensor_id: Uuid,
    pub url: String,
    pub pricing: Pricing,
}

/// A resolved offer, bound to the key it was fetched under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offer {
    pub api: String,
    #[serde(rename = "offerID")]
    pub offer_id: Uuid,
    #[serde(rename = "licensorID")]
    pub licensor_id: Uuid,
    pub url: String,
    pub pricing: Pricing,
}

impl Offer {
    /// Bind a fetched document to the key it was requested under.
    ///
    /// Fails when the document names a different offer or a different
    /// directory than the one asked for. Trailing slashes on `api` are
    /// not significant.
    pub fn resolve(key: &OfferKey, document: OfferDocument) -> Result<Self, CoreError> {
        if let Some(returned) = &document.api {
            if returned.trim_end_matches('/') != key.api.trim_end_matches('/') {
                return Err(CoreError::ApiMismatch {
                    requested: key.api.clone(),
                    returned: returned.clone(),
                });
            }
        }
        if let Some(returned) = document.offer_id {
            if returned != key.offer_id {
                return Err(CoreError::OfferMismatch {
                    requested: key.offer_id.to_string(),
                    returned: returned.to_string(),
                });
            }
        }

        Ok(Self {
            api: key.api.clone(),
            offer_id: key.offer_id,
            licensor_id: document.licensor_id,
            url: document.url,
            pricing: document.pricing,
        })
    }

    /// The key this offer was resolved under.
    pub fn key(&self) -> OfferKey {
        OfferKey::new(self.api.clone(), self.offer_id)
    }
}
