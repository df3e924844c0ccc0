//! Strong identifiers shared by every stage of an inventory pass.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::CoreError;

/// Identifies one offer in one licensing directory.
///
/// `api` is compared byte-for-byte, the offer identifier as a UUID so that
/// letter case in hand-written declarations does not split one offer in two.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OfferKey {
    pub api: String,
    pub offer_id: Uuid,
}

impl OfferKey {
    /// Create a key from an already-parsed identifier.
    pub fn new(api: impl Into<String>, offer_id: Uuid) -> Self {
        Self {
            api: api.into(),
            offer_id,
        }
    }

    /// Parse the textual offer identifier carried by signed records.
    pub fn parse(api: &str, offer_id: &str) -> Result<Self, CoreError> {
        let offer_id = parse_uuid(offer_id)?;
        Ok(Self::new(api, offer_id))
    }

    /// The directory URL for this offer: `{api}/offers/{offerID}`.
    pub fn offer_url(&self) -> String {
        format!(
            "{}/offers/{}",
            self.api.trim_end_matches('/'),
            self.offer_id.hyphenated()
        )
    }
}

impl fmt::Debug for OfferKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OfferKey({} {})", self.api, self.offer_id)
    }
}

impl fmt::Display for OfferKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.api, self.offer_id)
    }
}

/// Parse a UUID, reporting the offending text on failure.
pub fn parse_uuid(value: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(value).map_err(|e| CoreError::InvalidIdentifier {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_key_ignores_uuid_case() {
        let lower =
            OfferKey::parse("https://api.example.com", "9aab7058-599a-43db-9449-5fc0971ecbfa")
                .unwrap();
        let upper =
            OfferKey::parse("https://api.example.com", "9AAB7058-599A-43DB-9449-5FC0971ECBFA")
                .unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_offer_key_api_is_exact() {
        let a = OfferKey::parse("https://api.example.com", "9aab7058-599a-43db-9449-5fc0971ecbfa")
            .unwrap();
        let b = OfferKey::parse("https://api.example.org", "9aab7058-599a-43db-9449-5fc0971ecbfa")
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_offer_url() {
        let key = OfferKey::parse("https://api.example.com/", "9aab7058-599a-43db-9449-5fc0971ecbfa")
            .unwrap();
        assert_eq!(
            key.offer_url(),
            "https://api.example.com/offers/9aab7058-599a-43db-9449-5fc0971ecbfa"
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = OfferKey::parse("https://api.example.com", "not-a-uuid").unwrap_err();
        assert!(matches!(err, CoreError::InvalidIdentifier { .. }));
    }
}
