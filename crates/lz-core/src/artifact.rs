//! Artifact declarations: a project's own list of offers that apply to it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::OfferKey;

/// The contents of a project's declaration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactDeclaration {
    pub offers: Vec<ArtifactOffer>,
}

/// One offer named by a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactOffer {
    pub api: String,
    #[serde(rename = "offerID")]
    pub offer_id: Uuid,
    /// Public license identifier, e.g. `Parity-7.0.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<String>,
}

impl ArtifactOffer {
    pub fn key(&self) -> OfferKey {
        OfferKey::new(self.api.clone(), self.offer_id)
    }
}
