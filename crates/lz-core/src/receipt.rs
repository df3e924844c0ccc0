//! Receipt: signed proof that a license was purchased.
//!
//! A receipt carries the license manifest in force at purchase time, the
//! vendor's public key, and a detached signature over the manifest's
//! canonical bytes. Manifest fields are kept as the exact strings that were
//! signed, so re-serializing them reproduces the signed bytes.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_manifest_bytes;
use crate::crypto::Keypair;
use crate::error::CoreError;
use crate::offer::Price;
use crate::types::{parse_uuid, OfferKey};

/// A receipt as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Receipt {
    /// Hex-encoded Ed25519 public key of the vendor.
    pub key: String,
    /// Hex-encoded detached signature over the license manifest.
    pub signature: String,
    pub license: LicenseManifest,
}

impl Receipt {
    /// The offer this receipt was issued for.
    pub fn offer_key(&self) -> Result<OfferKey, CoreError> {
        Ok(OfferKey::new(
            self.license.values.api.clone(),
            parse_uuid(&self.license.values.offer_id)?,
        ))
    }
}

/// The signed part of a receipt.
///
/// Fields outside the signed set are accepted and dropped; they are not
/// covered by the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseManifest {
    /// Full text of the license form.
    pub form: String,
    pub values: ManifestValues,
}

/// The terms filled into a license form.
///
/// `expires`, `price` and `vendor` are omitted entirely when absent; a
/// present-but-zero price is not the same as no price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestValues {
    pub api: String,
    #[serde(rename = "offerID")]
    pub offer_id: String,
    #[serde(rename = "orderID")]
    pub order_id: String,
    pub effective: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    pub licensor: Licensor,
    pub licensee: Licensee,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Vendor>,
}

/// The party giving the license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Licensor {
    pub email: String,
    pub jurisdiction: String,
    pub name: String,
    #[serde(rename = "licensorID")]
    pub licensor_id: String,
}

/// The party receiving the license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Licensee {
    pub email: String,
    pub jurisdiction: String,
    pub name: String,
}

/// An agent or reseller that sold the license on the licensor's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Vendor {
    pub email: String,
    pub jurisdiction: String,
    pub name: String,
    pub website: String,
}

/// Builder for license manifests.
///
/// Mostly used by vendor-side tooling and tests; consumers normally read
/// receipts from disk.
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    form: String,
    values: ManifestValues,
}

impl ManifestBuilder {
    /// Start a manifest for one order of one offer.
    pub fn new(
        form: impl Into<String>,
        key: &OfferKey,
        order_id: impl Into<String>,
        effective: impl Into<String>,
        licensor: Licensor,
        licensee: Licensee,
    ) -> Self {
        Self {
            form: form.into(),
            values: ManifestValues {
                api: key.api.clone(),
                offer_id: key.offer_id.hyphenated().to_string(),
                order_id: order_id.into(),
                effective: effective.into(),
                expires: None,
                price: None,
                licensor,
                licensee,
                vendor: None,
            },
        }
    }

    /// Set the expiration date.
    pub fn expires(mut self, expires: impl Into<String>) -> Self {
        self.values.expires = Some(expires.into());
        self
    }

    /// Set the purchase price.
    pub fn price(mut self, price: Price) -> Self {
        self.values.price = Some(price);
        self
    }

    /// Set the reselling vendor.
    pub fn vendor(mut self, vendor: Vendor) -> Self {
        self.values.vendor = Some(vendor);
        self
    }

    /// Build the manifest without signing it.
    pub fn build(self) -> LicenseManifest {
        LicenseManifest {
            form: self.form,
            values: self.values,
        }
    }

    /// Build the manifest and sign its canonical bytes.
    pub fn sign(self, keypair: &Keypair) -> Receipt {
        sign_manifest(self.build(), keypair)
    }
}

/// Sign a manifest, producing a receipt carrying the signer's public key.
pub fn sign_manifest(manifest: LicenseManifest, keypair: &Keypair) -> Receipt {
    let signature = keypair.sign(&canonical_manifest_bytes(&manifest));
    Receipt {
        key: keypair.public_key().to_hex(),
        signature: signature.to_hex(),
        license: manifest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn licensor() -> Licensor {
        Licensor {
            email: "licensor@example.com".into(),
            jurisdiction: "US-CA".into(),
            name: "Jane".into(),
            licensor_id: "59e70a4d-ffee-4e9d-a526-7a9ff9161664".into(),
        }
    }

    fn licensee() -> Licensee {
        Licensee {
            email: "licensee@example.com".into(),
            jurisdiction: "US-TX".into(),
            name: "Joe".into(),
        }
    }

    #[test]
    fn test_optional_values_are_omitted() {
        let key = OfferKey::parse(
            "https://api.licensezero.com",
            "9aab7058-599a-43db-9449-5fc0971ecbfa",
        )
        .unwrap();
        let manifest = ManifestBuilder::new(
            "Test license form.",
            &key,
            "2c743a84-09ce-4549-9f0d-19d8f53462bb",
            "2018-11-13T20:20:39Z",
            licensor(),
            licensee(),
        )
        .build();

        let value = serde_json::to_value(&manifest).unwrap();
        let values = value["values"].as_object().unwrap();
        assert!(!values.contains_key("expires"));
        assert!(!values.contains_key("price"));
        assert!(!values.contains_key("vendor"));
    }

    #[test]
    fn test_zero_price_is_distinct_from_absent() {
        let values: ManifestValues = serde_json::from_value(json!({
            "api": "https://api.licensezero.com",
            "offerID": "9aab7058-599a-43db-9449-5fc0971ecbfa",
            "orderID": "2c743a84-09ce-4549-9f0d-19d8f53462bb",
            "effective": "2018-11-13T20:20:39Z",
            "price": { "amount": 0, "currency": "USD" },
            "licensor": serde_json::to_value(licensor()).unwrap(),
            "licensee": serde_json::to_value(licensee()).unwrap()
        }))
        .unwrap();
        assert_eq!(values.price, Some(Price::new(0, "USD")));
    }

    #[test]
    fn test_unknown_manifest_field_is_rejected() {
        let result: Result<Licensee, _> = serde_json::from_value(json!({
            "email": "licensee@example.com",
            "jurisdiction": "US-TX",
            "name": "Joe",
            "nickname": "J"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_offer_key_from_receipt() {
        let key = OfferKey::parse(
            "https://api.licensezero.com",
            "9AAB7058-599A-43DB-9449-5FC0971ECBFA",
        )
        .unwrap();
        let receipt = ManifestBuilder::new(
            "form",
            &key,
            "2c743a84-09ce-4549-9f0d-19d8f53462bb",
            "2018-11-13T20:20:39Z",
            licensor(),
            licensee(),
        )
        .sign(&Keypair::from_seed(&[7u8; 32]));
        assert_eq!(receipt.offer_key().unwrap(), key);
        assert_eq!(receipt.key.len(), 64);
        assert_eq!(receipt.signature.len(), 128);
    }
}
