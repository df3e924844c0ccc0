//! Proptest generators for property-based testing.

use proptest::prelude::*;
use uuid::Uuid;

use lz_core::{
    sign_manifest, Keypair, LicenseManifest, Licensee, Licensor, ManifestBuilder, OfferKey, Price,
    Receipt, Vendor,
};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a UUID from random bytes.
pub fn uuid() -> impl Strategy<Value = Uuid> {
    any::<[u8; 16]>().prop_map(|bytes| uuid::Builder::from_random_bytes(bytes).into_uuid())
}

/// Generate an HTTPS API URL.
pub fn api() -> impl Strategy<Value = String> {
    "[a-z]{1,12}\\.(com|org|dev)".prop_map(|host| format!("https://api.{host}"))
}

/// Generate an offer key.
pub fn offer_key() -> impl Strategy<Value = OfferKey> {
    (api(), uuid()).prop_map(|(api, id)| OfferKey::new(api, id))
}

/// Generate a UTC timestamp of the shape receipts use.
pub fn timestamp() -> impl Strategy<Value = String> {
    (2018u32..2040, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(
        |(y, mo, d, h, mi, s)| format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}Z"),
    )
}

pub fn jurisdiction() -> impl Strategy<Value = String> {
    "[A-Z]{2}(-[A-Z0-9]{1,3})?".prop_map(String::from)
}

pub fn email() -> impl Strategy<Value = String> {
    "[a-z0-9.]{1,12}@[a-z]{1,12}\\.com".prop_map(String::from)
}

/// Names may carry characters that need escaping.
pub fn name() -> impl Strategy<Value = String> {
    "[A-Za-z\"\\\\ é]{3,24}".prop_map(String::from)
}

pub fn price() -> impl Strategy<Value = Price> {
    (any::<u64>(), "[A-Z]{3}").prop_map(|(amount, currency)| Price::new(amount, currency))
}

pub fn licensor() -> impl Strategy<Value = Licensor> {
    (email(), jurisdiction(), name(), uuid()).prop_map(|(email, jurisdiction, name, id)| {
        Licensor {
            email,
            jurisdiction,
            name,
            licensor_id: id.to_string(),
        }
    })
}

pub fn licensee() -> impl Strategy<Value = Licensee> {
    (email(), jurisdiction(), name()).prop_map(|(email, jurisdiction, name)| Licensee {
        email,
        jurisdiction,
        name,
    })
}

pub fn vendor() -> impl Strategy<Value = Vendor> {
    (email(), jurisdiction(), name(), api()).prop_map(|(email, jurisdiction, name, website)| {
        Vendor {
            email,
            jurisdiction,
            name,
            website,
        }
    })
}

/// Parameters for generating a signed receipt.
#[derive(Debug, Clone)]
pub struct ManifestParams {
    pub keypair: Keypair,
    pub form: String,
    pub key: OfferKey,
    pub order_id: Uuid,
    pub effective: String,
    pub expires: Option<String>,
    pub price: Option<Price>,
    pub licensor: Licensor,
    pub licensee: Licensee,
    pub vendor: Option<Vendor>,
}

impl Arbitrary for ManifestParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<[u8; 32]>(), // seed
            "[A-Za-z0-9 .,\n]{0,200}",
            offer_key(),
            uuid(),
            timestamp(),
            proptest::option::of(timestamp()),
            proptest::option::of(price()),
            licensor(),
            licensee(),
            proptest::option::of(vendor()),
        )
            .prop_map(
                |(seed, form, key, order_id, effective, expires, price, licensor, licensee, vendor)| {
                    ManifestParams {
                        keypair: Keypair::from_seed(&seed),
                        form,
                        key,
                        order_id,
                        effective,
                        expires,
                        price,
                        licensor,
                        licensee,
                        vendor,
                    }
                },
            )
            .boxed()
    }
}

/// Build the manifest described by `params`.
pub fn manifest_from_params(params: &ManifestParams) -> LicenseManifest {
    let mut builder = ManifestBuilder::new(
        params.form.clone(),
        &params.key,
        params.order_id.to_string(),
        params.effective.clone(),
        params.licensor.clone(),
        params.licensee.clone(),
    );
    if let Some(expires) = &params.expires {
        builder = builder.expires(expires.clone());
    }
    if let Some(price) = &params.price {
        builder = builder.price(price.clone());
    }
    if let Some(vendor) = &params.vendor {
        builder = builder.vendor(vendor.clone());
    }
    builder.build()
}

/// Build and sign the manifest described by `params`.
pub fn receipt_from_params(params: &ManifestParams) -> Receipt {
    sign_manifest(manifest_from_params(params), &params.keypair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lz_core::{canonical_manifest_bytes, canonical_manifest_string, verify_receipt};

    fn flip_hex_byte(hex_str: &str, index: usize) -> String {
        let mut bytes = hex::decode(hex_str).unwrap();
        let i = index % bytes.len();
        bytes[i] ^= 0x01;
        hex::encode(bytes)
    }

    proptest! {
        #[test]
        fn test_canonical_bytes_deterministic(params: ManifestParams) {
            let m1 = manifest_from_params(&params);
            let m2 = manifest_from_params(&params);
            prop_assert_eq!(canonical_manifest_bytes(&m1), canonical_manifest_bytes(&m2));
        }

        #[test]
        fn test_canonical_bytes_survive_reordering(params: ManifestParams) {
            // serde_json::Value sorts keys, so this reorders every object.
            let manifest = manifest_from_params(&params);
            let value = serde_json::to_value(&manifest).unwrap();
            let reparsed: LicenseManifest = serde_json::from_value(value).unwrap();
            prop_assert_eq!(canonical_manifest_bytes(&manifest), canonical_manifest_bytes(&reparsed));
        }

        #[test]
        fn test_absent_optionals_are_omitted(params: ManifestParams) {
            let text = canonical_manifest_string(&manifest_from_params(&params));
            prop_assert_eq!(text.contains("\"expires\":"), params.expires.is_some());
            prop_assert_eq!(text.contains("\"price\":"), params.price.is_some());
            prop_assert_eq!(text.contains("\"vendor\":"), params.vendor.is_some());
        }

        #[test]
        fn test_signed_receipt_verifies(params: ManifestParams) {
            let receipt = receipt_from_params(&params);
            prop_assert!(verify_receipt(&receipt).is_ok());
        }

        #[test]
        fn test_flipped_signature_byte_fails(params: ManifestParams, index in 0usize..64) {
            let mut receipt = receipt_from_params(&params);
            receipt.signature = flip_hex_byte(&receipt.signature, index);
            prop_assert!(verify_receipt(&receipt).is_err());
        }

        #[test]
        fn test_flipped_key_byte_fails(params: ManifestParams, index in 0usize..32) {
            let mut receipt = receipt_from_params(&params);
            receipt.key = flip_hex_byte(&receipt.key, index);
            prop_assert!(verify_receipt(&receipt).is_err());
        }

        #[test]
        fn test_tampered_field_fails(params: ManifestParams, field in 0usize..6) {
            let mut receipt = receipt_from_params(&params);
            let values = &mut receipt.license.values;
            match field {
                0 => receipt.license.form.push('!'),
                1 => values.licensee.name.push('x'),
                2 => values.licensor.email.push('x'),
                3 => values.effective = "1999-01-01T00:00:00Z".to_string(),
                4 => values.order_id = Uuid::nil().to_string(),
                _ => values.price = match values.price.take() {
                    Some(_) => None,
                    None => Some(Price::new(1, "USD")),
                },
            }
            prop_assume!(receipt != receipt_from_params(&params));
            prop_assert!(verify_receipt(&receipt).is_err());
        }
    }
}
