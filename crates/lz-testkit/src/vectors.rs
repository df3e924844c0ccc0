//! Golden test vectors for canonical manifest bytes.
//!
//! Each vector pairs a manifest as it might appear in a receipt file (any
//! key order, any whitespace) with the exact bytes a signature must cover.
//! The first two are the signed texts of receipts issued by the licensing
//! service.

use lz_core::{canonical_manifest_string, sign_manifest, Keypair, LicenseManifest, Receipt};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Seed for deterministic key generation.
    pub seed: [u8; 32],
    /// The manifest as JSON, in whatever order and layout.
    pub input: &'static str,
    /// Expected canonical text.
    pub expected_canonical: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "Basic manifest",
            seed: [0x42; 32],
            input: r#"{
                "values": {
                    "orderID": "2c743a84-09ce-4549-9f0d-19d8f53462bb",
                    "offerID": "9aab7058-599a-43db-9449-5fc0971ecbfa",
                    "licensor": {
                        "name": "Jane",
                        "licensorID": "59e70a4d-ffee-4e9d-a526-7a9ff9161664",
                        "jurisdiction": "US-CA",
                        "email": "licensor@example.com"
                    },
                    "licensee": {
                        "name": "Joe",
                        "jurisdiction": "US-TX",
                        "email": "licensee@example.com"
                    },
                    "effective": "2018-11-13T20:20:39Z",
                    "api": "https://api.licensezero.com"
                },
                "form": "Test license form."
            }"#,
            expected_canonical: r#"{"form":"Test license form.","values":{"api":"https://api.licensezero.com","effective":"2018-11-13T20:20:39Z","licensee":{"email":"licensee@example.com","jurisdiction":"US-TX","name":"Joe"},"licensor":{"email":"licensor@example.com","jurisdiction":"US-CA","licensorID":"59e70a4d-ffee-4e9d-a526-7a9ff9161664","name":"Jane"},"offerID":"9aab7058-599a-43db-9449-5fc0971ecbfa","orderID":"2c743a84-09ce-4549-9f0d-19d8f53462bb"}}"#,
        },
        GoldenVector {
            name: "Price and vendor",
            seed: [0x42; 32],
            input: r#"{
                "form": "Test license form.",
                "values": {
                    "vendor": {
                        "website": "https://example.com",
                        "name": "Vendor",
                        "jurisdiction": "US-CA",
                        "email": "vendor@example.com"
                    },
                    "price": { "currency": "USD", "amount": 1000 },
                    "api": "https://api.licensezero.com",
                    "effective": "2018-11-13T20:20:39Z",
                    "licensee": {
                        "email": "licensee@example.com",
                        "jurisdiction": "US-TX",
                        "name": "Joe"
                    },
                    "licensor": {
                        "email": "licensor@example.com",
                        "jurisdiction": "US-CA",
                        "licensorID": "59e70a4d-ffee-4e9d-a526-7a9ff9161664",
                        "name": "Jane"
                    },
                    "offerID": "9aab7058-599a-43db-9449-5fc0971ecbfa",
                    "orderID": "2c743a84-09ce-4549-9f0d-19d8f53462bb"
                }
            }"#,
            expected_canonical: r#"{"form":"Test license form.","values":{"api":"https://api.licensezero.com","effective":"2018-11-13T20:20:39Z","licensee":{"email":"licensee@example.com","jurisdiction":"US-TX","name":"Joe"},"licensor":{"email":"licensor@example.com","jurisdiction":"US-CA","licensorID":"59e70a4d-ffee-4e9d-a526-7a9ff9161664","name":"Jane"},"offerID":"9aab7058-599a-43db-9449-5fc0971ecbfa","orderID":"2c743a84-09ce-4549-9f0d-19d8f53462bb","price":{"amount":1000,"currency":"USD"},"vendor":{"email":"vendor@example.com","jurisdiction":"US-CA","name":"Vendor","website":"https://example.com"}}}"#,
        },
        GoldenVector {
            name: "Expiring, free, escaped names",
            seed: [0x00; 32],
            input: r#"{"values":{"price":{"amount":0,"currency":"EUR"},"orderID":"33333333-3333-4333-8333-333333333333","offerID":"11111111-1111-4111-8111-111111111111","licensor":{"name":"Bea","licensorID":"22222222-2222-4222-8222-222222222222","jurisdiction":"US-NY","email":"b@example.com"},"licensee":{"name":"Zoë \"Z\" Example","jurisdiction":"GB","email":"a@example.com"},"expires":"2020-01-01T00:00:00Z","effective":"2019-01-01T00:00:00Z","api":"https://api.example.com"},"form":"Free license."}"#,
            expected_canonical: r#"{"form":"Free license.","values":{"api":"https://api.example.com","effective":"2019-01-01T00:00:00Z","expires":"2020-01-01T00:00:00Z","licensee":{"email":"a@example.com","jurisdiction":"GB","name":"Zoë \"Z\" Example"},"licensor":{"email":"b@example.com","jurisdiction":"US-NY","licensorID":"22222222-2222-4222-8222-222222222222","name":"Bea"},"offerID":"11111111-1111-4111-8111-111111111111","orderID":"33333333-3333-4333-8333-333333333333","price":{"amount":0,"currency":"EUR"}}}"#,
        },
    ]
}

/// Parse a vector's input manifest.
pub fn manifest_from_vector(vector: &GoldenVector) -> LicenseManifest {
    serde_json::from_str(vector.input).expect("golden vector input is a manifest")
}

/// Sign a vector's manifest with the vector's seed.
pub fn receipt_from_vector(vector: &GoldenVector) -> Receipt {
    let keypair = Keypair::from_seed(&vector.seed);
    sign_manifest(manifest_from_vector(vector), &keypair)
}

/// Check every vector's canonical text.
///
/// Returns `(name, matches, canonical)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let canonical = canonical_manifest_string(&manifest_from_vector(v));
            let matches = canonical == v.expected_canonical;
            (v.name.to_string(), matches, canonical)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lz_core::{verify_manifest, verify_receipt};

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, canonical) in verify_all_vectors() {
            assert!(matches, "vector '{name}' canonicalized to {canonical}");
        }
    }

    #[test]
    fn test_vector_receipts_verify() {
        for vector in all_vectors() {
            let receipt = receipt_from_vector(&vector);
            assert!(verify_receipt(&receipt).is_ok(), "vector '{}'", vector.name);
            assert_eq!(
                receipt.key,
                hex::encode(Keypair::from_seed(&vector.seed).public_key().0)
            );
        }
    }

    #[test]
    fn test_vector_signatures_are_deterministic() {
        for vector in all_vectors() {
            let r1 = receipt_from_vector(&vector);
            let r2 = receipt_from_vector(&vector);
            assert_eq!(r1.signature, r2.signature, "vector '{}'", vector.name);
        }
    }

    #[test]
    fn test_signature_does_not_cover_other_vectors() {
        let vectors = all_vectors();
        let basic = receipt_from_vector(&vectors[0]);
        let priced = manifest_from_vector(&vectors[1]);
        assert!(verify_manifest(&basic.key, &basic.signature, &priced).is_err());
    }

    #[test]
    fn test_different_seeds_different_keys() {
        let a = Keypair::from_seed(&[0x01; 32]).public_key();
        let b = Keypair::from_seed(&[0x02; 32]).public_key();
        assert_ne!(a, b);
    }
}
