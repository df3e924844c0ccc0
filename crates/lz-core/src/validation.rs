//! Receipt verification.
//!
//! A receipt is only usable as proof of purchase once its signature has been
//! checked against the canonical bytes of its manifest. [`VerifiedReceipt`]
//! can only be obtained through that check.

use crate::canonical::canonical_manifest_bytes;
use crate::crypto::{Ed25519PublicKey, Ed25519Signature};
use crate::error::{CoreError, SignatureError};
use crate::receipt::{LicenseManifest, Receipt};
use crate::types::OfferKey;

/// Check a hex signature by a hex public key over a manifest.
///
/// The signature is decoded before the key, so a receipt with both fields
/// malformed reports `InvalidSignature`.
pub fn verify_manifest(
    public_key_hex: &str,
    signature_hex: &str,
    manifest: &LicenseManifest,
) -> Result<(), SignatureError> {
    let signature = Ed25519Signature::from_hex(signature_hex)?;
    let key = Ed25519PublicKey::from_hex(public_key_hex)?;
    key.verify(&canonical_manifest_bytes(manifest), &signature)
}

/// Check a receipt's own signature.
pub fn verify_receipt(receipt: &Receipt) -> Result<(), SignatureError> {
    verify_manifest(&receipt.key, &receipt.signature, &receipt.license)
}

/// A receipt whose signature has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedReceipt {
    receipt: Receipt,
    key: OfferKey,
}

impl VerifiedReceipt {
    /// Verify a receipt and resolve the offer it covers.
    pub fn verify(receipt: Receipt) -> Result<Self, CoreError> {
        verify_receipt(&receipt)?;
        let key = receipt.offer_key()?;
        Ok(Self { receipt, key })
    }

    pub fn receipt(&self) -> &Receipt {
        &self.receipt
    }

    /// The offer this receipt proves a purchase of.
    pub fn offer_key(&self) -> &OfferKey {
        &self.key
    }

    pub fn into_inner(self) -> Receipt {
        self.receipt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;
    use crate::offer::Price;
    use crate::receipt::{Licensee, Licensor, ManifestBuilder, Vendor};

    fn signed(keypair: &Keypair) -> Receipt {
        let key = OfferKey::parse(
            "https://api.licensezero.com",
            "9aab7058-599a-43db-9449-5fc0971ecbfa",
        )
        .unwrap();
        ManifestBuilder::new(
            "Test license form.",
            &key,
            "2c743a84-09ce-4549-9f0d-19d8f53462bb",
            "2018-11-13T20:20:39Z",
            Licensor {
                email: "licensor@example.com".into(),
                jurisdiction: "US-CA".into(),
                name: "Jane".into(),
                licensor_id: "59e70a4d-ffee-4e9d-a526-7a9ff9161664".into(),
            },
            Licensee {
                email: "licensee@example.com".into(),
                jurisdiction: "US-TX".into(),
                name: "Joe".into(),
            },
        )
        .price(Price::new(1000, "USD"))
        .vendor(Vendor {
            email: "vendor@example.com".into(),
            jurisdiction: "US-CA".into(),
            name: "Vendor".into(),
            website: "https://example.com".into(),
        })
        .sign(keypair)
    }

    #[test]
    fn test_signed_receipt_verifies() {
        let receipt = signed(&Keypair::from_seed(&[1u8; 32]));
        let verified = VerifiedReceipt::verify(receipt.clone()).unwrap();
        assert_eq!(verified.receipt(), &receipt);
        assert_eq!(
            verified.offer_key().offer_id.to_string(),
            "9aab7058-599a-43db-9449-5fc0971ecbfa"
        );
    }

    #[test]
    fn test_tampered_field_fails() {
        let mut receipt = signed(&Keypair::from_seed(&[1u8; 32]));
        receipt.license.values.licensee.name = "Mallory".into();
        assert_eq!(verify_receipt(&receipt), Err(SignatureError::Mismatch));
    }

    #[test]
    fn test_dropping_optional_field_fails() {
        let mut receipt = signed(&Keypair::from_seed(&[1u8; 32]));
        receipt.license.values.vendor = None;
        assert_eq!(verify_receipt(&receipt), Err(SignatureError::Mismatch));
    }

    #[test]
    fn test_other_key_fails() {
        let mut receipt = signed(&Keypair::from_seed(&[1u8; 32]));
        receipt.key = Keypair::from_seed(&[2u8; 32]).public_key().to_hex();
        assert!(verify_receipt(&receipt).is_err());
    }

    #[test]
    fn test_malformed_hex_reports_signature_first() {
        let mut receipt = signed(&Keypair::from_seed(&[1u8; 32]));
        receipt.key = "not hex".into();
        receipt.signature = "also not hex".into();
        assert_eq!(
            verify_receipt(&receipt),
            Err(SignatureError::InvalidSignature)
        );

        let mut receipt = signed(&Keypair::from_seed(&[1u8; 32]));
        receipt.key = "abcd".into();
        assert_eq!(
            verify_receipt(&receipt),
            Err(SignatureError::InvalidPublicKey)
        );
    }

    #[test]
    fn test_unverified_receipt_never_becomes_proof() {
        let mut receipt = signed(&Keypair::from_seed(&[1u8; 32]));
        receipt.license.form.push('!');
        let err = VerifiedReceipt::verify(receipt).unwrap_err();
        assert!(err.is_signature());
    }
}
