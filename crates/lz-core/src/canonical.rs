//! Canonical JSON encoding of license manifests.
//!
//! The signed artifact of a receipt is a byte sequence, not a structure:
//! - keys appear in one fixed order at every level
//! - no whitespace
//! - optional values that are absent (`expires`, `price`, `vendor`) are
//!   left out entirely, never written as `null`
//! - strings use standard JSON escaping; amounts are plain decimal integers
//!
//! The key order happens to be lexicographic, but it is written out by hand
//! so that adding a field to the structs can never silently change it.

use serde_json::Value;

use crate::offer::Price;
use crate::receipt::{LicenseManifest, Licensee, Licensor, ManifestValues, Vendor};

/// Manifest field keys, in emission order per object.
mod keys {
    pub const FORM: &str = "form";
    pub const VALUES: &str = "values";

    pub const API: &str = "api";
    pub const EFFECTIVE: &str = "effective";
    pub const EXPIRES: &str = "expires";
    pub const LICENSEE: &str = "licensee";
    pub const LICENSOR: &str = "licensor";
    pub const OFFER_ID: &str = "offerID";
    pub const ORDER_ID: &str = "orderID";
    pub const PRICE: &str = "price";
    pub const VENDOR: &str = "vendor";

    pub const EMAIL: &str = "email";
    pub const JURISDICTION: &str = "jurisdiction";
    pub const LICENSOR_ID: &str = "licensorID";
    pub const NAME: &str = "name";
    pub const WEBSITE: &str = "website";

    pub const AMOUNT: &str = "amount";
    pub const CURRENCY: &str = "currency";
}

/// Encode a license manifest to its canonical signed bytes.
pub fn canonical_manifest_bytes(manifest: &LicenseManifest) -> Vec<u8> {
    let mut w = CanonicalWriter::new();
    w.begin_object();
    w.string_field(keys::FORM, &manifest.form);
    w.key(keys::VALUES);
    write_values(&mut w, &manifest.values);
    w.end_object();
    w.finish()
}

/// Encode a manifest and return it as text, mostly for diagnostics.
pub fn canonical_manifest_string(manifest: &LicenseManifest) -> String {
    // Every byte comes from `&str` input or ASCII punctuation.
    String::from_utf8_lossy(&canonical_manifest_bytes(manifest)).into_owned()
}

fn write_values(w: &mut CanonicalWriter, values: &ManifestValues) {
    w.begin_object();
    w.string_field(keys::API, &values.api);
    w.string_field(keys::EFFECTIVE, &values.effective);
    if let Some(expires) = &values.expires {
        w.string_field(keys::EXPIRES, expires);
    }
    w.key(keys::LICENSEE);
    write_licensee(w, &values.licensee);
    w.key(keys::LICENSOR);
    write_licensor(w, &values.licensor);
    w.string_field(keys::OFFER_ID, &values.offer_id);
    w.string_field(keys::ORDER_ID, &values.order_id);
    if let Some(price) = &values.price {
        w.key(keys::PRICE);
        write_price(w, price);
    }
    if let Some(vendor) = &values.vendor {
        w.key(keys::VENDOR);
        write_vendor(w, vendor);
    }
    w.end_object();
}

fn write_licensee(w: &mut CanonicalWriter, licensee: &Licensee) {
    w.begin_object();
    w.string_field(keys::EMAIL, &licensee.email);
    w.string_field(keys::JURISDICTION, &licensee.jurisdiction);
    w.string_field(keys::NAME, &licensee.name);
    w.end_object();
}

fn write_licensor(w: &mut CanonicalWriter, licensor: &Licensor) {
    w.begin_object();
    w.string_field(keys::EMAIL, &licensor.email);
    w.string_field(keys::JURISDICTION, &licensor.jurisdiction);
    w.string_field(keys::LICENSOR_ID, &licensor.licensor_id);
    w.string_field(keys::NAME, &licensor.name);
    w.end_object();
}

fn write_price(w: &mut CanonicalWriter, price: &Price) {
    w.begin_object();
    w.key(keys::AMOUNT);
    w.unsigned(price.amount);
    w.string_field(keys::CURRENCY, &price.currency);
    w.end_object();
}

fn write_vendor(w: &mut CanonicalWriter, vendor: &Vendor) {
    w.begin_object();
    w.string_field(keys::EMAIL, &vendor.email);
    w.string_field(keys::JURISDICTION, &vendor.jurisdiction);
    w.string_field(keys::NAME, &vendor.name);
    w.string_field(keys::WEBSITE, &vendor.website);
    w.end_object();
}

/// Minimal streaming JSON writer that only knows objects, strings and
/// unsigned integers.
///
/// Each open object tracks whether it has written a member yet, which is
/// all that is needed to place commas.
struct CanonicalWriter {
    buf: Vec<u8>,
    open: Vec<bool>,
}

impl CanonicalWriter {
    fn new() -> Self {
        Self {
            buf: Vec::with_capacity(512),
            open: Vec::new(),
        }
    }

    fn begin_object(&mut self) {
        self.buf.push(b'{');
        self.open.push(false);
    }

    fn end_object(&mut self) {
        self.open.pop();
        self.buf.push(b'}');
    }

    fn key(&mut self, key: &str) {
        if let Some(has_members) = self.open.last_mut() {
            if *has_members {
                self.buf.push(b',');
            }
            *has_members = true;
        }
        self.string(key);
        self.buf.push(b':');
    }

    fn string_field(&mut self, key: &str, value: &str) {
        self.key(key);
        self.string(value);
    }

    fn string(&mut self, s: &str) {
        self.buf
            .extend_from_slice(Value::from(s).to_string().as_bytes());
    }

    fn unsigned(&mut self, n: u64) {
        self.buf.extend_from_slice(n.to_string().as_bytes());
    }

    fn finish(self) -> Vec<u8> {
        debug_assert!(self.open.is_empty(), "unbalanced canonical writer");
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASIC: &str = r#"{"form":"Test license form.","values":{"api":"https://api.licensezero.com","effective":"2018-11-13T20:20:39Z","licensee":{"email":"licensee@example.com","jurisdiction":"US-TX","name":"Joe"},"licensor":{"email":"licensor@example.com","jurisdiction":"US-CA","licensorID":"59e70a4d-ffee-4e9d-a526-7a9ff9161664","name":"Jane"},"offerID":"9aab7058-599a-43db-9449-5fc0971ecbfa","orderID":"2c743a84-09ce-4549-9f0d-19d8f53462bb"}}"#;

    const WITH_PRICE_AND_VENDOR: &str = r#"{"form":"Test license form.","values":{"api":"https://api.licensezero.com","effective":"2018-11-13T20:20:39Z","licensee":{"email":"licensee@example.com","jurisdiction":"US-TX","name":"Joe"},"licensor":{"email":"licensor@example.com","jurisdiction":"US-CA","licensorID":"59e70a4d-ffee-4e9d-a526-7a9ff9161664","name":"Jane"},"offerID":"9aab7058-599a-43db-9449-5fc0971ecbfa","orderID":"2c743a84-09ce-4549-9f0d-19d8f53462bb","price":{"amount":1000,"currency":"USD"},"vendor":{"email":"vendor@example.com","jurisdiction":"US-CA","name":"Vendor","website":"https://example.com"}}}"#;

    #[test]
    fn test_canonical_form_matches_signed_text() {
        for text in [BASIC, WITH_PRICE_AND_VENDOR] {
            let manifest: LicenseManifest = serde_json::from_str(text).unwrap();
            assert_eq!(canonical_manifest_string(&manifest), text);
        }
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let shuffled = json!({
            "values": {
                "orderID": "2c743a84-09ce-4549-9f0d-19d8f53462bb",
                "licensor": {
                    "name": "Jane",
                    "licensorID": "59e70a4d-ffee-4e9d-a526-7a9ff9161664",
                    "jurisdiction": "US-CA",
                    "email": "licensor@example.com"
                },
                "offerID": "9aab7058-599a-43db-9449-5fc0971ecbfa",
                "licensee": {
                    "name": "Joe",
                    "jurisdiction": "US-TX",
                    "email": "licensee@example.com"
                },
                "effective": "2018-11-13T20:20:39Z",
                "api": "https://api.licensezero.com"
            },
            "form": "Test license form."
        });
        let manifest: LicenseManifest = serde_json::from_value(shuffled).unwrap();
        assert_eq!(canonical_manifest_bytes(&manifest), BASIC.as_bytes());
    }

    #[test]
    fn test_strings_are_escaped() {
        let mut manifest: LicenseManifest = serde_json::from_str(BASIC).unwrap();
        manifest.form = "line one\nline \"two\"".into();
        let text = canonical_manifest_string(&manifest);
        assert!(text.starts_with(r#"{"form":"line one\nline \"two\"","values":"#));
    }

    #[test]
    fn test_zero_amount_has_no_leading_zeros() {
        let mut manifest: LicenseManifest = serde_json::from_str(BASIC).unwrap();
        manifest.values.price = Some(Price::new(0, "USD"));
        let text = canonical_manifest_string(&manifest);
        assert!(text.contains(r#""price":{"amount":0,"currency":"USD"}"#));
    }
}
