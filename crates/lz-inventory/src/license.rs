//! Classification of public license identifiers.

/// Broad family of a public license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LicenseClass {
    /// Free for noncommercial use only.
    Noncommercial,
    /// Free if you share your own work alike.
    Reciprocal,
    /// Anything else, including no public license at all.
    Other,
}

const NONCOMMERCIAL: &[&str] = &["prosperity-", "polyform-noncommercial-", "cc-by-nc"];

const RECIPROCAL: &[&str] = &[
    "parity-", "agpl-", "gpl-", "lgpl-", "eupl-", "osl-", "rpl-",
];

/// Classify a public license identifier by prefix, ignoring case.
pub fn classify_license(public: Option<&str>) -> LicenseClass {
    let Some(public) = public else {
        return LicenseClass::Other;
    };
    let lower = public.trim().to_ascii_lowercase();

    if NONCOMMERCIAL.iter().any(|p| lower.starts_with(p)) {
        LicenseClass::Noncommercial
    } else if RECIPROCAL.iter().any(|p| lower.starts_with(p)) {
        LicenseClass::Reciprocal
    } else {
        LicenseClass::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noncommercial() {
        for id in [
            "Prosperity-3.0.0",
            "PolyForm-Noncommercial-1.0.0",
            "CC-BY-NC-4.0",
            "cc-by-nc-sa-4.0",
        ] {
            assert_eq!(classify_license(Some(id)), LicenseClass::Noncommercial, "{id}");
        }
    }

    #[test]
    fn test_reciprocal() {
        for id in ["Parity-7.0.0", "AGPL-3.0-only", "GPL-2.0-or-later", "lgpl-2.1", "EUPL-1.2"] {
            assert_eq!(classify_license(Some(id)), LicenseClass::Reciprocal, "{id}");
        }
    }

    #[test]
    fn test_other() {
        assert_eq!(classify_license(None), LicenseClass::Other);
        assert_eq!(classify_license(Some("")), LicenseClass::Other);
        assert_eq!(classify_license(Some("MIT")), LicenseClass::Other);
        assert_eq!(classify_license(Some("Apache-2.0")), LicenseClass::Other);
        // Prefix only, not substring.
        assert_eq!(classify_license(Some("Not-GPL-3.0")), LicenseClass::Other);
    }
}
