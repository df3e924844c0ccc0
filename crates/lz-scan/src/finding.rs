//! Findings: raw declaration entries discovered by a scan.

use std::path::PathBuf;
use uuid::Uuid;

use lz_core::OfferKey;

/// Package identity of the directory a declaration was found in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageInfo {
    /// Package manager, e.g. `npm`.
    pub package_type: String,
    pub name: String,
    pub version: Option<String>,
    pub scope: Option<String>,
}

/// One offer named by one declaration file.
///
/// Findings are created fresh for every scan and carry the offer reference
/// exactly as declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Directory holding the declaration, as walked (not canonicalized).
    pub path: PathBuf,
    pub package: Option<PackageInfo>,
    /// Public license identifier, e.g. `Parity-7.0.0`.
    pub public: Option<String>,
    pub api: String,
    pub offer_id: Uuid,
}

impl Finding {
    pub fn key(&self) -> OfferKey {
        OfferKey::new(self.api.clone(), self.offer_id)
    }

    /// A short label for logs: package name if known, else the path.
    pub fn label(&self) -> String {
        match &self.package {
            Some(PackageInfo {
                name,
                scope: Some(scope),
                ..
            }) => format!("@{scope}/{name}"),
            Some(package) => package.name.clone(),
            None => self.path.display().to_string(),
        }
    }
}
