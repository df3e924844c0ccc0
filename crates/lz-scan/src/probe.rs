//! Package probes: identify the package a declaration belongs to.
//!
//! Probes are tried in order; the first one that recognizes the directory
//! wins. A probe never fails a scan, it just has nothing to say.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::finding::PackageInfo;

/// Reads package-manager metadata from a directory.
pub trait PackageProbe: Send + Sync {
    /// Short name of the package manager, used in logs.
    fn name(&self) -> &'static str;

    /// Identify the package in `dir`, if this probe recognizes it.
    fn probe(&self, dir: &Path) -> Option<PackageInfo>;
}

/// Reads `package.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmProbe;

#[derive(Deserialize)]
struct PackageJson {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

impl PackageProbe for NpmProbe {
    fn name(&self) -> &'static str {
        "npm"
    }

    fn probe(&self, dir: &Path) -> Option<PackageInfo> {
        let data = fs::read(dir.join("package.json")).ok()?;
        let parsed: PackageJson = serde_json::from_slice(&data).ok()?;
        let raw = parsed.name.filter(|n| !n.is_empty())?;
        let (scope, name) = split_npm_name(&raw);
        Some(PackageInfo {
            package_type: "npm".to_string(),
            name: name.to_string(),
            version: parsed.version,
            scope: scope.map(str::to_string),
        })
    }
}

/// Split `@scope/name` into its parts. Unscoped names pass through.
pub fn split_npm_name(raw: &str) -> (Option<&str>, &str) {
    if let Some(rest) = raw.strip_prefix('@') {
        if let Some((scope, name)) = rest.split_once('/') {
            if !scope.is_empty() && !name.is_empty() {
                return (Some(scope), name);
            }
        }
    }
    (None, raw)
}

/// Ask each probe in turn.
pub(crate) fn identify(probes: &[Box<dyn PackageProbe>], dir: &Path) -> Option<PackageInfo> {
    probes.iter().find_map(|p| p.probe(dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_npm_name() {
        assert_eq!(split_npm_name("@licensezero/cli"), (Some("licensezero"), "cli"));
        assert_eq!(split_npm_name("left-pad"), (None, "left-pad"));
        assert_eq!(split_npm_name("@broken"), (None, "@broken"));
        assert_eq!(split_npm_name("@/name"), (None, "@/name"));
    }

    #[test]
    fn test_npm_probe_reads_package_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name":"@acme/widget","version":"1.2.3","private":true}"#,
        )
        .unwrap();

        let info = NpmProbe.probe(dir.path()).unwrap();
        assert_eq!(info.package_type, "npm");
        assert_eq!(info.name, "widget");
        assert_eq!(info.scope.as_deref(), Some("acme"));
        assert_eq!(info.version.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn test_npm_probe_ignores_missing_or_broken() {
        let dir = tempfile::tempdir().unwrap();
        assert!(NpmProbe.probe(dir.path()).is_none());

        fs::write(dir.path().join("package.json"), b"{ nope").unwrap();
        assert!(NpmProbe.probe(dir.path()).is_none());

        fs::write(dir.path().join("package.json"), br#"{"version":"1.0.0"}"#).unwrap();
        assert!(NpmProbe.probe(dir.path()).is_none());
    }
}
