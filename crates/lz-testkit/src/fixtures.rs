//! Test fixtures and helpers.
//!
//! Signed receipts, offer documents, project trees and configuration roots
//! for tests that exercise a whole pass.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use uuid::Uuid;

use lz_core::{
    Account, Keypair, Licensee, Licensor, ManifestBuilder, OfferKey, Receipt, SchemaRegistry,
    VerifiedReceipt,
};
use lz_directory::MemoryDirectory;
use lz_scan::{Scanner, DECLARATION_FILE};
use lz_store::{ConfigDirStore, MemoryStore, ACCOUNTS_DIR, RECEIPTS_DIR};

/// API used by fixtures unless told otherwise.
pub const TEST_API: &str = "https://api.example.com";

/// A vendor keypair and licensor identity, plus a shared schema registry.
pub struct TestFixture {
    pub keypair: Keypair,
    pub licensor_id: Uuid,
    pub registry: Arc<SchemaRegistry>,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self::from_keypair(Keypair::generate())
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::from_keypair(Keypair::from_seed(&seed))
    }

    fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair,
            licensor_id: Uuid::new_v4(),
            registry: Arc::new(SchemaRegistry::new().expect("embedded schemas compile")),
        }
    }

    /// A fresh offer key at [`TEST_API`].
    pub fn offer_key(&self) -> OfferKey {
        OfferKey::new(TEST_API, Uuid::new_v4())
    }

    pub fn licensor(&self) -> Licensor {
        Licensor {
            email: "licensor@example.com".into(),
            jurisdiction: "US-CA".into(),
            name: "Jane Licensor".into(),
            licensor_id: self.licensor_id.to_string(),
        }
    }

    pub fn licensee(&self) -> Licensee {
        Licensee {
            email: "licensee@example.com".into(),
            jurisdiction: "US-TX".into(),
            name: "Joe Licensee".into(),
        }
    }

    /// A manifest builder for `key` with fixed order and dates.
    pub fn manifest(&self, key: &OfferKey) -> ManifestBuilder {
        ManifestBuilder::new(
            "Test license form.",
            key,
            Uuid::new_v4().to_string(),
            "2018-11-13T20:20:39Z",
            self.licensor(),
            self.licensee(),
        )
    }

    /// A receipt for `key`, signed with the fixture keypair.
    pub fn receipt(&self, key: &OfferKey) -> Receipt {
        self.manifest(key).sign(&self.keypair)
    }

    pub fn verified_receipt(&self, key: &OfferKey) -> VerifiedReceipt {
        VerifiedReceipt::verify(self.receipt(key)).expect("fixture receipt verifies")
    }

    /// An account making the fixture licensor the current user.
    pub fn account(&self) -> Account {
        Account {
            api: TEST_API.into(),
            licensor_id: self.licensor_id,
            token: "test-token".into(),
        }
    }

    /// An offer body from the fixture licensor, as a directory serves it.
    pub fn offer_document(&self) -> Value {
        offer_document(self.licensor_id)
    }

    pub fn memory_store(&self) -> MemoryStore {
        MemoryStore::new()
    }

    pub fn memory_directory(&self) -> MemoryDirectory {
        MemoryDirectory::new(self.registry.clone())
    }

    pub fn config_store(&self, root: &ConfigRoot) -> ConfigDirStore {
        ConfigDirStore::new(root.path(), self.registry.clone())
    }

    pub fn scanner(&self) -> Scanner {
        Scanner::new(self.registry.clone())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// An offer body for `licensor_id` priced at ten dollars.
pub fn offer_document(licensor_id: Uuid) -> Value {
    json!({
        "licensorID": licensor_id,
        "url": "https://example.com/project",
        "pricing": {
            "single": { "amount": 1000, "currency": "USD" },
            "relicense": { "amount": 100000, "currency": "USD" }
        }
    })
}

/// A declaration entry: offer plus optional public license.
pub fn declared(key: &OfferKey, public: Option<&str>) -> Value {
    let mut entry = json!({
        "api": key.api,
        "offerID": key.offer_id,
    });
    if let Some(public) = public {
        entry["public"] = json!(public);
    }
    entry
}

// ─────────────────────────────────────────────────────────────────────────────
// Directory trees
// ─────────────────────────────────────────────────────────────────────────────

/// A temporary project tree to scan.
pub struct ProjectTree {
    dir: TempDir,
}

impl ProjectTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create `rel` (and parents) under the tree root.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(&path).expect("create project dir");
        path
    }

    /// Write a declaration naming `offers` in `rel`.
    pub fn declare(&self, rel: &str, offers: &[Value]) -> PathBuf {
        let dir = self.dir(rel);
        let body = json!({ "offers": offers });
        fs::write(dir.join(DECLARATION_FILE), body.to_string()).expect("write declaration");
        dir
    }

    /// Write a `package.json` in `rel`.
    pub fn package_json(&self, rel: &str, name: &str, version: &str) -> PathBuf {
        let dir = self.dir(rel);
        let body = json!({ "name": name, "version": version });
        fs::write(dir.join("package.json"), body.to_string()).expect("write package.json");
        dir
    }

    /// Write arbitrary bytes to `rel`.
    pub fn write(&self, rel: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, bytes).expect("write file");
        path
    }

    /// Make `link` a symlink to `target`, both relative to the root.
    #[cfg(unix)]
    pub fn symlink(&self, target: &str, link: &str) -> PathBuf {
        let link = self.dir.path().join(link);
        if let Some(parent) = link.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        std::os::unix::fs::symlink(self.dir.path().join(target), &link).expect("create symlink");
        link
    }
}

impl Default for ProjectTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A temporary configuration root with `receipts/` and `accounts/`.
pub struct ConfigRoot {
    dir: TempDir,
}

impl ConfigRoot {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_receipt(&self, name: &str, receipt: &Receipt) -> PathBuf {
        let body = serde_json::to_vec_pretty(receipt).expect("serialize receipt");
        self.write_raw(RECEIPTS_DIR, name, &body)
    }

    pub fn write_account(&self, name: &str, account: &Account) -> PathBuf {
        let body = serde_json::to_vec_pretty(account).expect("serialize account");
        self.write_raw(ACCOUNTS_DIR, name, &body)
    }

    /// Write `bytes` as `name` inside `subdir`.
    pub fn write_raw(&self, subdir: &str, name: &str, bytes: &[u8]) -> PathBuf {
        let dir = self.dir.path().join(subdir);
        fs::create_dir_all(&dir).expect("create record dir");
        let path = dir.join(name);
        fs::write(&path, bytes).expect("write record");
        path
    }
}

impl Default for ConfigRoot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lz_store::{LocalFailurePolicy, StoreExt};

    #[test]
    fn test_fixture_receipt_verifies() {
        let fixture = TestFixture::with_seed([7u8; 32]);
        let key = fixture.offer_key();
        let verified = fixture.verified_receipt(&key);
        assert_eq!(verified.offer_key(), &key);
    }

    #[test]
    fn test_offer_document_passes_schema() {
        let fixture = TestFixture::new();
        fixture
            .registry
            .parse_offer(&fixture.offer_document())
            .unwrap();
    }

    #[test]
    fn test_declaration_passes_schema() {
        let fixture = TestFixture::new();
        let key = fixture.offer_key();
        let tree = ProjectTree::new();
        tree.declare("a", &[declared(&key, Some("Parity-7.0.0"))]);

        let findings = fixture.scanner().scan(tree.path()).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].key(), key);
        assert_eq!(findings[0].public.as_deref(), Some("Parity-7.0.0"));
    }

    #[tokio::test]
    async fn test_config_root_round_trips_through_store() {
        let fixture = TestFixture::new();
        let key = fixture.offer_key();
        let root = ConfigRoot::new();
        root.write_receipt("one.json", &fixture.receipt(&key));
        root.write_account("me.json", &fixture.account());

        let snapshot = fixture
            .config_store(&root)
            .snapshot(LocalFailurePolicy::Abort)
            .await
            .unwrap();
        assert!(snapshot.receipt_for(&key).is_some());
        assert!(snapshot.account_for(TEST_API, &fixture.licensor_id).is_some());
    }
}
