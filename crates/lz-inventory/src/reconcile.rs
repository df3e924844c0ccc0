//! The Reconciler: one inventory pass from scan to buckets.
//!
//! A pass reads the local store once, scans the project tree, looks up
//! every distinct offer concurrently and then sorts findings into buckets
//! in scan order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use lz_core::{Offer, OfferKey, SchemaRegistry};
use lz_directory::{HttpDirectory, HttpDirectoryConfig, OfferSource, ResolveError};
use lz_scan::{Finding, Scanner};
use lz_store::{ConfigDirStore, LocalStore, StoreExt};

use crate::cancel::CancelHandle;
use crate::classify::{classify, Resolution};
use crate::config::InventoryConfig;
use crate::error::{InventoryError, Result};
use crate::inventory::Inventory;

/// Runs inventory passes.
///
/// Holds no state between passes: receipts, accounts and offers are read
/// fresh every time.
pub struct Reconciler<S: LocalStore, O: OfferSource> {
    store: Arc<S>,
    source: Arc<O>,
    scanner: Arc<Scanner>,
    config: InventoryConfig,
}

impl<S: LocalStore, O: OfferSource + 'static> Reconciler<S, O> {
    pub fn new(store: S, source: O, scanner: Scanner, config: InventoryConfig) -> Self {
        Self {
            store: Arc::new(store),
            source: Arc::new(source),
            scanner: Arc::new(scanner),
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn source(&self) -> &O {
        &self.source
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Passes
    // ─────────────────────────────────────────────────────────────────────────

    /// Inventory the project tree under `root`.
    pub async fn compile(&self, root: impl AsRef<Path>) -> Result<Inventory> {
        self.compile_with_cancel(root, &CancelHandle::new()).await
    }

    /// Inventory the project tree under `root`, stopping early if `cancel` fires.
    ///
    /// A cancelled pass issues no further lookups and aborts the ones in
    /// flight. The inventory it returns holds only findings whose lookup
    /// finished, each fully classified, and is marked `interrupted`.
    pub async fn compile_with_cancel(
        &self,
        root: impl AsRef<Path>,
        cancel: &CancelHandle,
    ) -> Result<Inventory> {
        let root = root.as_ref().to_path_buf();
        info!(root = %root.display(), "starting inventory pass");

        let snapshot = self.store.snapshot(self.config.local_failures).await?;
        debug!(
            receipts = snapshot.receipts().len(),
            accounts = snapshot.accounts().len(),
            skipped = snapshot.skipped,
            "read local records"
        );

        if cancel.is_cancelled() {
            info!("inventory pass cancelled before scan");
            return Ok(Inventory {
                interrupted: true,
                ..Default::default()
            });
        }

        let findings = self.scan(root).await?;
        let resolutions = self.resolve_all(&findings, cancel).await;

        let mut inventory = classify(
            findings,
            resolutions,
            &snapshot,
            &self.config.classify_options(),
        );
        inventory.interrupted = inventory.skipped > 0;

        let counts = inventory.counts();
        info!(
            licensable = counts.licensable,
            licensed = counts.licensed,
            own = counts.own,
            unlicensed = counts.unlicensed,
            ignored = counts.ignored,
            invalid = counts.invalid,
            skipped = inventory.skipped,
            interrupted = inventory.interrupted,
            "inventory pass finished"
        );
        Ok(inventory)
    }

    async fn scan(&self, root: PathBuf) -> Result<Vec<Finding>> {
        let scanner = self.scanner.clone();
        let findings = tokio::task::spawn_blocking(move || scanner.scan(&root))
            .await
            .map_err(|e| InventoryError::Task(e.to_string()))??;
        debug!(findings = findings.len(), "scan finished");
        Ok(findings)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Offer lookups
    // ─────────────────────────────────────────────────────────────────────────

    /// Look up each distinct offer once and fan results back out per finding.
    async fn resolve_all(&self, findings: &[Finding], cancel: &CancelHandle) -> Vec<Resolution> {
        let mut unique: Vec<OfferKey> = Vec::new();
        let mut slot_of: HashMap<OfferKey, usize> = HashMap::new();
        for finding in findings {
            let key = finding.key();
            if !slot_of.contains_key(&key) {
                slot_of.insert(key.clone(), unique.len());
                unique.push(key);
            }
        }

        let mut slots: Vec<Option<std::result::Result<Offer, String>>> =
            (0..unique.len()).map(|_| None).collect();
        let semaphore = Arc::new(Semaphore::new(self.config.lookup_permits()));
        let timeout = self.config.lookup_timeout;
        let mut tasks = JoinSet::new();

        for (slot, key) in unique.iter().enumerate() {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let source = self.source.clone();
            let key = key.clone();
            tasks.spawn(async move {
                let _permit = permit;
                let result = match tokio::time::timeout(timeout, source.fetch_offer(&key)).await {
                    Ok(result) => result,
                    Err(_) => Err(ResolveError::Timeout {
                        key: key.clone(),
                        after: timeout,
                    }),
                };
                (slot, key, result)
            });
        }

        let mut aborted = false;
        loop {
            let next = if aborted {
                tasks.join_next().await
            } else {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        debug!(in_flight = tasks.len(), "aborting offer lookups");
                        tasks.abort_all();
                        aborted = true;
                        continue;
                    }
                    next = tasks.join_next() => next,
                }
            };

            let Some(joined) = next else { break };
            match joined {
                Ok((slot, key, Ok(offer))) => {
                    debug!(offer = %key, "resolved offer");
                    slots[slot] = Some(Ok(offer));
                }
                Ok((slot, key, Err(e))) => {
                    warn!(offer = %key, error = %e, "offer lookup failed");
                    slots[slot] = Some(Err(e.to_string()));
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => warn!(error = %e, "offer lookup task failed"),
            }
        }

        let cancelled = cancel.is_cancelled();
        findings
            .iter()
            .map(|finding| {
                let slot = slot_of.get(&finding.key()).and_then(|&i| slots[i].as_ref());
                match slot {
                    Some(Ok(offer)) => Resolution::Resolved(offer.clone()),
                    Some(Err(reason)) => Resolution::Failed(reason.clone()),
                    None if cancelled => Resolution::Skipped,
                    None => Resolution::Failed("offer lookup did not complete".to_string()),
                }
            })
            .collect()
    }
}

impl Reconciler<ConfigDirStore, HttpDirectory> {
    /// The usual setup: records under `config_root`, offers over HTTPS and
    /// the default scanner, all sharing one schema registry.
    pub fn open(config_root: impl Into<PathBuf>, config: InventoryConfig) -> Result<Self> {
        let registry = Arc::new(SchemaRegistry::new()?);
        let store = ConfigDirStore::new(config_root, registry.clone());
        let source = HttpDirectory::new(
            HttpDirectoryConfig {
                request_timeout: config.lookup_timeout,
                ..Default::default()
            },
            registry.clone(),
        )?;
        let scanner = Scanner::new(registry);
        Ok(Self::new(store, source, scanner, config))
    }
}
