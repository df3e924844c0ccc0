//! LocalStore trait: read-only access to the user's receipts and accounts.
//!
//! An inventory pass reads the store exactly once, at the start, into an
//! immutable [`Snapshot`]. Nothing writes to the store during a pass.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use lz_core::{Account, OfferKey, VerifiedReceipt};

use crate::error::{Result, StoreError};

/// Records read from a store together with the entries that could not be read.
#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub failures: Vec<StoreError>,
}

impl<T> Loaded<T> {
    pub fn new(records: Vec<T>, failures: Vec<StoreError>) -> Self {
        Self { records, failures }
    }
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

/// What to do with local records that cannot be read or verified.
///
/// A missing receipt can turn a licensed dependency into an unlicensed one,
/// so the default is to stop the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalFailurePolicy {
    /// Fail the pass on the first unreadable record.
    #[default]
    Abort,
    /// Log and drop unreadable records. They are never used as proof.
    Skip,
}

/// The Store trait: async, read-only access to local records.
///
/// Receipts only leave a store after their signatures have been checked.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Read every receipt.
    ///
    /// A missing receipt collection is empty, not an error. Per-record
    /// failures are reported in [`Loaded::failures`].
    async fn read_receipts(&self) -> Result<Loaded<VerifiedReceipt>>;

    /// Read every account.
    async fn read_accounts(&self) -> Result<Loaded<Account>>;
}

/// Extension trait for common store patterns.
pub trait StoreExt: LocalStore {
    /// Read receipts and accounts once into an immutable snapshot.
    fn snapshot(
        &self,
        policy: LocalFailurePolicy,
    ) -> impl std::future::Future<Output = Result<Snapshot>> + Send;
}

impl<S: LocalStore + ?Sized> StoreExt for S {
    async fn snapshot(&self, policy: LocalFailurePolicy) -> Result<Snapshot> {
        let receipts = self.read_receipts().await?;
        let accounts = self.read_accounts().await?;

        let mut skipped = 0;
        for failure in receipts.failures.into_iter().chain(accounts.failures) {
            match policy {
                LocalFailurePolicy::Abort => return Err(failure),
                LocalFailurePolicy::Skip => {
                    warn!(error = %failure, "skipping unreadable local record");
                    skipped += 1;
                }
            }
        }

        let mut snapshot = Snapshot::new(receipts.records, accounts.records);
        snapshot.skipped = skipped;
        Ok(snapshot)
    }
}

/// An immutable view of local receipts and accounts, taken at pass start.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    receipts: Vec<VerifiedReceipt>,
    accounts: Vec<Account>,
    by_offer: HashMap<OfferKey, usize>,
    /// Records dropped under [`LocalFailurePolicy::Skip`].
    pub skipped: usize,
}

impl Snapshot {
    pub fn new(receipts: Vec<VerifiedReceipt>, accounts: Vec<Account>) -> Self {
        let mut by_offer = HashMap::with_capacity(receipts.len());
        for (i, receipt) in receipts.iter().enumerate() {
            by_offer.entry(receipt.offer_key().clone()).or_insert(i);
        }
        Self {
            receipts,
            accounts,
            by_offer,
            skipped: 0,
        }
    }

    /// The first receipt for `key`, if the user bought a license.
    pub fn receipt_for(&self, key: &OfferKey) -> Option<&VerifiedReceipt> {
        self.by_offer.get(key).map(|&i| &self.receipts[i])
    }

    /// The account through which the user is the licensor, if any.
    pub fn account_for(&self, api: &str, licensor_id: &Uuid) -> Option<&Account> {
        self.accounts.iter().find(|a| a.owns(api, licensor_id))
    }

    pub fn receipts(&self) -> &[VerifiedReceipt] {
        &self.receipts
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }
}
