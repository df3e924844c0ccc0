//! In-memory implementation of the LocalStore trait.
//!
//! This is primarily for testing. Records are verified before they can be
//! added, so the same proof rules apply as for the filesystem store.

use std::sync::RwLock;

use async_trait::async_trait;

use lz_core::{Account, VerifiedReceipt};

use crate::error::{Result, StoreError};
use crate::traits::{Loaded, LocalStore};

/// In-memory store implementation. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    receipts: Vec<VerifiedReceipt>,
    accounts: Vec<Account>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_receipt(&self, receipt: VerifiedReceipt) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        inner.receipts.push(receipt);
        Ok(())
    }

    pub fn add_account(&self, account: Account) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        inner.accounts.push(account);
        Ok(())
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn read_receipts(&self) -> Result<Loaded<VerifiedReceipt>> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(Loaded::new(inner.receipts.clone(), Vec::new()))
    }

    async fn read_accounts(&self) -> Result<Loaded<Account>> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(Loaded::new(inner.accounts.clone(), Vec::new()))
    }
}
