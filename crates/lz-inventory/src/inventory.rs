//! The result of an inventory pass.

use lz_core::Offer;
use lz_scan::Finding;

/// A finding whose offer resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub finding: Finding,
    pub offer: Offer,
}

/// A finding whose offer could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidItem {
    pub finding: Finding,
    /// Why the lookup failed, for display.
    pub reason: String,
}

/// Findings sorted into buckets.
///
/// Every resolved item is in `licensable` and in exactly one of `licensed`,
/// `own`, `ignored` or `unlicensed`. Unresolved findings are only in
/// `invalid`. Each bucket is in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub licensable: Vec<InventoryItem>,
    pub licensed: Vec<InventoryItem>,
    pub own: Vec<InventoryItem>,
    pub unlicensed: Vec<InventoryItem>,
    pub ignored: Vec<InventoryItem>,
    pub invalid: Vec<InvalidItem>,
    /// The pass was cancelled before every lookup finished.
    pub interrupted: bool,
    /// Findings left out because their lookup never finished.
    pub skipped: usize,
}

impl Inventory {
    /// Number of findings that made it into a bucket.
    pub fn classified(&self) -> usize {
        self.licensable.len() + self.invalid.len()
    }

    /// True when nothing needs buying.
    pub fn is_clear(&self) -> bool {
        self.unlicensed.is_empty()
    }

    pub(crate) fn counts(&self) -> Counts {
        Counts {
            licensable: self.licensable.len(),
            licensed: self.licensed.len(),
            own: self.own.len(),
            unlicensed: self.unlicensed.len(),
            ignored: self.ignored.len(),
            invalid: self.invalid.len(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Counts {
    pub licensable: usize,
    pub licensed: usize,
    pub own: usize,
    pub unlicensed: usize,
    pub ignored: usize,
    pub invalid: usize,
}
