//! Sorting findings into inventory buckets.
//!
//! This is the pure half of a pass: given findings, the outcome of each
//! offer lookup and a store snapshot, decide where every finding goes.

use tracing::debug;

use lz_core::Offer;
use lz_scan::Finding;
use lz_store::Snapshot;

use crate::config::ClassifyOptions;
use crate::inventory::{InvalidItem, Inventory, InventoryItem};
use crate::license::{classify_license, LicenseClass};

/// Outcome of looking up one finding's offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Offer),
    /// The lookup failed; the reason is shown to the user.
    Failed(String),
    /// The lookup never finished because the pass was cancelled.
    Skipped,
}

/// Sort `findings` into an [`Inventory`].
///
/// `resolutions[i]` is the lookup outcome for `findings[i]`; findings
/// without a matching entry count as skipped.
pub fn classify(
    findings: Vec<Finding>,
    resolutions: Vec<Resolution>,
    snapshot: &Snapshot,
    options: &ClassifyOptions,
) -> Inventory {
    let mut inventory = Inventory::default();
    let mut resolutions = resolutions.into_iter();

    for finding in findings {
        let offer = match resolutions.next().unwrap_or(Resolution::Skipped) {
            Resolution::Resolved(offer) => offer,
            Resolution::Failed(reason) => {
                inventory.invalid.push(InvalidItem { finding, reason });
                continue;
            }
            Resolution::Skipped => {
                inventory.skipped += 1;
                continue;
            }
        };

        let item = InventoryItem { finding, offer };
        inventory.licensable.push(item.clone());

        let key = item.finding.key();
        if snapshot.receipt_for(&key).is_some() {
            debug!(offer = %key, "licensed");
            inventory.licensed.push(item);
        } else if snapshot
            .account_for(&item.offer.api, &item.offer.licensor_id)
            .is_some()
        {
            debug!(offer = %key, "own offer");
            inventory.own.push(item);
        } else if is_ignored(item.finding.public.as_deref(), options) {
            debug!(offer = %key, public = ?item.finding.public, "ignored");
            inventory.ignored.push(item);
        } else {
            inventory.unlicensed.push(item);
        }
    }

    inventory
}

fn is_ignored(public: Option<&str>, options: &ClassifyOptions) -> bool {
    match classify_license(public) {
        LicenseClass::Noncommercial => options.ignore_noncommercial,
        LicenseClass::Reciprocal => options.ignore_reciprocal,
        LicenseClass::Other => false,
    }
}
