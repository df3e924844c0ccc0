//! Configuration for an inventory pass.

use std::time::Duration;

use lz_store::LocalFailurePolicy;

/// Configuration for the [`crate::Reconciler`].
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// File noncommercial offers under Ignored instead of Unlicensed.
    pub ignore_noncommercial: bool,
    /// File reciprocal offers under Ignored instead of Unlicensed.
    pub ignore_reciprocal: bool,
    /// Upper bound on a single offer lookup.
    pub lookup_timeout: Duration,
    /// Offer lookups in flight at once. Zero is treated as one.
    pub max_concurrent_lookups: usize,
    /// What to do with unreadable receipts and accounts.
    pub local_failures: LocalFailurePolicy,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            ignore_noncommercial: false,
            ignore_reciprocal: false,
            lookup_timeout: Duration::from_secs(30),
            max_concurrent_lookups: 8,
            local_failures: LocalFailurePolicy::Abort,
        }
    }
}

impl InventoryConfig {
    /// The part of the configuration [`crate::classify`] needs.
    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            ignore_noncommercial: self.ignore_noncommercial,
            ignore_reciprocal: self.ignore_reciprocal,
        }
    }

    pub(crate) fn lookup_permits(&self) -> usize {
        self.max_concurrent_lookups.max(1)
    }
}

/// Caller choices that affect classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassifyOptions {
    pub ignore_noncommercial: bool,
    pub ignore_reciprocal: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InventoryConfig::default();
        assert!(!config.ignore_noncommercial);
        assert!(!config.ignore_reciprocal);
        assert_eq!(config.lookup_timeout, Duration::from_secs(30));
        assert_eq!(config.local_failures, LocalFailurePolicy::Abort);
        assert_eq!(config.classify_options(), ClassifyOptions::default());
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let config = InventoryConfig {
            max_concurrent_lookups: 0,
            ..Default::default()
        };
        assert_eq!(config.lookup_permits(), 1);
    }
}
