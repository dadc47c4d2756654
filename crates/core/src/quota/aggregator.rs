//! Quota aggregation over a selected subset of accounts.
//!
//! The category breakdown scales a fixed template against the aggregate
//! used/limit ratio. It is an estimate, not a per-category measurement.

use std::collections::BTreeSet;

use docpulse_domain::{AccountQuota, CategoryShare, QuotaSummary, StorageCategory};
use tracing::debug;

/// Accounts included in the aggregate. Never empty once it holds an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotaSelection {
    selected: BTreeSet<String>,
}

impl QuotaSelection {
    /// Start with every given account selected.
    pub fn new<I, S>(accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { selected: accounts.into_iter().map(Into::into).collect() }
    }

    pub fn select(&mut self, account_id: impl Into<String>) {
        self.selected.insert(account_id.into());
    }

    /// Remove an account. Removing the last selected account is refused and
    /// returns `false`.
    pub fn deselect(&mut self, account_id: &str) -> bool {
        if self.selected.len() == 1 && self.selected.contains(account_id) {
            debug!(account_id, "refusing to deselect the last account");
            return false;
        }
        self.selected.remove(account_id)
    }

    /// Flip one account. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, account_id: &str) -> bool {
        if self.selected.contains(account_id) {
            !self.deselect(account_id)
        } else {
            self.select(account_id);
            true
        }
    }

    pub fn contains(&self, account_id: &str) -> bool {
        self.selected.contains(account_id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}

/// Sum the selected accounts and scale the category template.
pub fn aggregate(accounts: &[AccountQuota], selection: &QuotaSelection) -> QuotaSummary {
    let selected: Vec<&AccountQuota> =
        accounts.iter().filter(|account| selection.contains(&account.account_id)).collect();

    let used_bytes: u64 = selected.iter().map(|account| account.used_bytes).sum();
    let limit_bytes: u64 = selected.iter().map(|account| account.limit_bytes).sum();
    let ratio = if limit_bytes == 0 {
        0.0
    } else {
        (used_bytes as f64 / limit_bytes as f64).min(1.0)
    };

    let mut categories: Vec<CategoryShare> = StorageCategory::TEMPLATE
        .iter()
        .map(|&(category, share)| CategoryShare {
            category,
            bytes: (used_bytes as f64 * share).round() as u64,
            percentage: share * ratio * 100.0,
        })
        .collect();
    categories.push(CategoryShare {
        category: StorageCategory::Free,
        bytes: limit_bytes.saturating_sub(used_bytes),
        percentage: 100.0 - ratio * 100.0,
    });

    QuotaSummary {
        selected_accounts: selected.iter().map(|account| account.account_id.clone()).collect(),
        used_bytes,
        limit_bytes,
        usage_percent: ratio * 100.0,
        categories,
    }
}
