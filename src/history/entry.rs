//! History entry data structures
//!
//! One entry records a single balance change on one account: the signed
//! amount, the balance it left behind, and what caused it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{HistoryId, Money};

/// What caused a balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Balance set by hand
    Manual,
    /// Applied allocation move
    Allocation,
    /// Applied rebalancing transfer
    Rebalance,
    /// CSV import
    Import,
    /// Recurring contribution
    Recurring,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Manual => "manual",
            EntryKind::Allocation => "allocation",
            EntryKind::Rebalance => "rebalance",
            EntryKind::Import => "import",
            EntryKind::Recurring => "recurring",
        };
        f.write_str(label)
    }
}

fn default_user() -> String {
    "system".to_string()
}

/// A single balance change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryId,

    /// When the change was recorded (UTC)
    pub timestamp: DateTime<Utc>,

    pub tier: String,
    pub account: String,

    /// Signed change applied to the balance
    pub amount: Money,

    /// Balance after the change
    pub balance_after: Money,

    pub kind: EntryKind,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_user")]
    pub user: String,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time
    pub fn new(
        kind: EntryKind,
        tier: impl Into<String>,
        account: impl Into<String>,
        amount: Money,
        balance_after: Money,
    ) -> Self {
        Self {
            id: HistoryId::new(),
            timestamp: Utc::now(),
            tier: tier.into(),
            account: account.into(),
            amount,
            balance_after,
            kind,
            description: String::new(),
            user: default_user(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Criteria for selecting history entries; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub tier: Option<String>,
    pub account: Option<String>,
    pub kind: Option<EntryKind>,
    /// Only entries strictly after this instant
    pub since: Option<DateTime<Utc>>,
}

impl HistoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }

    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Restrict to the last `days` days before `now`
    pub fn within_days(self, days: i64, now: DateTime<Utc>) -> Self {
        self.since(now - chrono::Duration::days(days))
    }

    pub fn matches(&self, entry: &HistoryEntry) -> bool {
        self.tier.as_ref().map_or(true, |t| &entry.tier == t)
            && self.account.as_ref().map_or(true, |a| &entry.account == a)
            && self.kind.map_or(true, |k| entry.kind == k)
            && self.since.map_or(true, |s| entry.timestamp > s)
    }
}
