//! Recurring contribution service
//!
//! Rules are checked against the plan when added. Processing applies every
//! due rule once, advancing it by a single period.

use chrono::NaiveDate;

use crate::error::ReserveResult;
use crate::history::{EntryKind, HistoryEntry};
use crate::models::{Money, RecurringContribution};
use crate::storage::Storage;

/// One contribution applied by [`RecurringService::process_due`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedContribution {
    pub name: String,
    pub tier: String,
    pub account: String,
    pub amount: Money,
    pub balance_after: Money,
    /// The due date that was served
    pub due: NaiveDate,
}

/// Service for recurring contributions
pub struct RecurringService<'a> {
    storage: &'a Storage,
}

impl<'a> RecurringService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> ReserveResult<Vec<RecurringContribution>> {
        self.storage.recurring.get_all()
    }

    /// Add a rule; its tier and account must exist
    pub fn add(&self, rule: RecurringContribution) -> ReserveResult<RecurringContribution> {
        rule.validate()?;
        self.storage.load_plan()?.account(&rule.tier, &rule.account)?;

        self.storage.recurring.upsert(rule.clone())?;
        self.storage.recurring.save()?;
        tracing::info!(id = %rule.id, name = %rule.name, "added recurring contribution");
        Ok(rule)
    }

    /// Remove a rule by ID, ID prefix, or name
    pub fn remove(&self, input: &str) -> ReserveResult<RecurringContribution> {
        let rule = self.storage.recurring.find(input)?;
        self.storage.recurring.delete(rule.id)?;
        self.storage.recurring.save()?;
        Ok(rule)
    }

    /// Enable or disable a rule by ID, ID prefix, or name
    pub fn set_enabled(&self, input: &str, enabled: bool) -> ReserveResult<RecurringContribution> {
        let mut rule = self.storage.recurring.find(input)?;
        rule.enabled = enabled;
        self.storage.recurring.upsert(rule.clone())?;
        self.storage.recurring.save()?;
        Ok(rule)
    }

    /// Apply every enabled rule due on or before `today`
    ///
    /// Rules pointing at a missing tier or account are skipped and left due.
    pub fn process_due(&self, today: NaiveDate) -> ReserveResult<Vec<ProcessedContribution>> {
        let mut rules = self.storage.recurring.get_all()?;
        if !rules.iter().any(|r| r.is_due(today)) {
            return Ok(Vec::new());
        }

        let mut plan = self.storage.load_plan()?;
        let mut processed = Vec::new();
        let mut entries = Vec::new();

        for rule in rules.iter_mut().filter(|r| r.is_due(today)) {
            let account = match plan.account_mut(&rule.tier, &rule.account) {
                Ok(account) => account,
                Err(e) => {
                    tracing::warn!(name = %rule.name, error = %e, "skipping recurring contribution");
                    continue;
                }
            };

            account.balance += rule.amount;
            let balance_after = account.balance;
            entries.push(
                HistoryEntry::new(EntryKind::Recurring, &rule.tier, &rule.account, rule.amount, balance_after)
                    .with_description(rule.history_description()),
            );
            processed.push(ProcessedContribution {
                name: rule.name.clone(),
                tier: rule.tier.clone(),
                account: rule.account.clone(),
                amount: rule.amount,
                balance_after,
                due: rule.next_date,
            });
            rule.advance();
        }

        if processed.is_empty() {
            return Ok(processed);
        }

        self.storage.save_plan(&mut plan)?;
        self.storage.recurring.replace_all(rules)?;
        self.storage.recurring.save()?;
        self.storage.history.record_batch(&entries)?;

        tracing::info!(count = processed.len(), "processed recurring contributions");
        Ok(processed)
    }
}
