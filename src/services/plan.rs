//! Plan service
//!
//! Loads the plan, applies one edit, validates, and saves. Balance edits are
//! also written to the history log.

use crate::error::ReserveResult;
use crate::history::{EntryKind, HistoryEntry};
use crate::models::validation::{check_amount, clean_name, MAX_NAME_LEN};
use crate::models::{AccountPatch, Money, MoveDirection, Plan, Tier, UpsertOutcome};
use crate::storage::Storage;

/// Service for editing tiers and accounts
pub struct PlanService<'a> {
    storage: &'a Storage,
}

impl<'a> PlanService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Load the current plan
    pub fn load(&self) -> ReserveResult<Plan> {
        self.storage.load_plan()
    }

    /// Load, edit, and save; nothing is written if `edit` fails
    fn update<T>(&self, edit: impl FnOnce(&mut Plan) -> ReserveResult<T>) -> ReserveResult<T> {
        let mut plan = self.storage.load_plan()?;
        let result = edit(&mut plan)?;
        self.storage.save_plan(&mut plan)?;
        Ok(result)
    }

    /// Add an empty tier
    pub fn add_tier(&self, name: &str, purpose: &str, target: Money, priority: i32) -> ReserveResult<Tier> {
        check_amount(target, "Tier target")?;
        let name = clean_name(name, "Tier name", MAX_NAME_LEN)?;
        let tier = Tier::new(name, purpose.trim(), target, priority);

        self.update(|plan| plan.add_tier(tier.clone()))?;
        tracing::info!(tier = %tier.name, priority, "added tier");
        Ok(tier)
    }

    /// Remove a tier and all its accounts
    pub fn remove_tier(&self, name: &str) -> ReserveResult<Tier> {
        let removed = self.update(|plan| plan.remove_tier(name))?;
        tracing::info!(tier = %removed.name, accounts = removed.accounts.len(), "removed tier");
        Ok(removed)
    }

    pub fn set_tier_target(&self, name: &str, target: Money) -> ReserveResult<()> {
        check_amount(target, "Tier target")?;
        self.update(|plan| {
            plan.tier_mut(name)?.target = target;
            Ok(())
        })?;
        tracing::info!(tier = name, %target, "updated tier target");
        Ok(())
    }

    pub fn set_tier_priority(&self, name: &str, priority: i32) -> ReserveResult<()> {
        self.update(|plan| {
            plan.tier_mut(name)?.priority = priority;
            Ok(())
        })
    }

    pub fn set_tier_purpose(&self, name: &str, purpose: &str) -> ReserveResult<()> {
        self.update(|plan| {
            plan.tier_mut(name)?.purpose = purpose.trim().to_string();
            Ok(())
        })
    }

    /// Reorder a tier in plan order; false if it was already at the edge
    pub fn move_tier(&self, name: &str, direction: MoveDirection) -> ReserveResult<bool> {
        self.update(|plan| plan.move_tier(name, direction))
    }

    /// Designate (or clear) the overflow tier
    pub fn set_overflow_tier(&self, name: Option<&str>) -> ReserveResult<()> {
        self.update(|plan| plan.set_overflow_tier(name))?;
        tracing::info!(tier = ?name, "updated overflow tier");
        Ok(())
    }

    /// Create or update an account; a balance change is recorded as manual
    pub fn upsert_account(
        &self,
        tier: &str,
        account: &str,
        patch: &AccountPatch,
    ) -> ReserveResult<UpsertOutcome> {
        let (outcome, entry) = self.update(|plan| {
            let tier_ref = plan.tier_mut(tier)?;
            let before = tier_ref
                .account(account.trim())
                .map(|a| a.balance)
                .unwrap_or_default();
            let outcome = tier_ref.add_or_update_account(account, patch)?;

            let entry = patch
                .balance
                .filter(|balance| *balance != before)
                .map(|balance| {
                    HistoryEntry::new(EntryKind::Manual, tier, account.trim(), balance - before, balance)
                        .with_description("Balance set")
                });
            Ok((outcome, entry))
        })?;

        if let Some(entry) = entry {
            self.storage.history.record(&entry)?;
        }
        tracing::info!(tier, account, ?outcome, "saved account");
        Ok(outcome)
    }

    /// Set an account's balance and record the change
    pub fn set_balance(&self, tier: &str, account: &str, balance: Money) -> ReserveResult<HistoryEntry> {
        check_amount(balance, "Balance")?;
        let entry = self.update(|plan| {
            let target = plan.account_mut(tier, account)?;
            let delta = balance - target.balance;
            target.balance = balance;
            Ok(HistoryEntry::new(EntryKind::Manual, tier, account, delta, balance)
                .with_description("Balance set"))
        })?;

        self.storage.history.record(&entry)?;
        tracing::info!(tier, account, %balance, "set balance");
        Ok(entry)
    }

    pub fn set_weight(&self, tier: &str, account: &str, weight: f64) -> ReserveResult<()> {
        self.update_existing(tier, account, &AccountPatch::new().weight(weight))
    }

    /// Set or clear an account's capacity
    pub fn set_cap(&self, tier: &str, account: &str, cap: Option<Money>) -> ReserveResult<()> {
        let patch = match cap {
            Some(cap) => AccountPatch::new().cap(cap),
            None => AccountPatch::new().clear_cap(),
        };
        self.update_existing(tier, account, &patch)
    }

    fn update_existing(&self, tier: &str, account: &str, patch: &AccountPatch) -> ReserveResult<()> {
        self.update(|plan| {
            plan.account(tier, account)?;
            plan.tier_mut(tier)?.add_or_update_account(account, patch)?;
            Ok(())
        })
    }

    pub fn remove_account(&self, tier: &str, account: &str) -> ReserveResult<()> {
        let removed = self.update(|plan| plan.tier_mut(tier)?.remove_account(account))?;
        if removed.balance.is_positive() {
            tracing::warn!(tier, account, balance = %removed.balance, "removed account still held a balance");
        }
        Ok(())
    }

    /// Set or clear the preferred account of a tier
    pub fn set_preferred(&self, tier: &str, account: Option<&str>) -> ReserveResult<()> {
        self.update(|plan| plan.tier_mut(tier)?.set_preferred(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReserveError;
    use crate::config::paths::ReservePaths;
    use crate::history::HistoryFilter;
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReservePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        initialize_storage(&storage, false).unwrap();
        (temp_dir, storage)
    }

    fn dollars(d: i64) -> Money {
        Money::from_dollars_cents(d, 0)
    }

    #[test]
    fn test_add_and_remove_tier() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlanService::new(&storage);

        service.add_tier("Tier 7", "Vacation", dollars(5_000), 7).unwrap();
        assert_eq!(service.load().unwrap().tier("Tier 7").unwrap().purpose, "Vacation");

        let err = service.add_tier("Tier 1", "", dollars(1), 1).unwrap_err();
        assert!(matches!(err, ReserveError::Duplicate { .. }));

        service.remove_tier("Tier 7").unwrap();
        assert!(service.load().unwrap().find_tier("Tier 7").is_none());
        assert!(service.remove_tier("Tier 7").unwrap_err().is_not_found());
    }

    #[test]
    fn test_tier_edits() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlanService::new(&storage);

        service.set_tier_target("Tier 2", dollars(12_000)).unwrap();
        service.set_tier_priority("Tier 2", 9).unwrap();
        service.set_tier_purpose("Tier 2", "  Rainy day ").unwrap();

        let plan = service.load().unwrap();
        let tier = plan.tier("Tier 2").unwrap();
        assert_eq!(tier.target, dollars(12_000));
        assert_eq!(tier.priority, 9);
        assert_eq!(tier.purpose, "Rainy day");

        assert!(service
            .set_tier_target("Tier 2", Money::from_cents(-1))
            .unwrap_err()
            .is_validation());
        assert!(service.set_tier_target("Nope", dollars(1)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_balance_records_history() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlanService::new(&storage);

        service.set_balance("Tier 1", "Checking", dollars(1_500)).unwrap();
        let entry = service.set_balance("Tier 1", "Checking", dollars(1_200)).unwrap();
        assert_eq!(entry.amount, dollars(-300));

        let plan = service.load().unwrap();
        assert_eq!(plan.account("Tier 1", "Checking").unwrap().balance, dollars(1_200));

        let history = storage
            .history
            .query(&HistoryFilter::new().account("Checking"))
            .unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|e| e.kind == EntryKind::Manual));

        assert!(service
            .set_balance("Tier 1", "Nope", dollars(1))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_upsert_account() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlanService::new(&storage);

        let outcome = service
            .upsert_account("Tier 2", "I-Bonds", &AccountPatch::new().balance(dollars(400)).apy(4.3))
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);

        let outcome = service
            .upsert_account("Tier 2", "I-Bonds", &AccountPatch::new().notes("TreasuryDirect"))
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);

        let plan = service.load().unwrap();
        let account = plan.account("Tier 2", "I-Bonds").unwrap();
        assert_eq!(account.balance, dollars(400));
        assert_eq!(account.notes, "TreasuryDirect");
        assert_eq!(storage.history.entry_count().unwrap(), 1);
    }

    #[test]
    fn test_weight_cap_and_preferred() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlanService::new(&storage);

        service.set_weight("Tier 4", "Crypto", 0.5).unwrap();
        service.set_cap("Tier 4", "Crypto", Some(dollars(2_000))).unwrap();
        service.set_preferred("Tier 4", Some("REITs")).unwrap();

        let plan = service.load().unwrap();
        let tier = plan.tier("Tier 4").unwrap();
        let crypto = tier.account("Crypto").unwrap();
        assert_eq!(crypto.alloc_weight, 0.5);
        assert_eq!(crypto.account_target, Some(dollars(2_000)));
        assert_eq!(tier.preferred_account.as_deref(), Some("REITs"));

        service.set_cap("Tier 4", "Crypto", None).unwrap();
        assert_eq!(service.load().unwrap().account("Tier 4", "Crypto").unwrap().account_target, None);

        assert!(service.set_weight("Tier 4", "Gold", 1.0).unwrap_err().is_not_found());
        assert!(service.set_weight("Tier 4", "Crypto", -1.0).unwrap_err().is_validation());
        assert!(service.set_preferred("Tier 4", Some("Gold")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_account_clears_preferred() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlanService::new(&storage);

        service.remove_account("Tier 4", "Bonds").unwrap();
        let plan = service.load().unwrap();
        let tier = plan.tier("Tier 4").unwrap();
        assert!(tier.account("Bonds").is_none());
        assert_eq!(tier.preferred_account, None);
    }

    #[test]
    fn test_overflow_and_move() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlanService::new(&storage);

        service.set_overflow_tier(Some("Tier 6")).unwrap();
        assert_eq!(service.load().unwrap().overflow_tier().unwrap().name, "Tier 6");

        assert!(service.move_tier("Tier 6", MoveDirection::Up).unwrap());
        assert_eq!(service.load().unwrap().tiers[4].name, "Tier 6");
        assert!(!service.move_tier("Tier 1", MoveDirection::Up).unwrap());
    }
}
