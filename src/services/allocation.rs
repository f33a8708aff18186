//! Allocation service
//!
//! Previews come straight from the engine. Applying a detailed allocation is
//! the write-back step: every target is checked before anything changes, the
//! plan is saved once, and history is recorded after the save.

use crate::error::{ReserveError, ReserveResult};
use crate::history::{EntryKind, HistoryEntry};
use crate::models::{AllocationPlan, DetailedAllocation, Money, RebalanceMove};
use crate::storage::Storage;

/// Outcome of applying an allocation
#[derive(Debug, Clone)]
pub struct AppliedAllocation {
    pub allocation: DetailedAllocation,
    pub entries: Vec<HistoryEntry>,
}

/// Service for previewing and applying allocations
pub struct AllocationService<'a> {
    storage: &'a Storage,
}

impl<'a> AllocationService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Tier-level waterfall for `amount`
    pub fn preview(&self, amount: Money) -> ReserveResult<AllocationPlan> {
        Ok(self.storage.load_plan()?.allocation_plan(amount))
    }

    /// Account-level waterfall for `amount`
    pub fn preview_detailed(&self, amount: Money) -> ReserveResult<DetailedAllocation> {
        Ok(self.storage.load_plan()?.allocation_plan_detailed(amount))
    }

    /// Suggested transfers between tiers (never applied)
    pub fn rebalance(&self) -> ReserveResult<Vec<RebalanceMove>> {
        Ok(self.storage.load_plan()?.rebalancing_moves())
    }

    /// Add every move of `allocation` to its account balance
    ///
    /// All-or-nothing: an unknown tier or account aborts before the plan is
    /// touched.
    pub fn apply(
        &self,
        allocation: &DetailedAllocation,
        description: Option<&str>,
    ) -> ReserveResult<Vec<HistoryEntry>> {
        if allocation.is_empty() {
            return Ok(Vec::new());
        }

        let mut plan = self.storage.load_plan()?;
        for m in &allocation.moves {
            if m.amount.is_negative() {
                return Err(ReserveError::Validation(format!(
                    "Allocation move into {} / {} is negative ({})",
                    m.tier, m.account, m.amount
                )));
            }
            plan.account(&m.tier, &m.account)?;
        }

        let description = description
            .map(str::to_string)
            .unwrap_or_else(|| format!("Allocation of {}", allocation.requested));

        let mut entries = Vec::with_capacity(allocation.moves.len());
        for m in &allocation.moves {
            let account = plan.account_mut(&m.tier, &m.account)?;
            account.balance += m.amount;
            entries.push(
                HistoryEntry::new(EntryKind::Allocation, &m.tier, &m.account, m.amount, account.balance)
                    .with_description(description.clone()),
            );
        }

        self.storage.save_plan(&mut plan)?;
        self.storage.history.record_batch(&entries)?;

        tracing::info!(
            moves = entries.len(),
            allocated = %allocation.allocated(),
            unallocated = %allocation.unallocated,
            "applied allocation"
        );
        Ok(entries)
    }

    /// Compute and apply a detailed allocation in one step
    pub fn allocate(&self, amount: Money, description: Option<&str>) -> ReserveResult<AppliedAllocation> {
        let allocation = self.preview_detailed(amount)?;
        let entries = self.apply(&allocation, description)?;
        Ok(AppliedAllocation { allocation, entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ReservePaths;
    use crate::history::HistoryFilter;
    use crate::models::AccountMove;
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
    fn test_preview_does_not_mutate() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AllocationService::new(&storage);

        let preview = service.preview(dollars(40_000)).unwrap();
        assert_eq!(preview.moves[0].tier, "Tier 1");
        assert_eq!(preview.moves[0].amount, dollars(30_000));
        assert_eq!(preview.moves[1].amount, dollars(10_000));

        assert_eq!(storage.load_plan().unwrap().total_reserves(), Money::zero());
        assert_eq!(storage.history.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_allocate_applies_and_records() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AllocationService::new(&storage);

        let applied = service.allocate(dollars(25_000), Some("Bonus")).unwrap();
        assert_eq!(applied.allocation.allocated(), dollars(25_000));

        let plan = storage.load_plan().unwrap();
        assert_eq!(plan.total_reserves(), dollars(25_000));
        assert_eq!(
            plan.account("Tier 1", "Savings (Discover)").unwrap().balance,
            dollars(23_000)
        );
        assert_eq!(plan.account("Tier 1", "Checking").unwrap().balance, dollars(2_000));

        let history = storage
            .history
            .query(&HistoryFilter::new().kind(EntryKind::Allocation))
            .unwrap();
        assert_eq!(history.len(), applied.entries.len());
        assert!(history.iter().all(|e| e.description == "Bonus"));
    }

    #[test]
    fn test_second_allocation_continues_the_waterfall() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AllocationService::new(&storage);

        service.allocate(dollars(30_000), None).unwrap();
        let next = service.preview(dollars(1_000)).unwrap();
        assert_eq!(next.moves.len(), 1);
        assert_eq!(next.moves[0].tier, "Tier 2");
    }

    #[test]
    fn test_apply_rejects_unknown_account_without_writing() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AllocationService::new(&storage);

        let allocation = DetailedAllocation {
            requested: dollars(200),
            moves: vec![
                AccountMove {
                    tier: "Tier 1".into(),
                    account: "Checking".into(),
                    amount: dollars(100),
                    overflow: false,
                },
                AccountMove {
                    tier: "Tier 1".into(),
                    account: "Mattress".into(),
                    amount: dollars(100),
                    overflow: false,
                },
            ],
            unallocated: Money::zero(),
        };

        assert!(service.apply(&allocation, None).unwrap_err().is_not_found());
        assert_eq!(storage.load_plan().unwrap().total_reserves(), Money::zero());
        assert_eq!(storage.history.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_rebalance_is_suggestion_only() {
        let (_temp_dir, storage) = create_test_storage();
        let mut plan = storage.load_plan().unwrap();
        plan.account_mut("Tier 5", "Short-Term Bonds (Schwab)").unwrap().balance = dollars(30_000);
        storage.save_plan(&mut plan).unwrap();

        let service = AllocationService::new(&storage);
        let moves = service.rebalance().unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].from_tier, "Tier 5");
        assert_eq!(moves[0].to_tier, "Tier 1");
        assert_eq!(moves[0].amount, dollars(5_000));

        assert_eq!(storage.load_plan().unwrap().total_reserves(), dollars(30_000));
    }
}
