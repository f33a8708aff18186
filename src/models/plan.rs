//! Plan model
//!
//! A plan is the ordered collection of tiers. Plan order is the order tiers
//! were added (and how they are listed); funding order is priority order.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::account::Account;
use super::money::Money;
use super::tier::Tier;
use super::validation::{clean_name, MAX_NAME_LEN};
use crate::error::{ReserveError, ReserveResult};

/// Direction for reordering a tier within the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Aggregate figures across the whole plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanTotals {
    pub reserves: Money,
    pub target: Money,
    pub gap: Money,
    pub excess: Money,
}

/// The full reserve plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Tiers in plan order
    #[serde(default)]
    pub tiers: Vec<Tier>,

    /// Date of the last modification
    #[serde(default = "today")]
    pub last_updated: NaiveDate,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}

impl Plan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self {
            tiers: Vec::new(),
            last_updated: today(),
        }
    }

    /// Create a plan from tiers
    pub fn with_tiers(tiers: Vec<Tier>) -> Self {
        Self {
            tiers,
            last_updated: today(),
        }
    }

    /// Stamp the plan as modified today
    pub fn touch(&mut self) {
        self.last_updated = today();
    }

    /// Look up a tier by name
    pub fn find_tier(&self, name: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.name == name)
    }

    /// Look up a tier or fail with a "not found" error
    pub fn tier(&self, name: &str) -> ReserveResult<&Tier> {
        self.find_tier(name)
            .ok_or_else(|| ReserveError::tier_not_found(name))
    }

    /// Look up a tier mutably or fail with a "not found" error
    pub fn tier_mut(&mut self, name: &str) -> ReserveResult<&mut Tier> {
        self.tiers
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| ReserveError::tier_not_found(name))
    }

    /// Look up an account inside a tier
    pub fn account(&self, tier: &str, account: &str) -> ReserveResult<&Account> {
        self.tier(tier)?.require_account(account)
    }

    /// Look up an account inside a tier, mutably
    pub fn account_mut(&mut self, tier: &str, account: &str) -> ReserveResult<&mut Account> {
        self.tier_mut(tier)?.require_account_mut(account)
    }

    /// Append a tier; names must be unique
    pub fn add_tier(&mut self, mut tier: Tier) -> ReserveResult<()> {
        tier.name = clean_name(&tier.name, "Tier name", MAX_NAME_LEN)?;
        if self.find_tier(&tier.name).is_some() {
            return Err(ReserveError::duplicate_tier(tier.name));
        }
        tier.validate()?;
        self.tiers.push(tier);
        Ok(())
    }

    /// Remove a tier by name
    pub fn remove_tier(&mut self, name: &str) -> ReserveResult<Tier> {
        let index = self
            .tiers
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| ReserveError::tier_not_found(name))?;
        Ok(self.tiers.remove(index))
    }

    /// Move a tier one slot up or down in plan order
    ///
    /// Returns false when the tier is already at that end.
    pub fn move_tier(&mut self, name: &str, direction: MoveDirection) -> ReserveResult<bool> {
        let index = self
            .tiers
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| ReserveError::tier_not_found(name))?;

        let other = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.tiers.len() => index + 1,
            _ => return Ok(false),
        };
        self.tiers.swap(index, other);
        Ok(true)
    }

    /// Designate the overflow tier, or clear the designation
    pub fn set_overflow_tier(&mut self, name: Option<&str>) -> ReserveResult<()> {
        if let Some(name) = name {
            self.tier(name)?;
        }
        for tier in &mut self.tiers {
            tier.absorbs_overflow = Some(tier.name.as_str()) == name;
        }
        Ok(())
    }

    /// Tier that receives cash once every target is met
    pub fn overflow_tier(&self) -> Option<&Tier> {
        self.sorted_by_priority()
            .into_iter()
            .find(|t| t.absorbs_overflow)
    }

    /// Tiers in funding order (stable by priority)
    pub fn sorted_by_priority(&self) -> Vec<&Tier> {
        let mut sorted: Vec<&Tier> = self.tiers.iter().collect();
        sorted.sort_by_key(|t| t.priority);
        sorted
    }

    /// Sum of every tier's total
    pub fn total_reserves(&self) -> Money {
        self.tiers.iter().map(Tier::total).sum()
    }

    /// Sum of every tier's target
    pub fn total_target(&self) -> Money {
        self.tiers.iter().map(|t| t.target).sum()
    }

    /// Aggregate reserves, targets, gaps, and excess
    pub fn totals(&self) -> PlanTotals {
        PlanTotals {
            reserves: self.total_reserves(),
            target: self.total_target(),
            gap: self.tiers.iter().map(Tier::gap).sum(),
            excess: self.tiers.iter().map(Tier::excess).sum(),
        }
    }

    /// Check every structural invariant of the plan
    pub fn validate(&self) -> ReserveResult<()> {
        for (i, tier) in self.tiers.iter().enumerate() {
            tier.validate()?;
            if self.tiers[..i].iter().any(|t| t.name == tier.name) {
                return Err(ReserveError::duplicate_tier(&tier.name));
            }
        }
        Ok(())
    }

    /// The default six-tier plan written by `init`
    pub fn starter() -> Self {
        let dollars = |d: i64| Money::from_dollars_cents(d, 0);

        Self::with_tiers(vec![
            Tier::new("Tier 1", "Buffer & short-term emergencies", dollars(30_000), 1)
                .with_account(Account::new("Checking").with_apy(0.02).with_notes("Monthly expenses"))
                .with_account(
                    Account::new("Savings (Discover)")
                        .with_apy(4.11)
                        .with_weight(2.0)
                        .with_cap(dollars(23_000))
                        .with_notes("FDIC savings"),
                )
                .with_preferred("Savings (Discover)"),
            Tier::new("Tier 2", "Emergency fund", dollars(30_000), 2)
                .with_account(Account::new("Savings/MM").with_apy(3.75).with_notes("Liquid reserve"))
                .with_account(
                    Account::new("USDC (Coinbase)")
                        .with_apy(5.20)
                        .with_weight(2.0)
                        .with_cap(dollars(20_000))
                        .with_notes("Stablecoin yield"),
                )
                .with_preferred("USDC (Coinbase)"),
            Tier::new("Tier 3", "Large capital expenditures", dollars(40_000), 3)
                .with_account(
                    Account::new("Short-Term Bonds (Schwab)")
                        .with_apy(4.25)
                        .with_weight(2.0)
                        .with_cap(dollars(30_000))
                        .with_notes("Ladder/ETF"),
                )
                .with_account(
                    Account::new("USDC (Coinbase)")
                        .with_apy(4.50)
                        .with_cap(dollars(10_000)),
                )
                .with_preferred("Short-Term Bonds (Schwab)"),
            Tier::new(
                "Tier 4",
                "Long-term debt reduction & income generation",
                dollars(100_000),
                4,
            )
            .with_account(
                Account::new("Bonds")
                    .with_apy(4.25)
                    .with_weight(2.0)
                    .with_notes("Income/low risk"),
            )
            .with_account(
                Account::new("Dividend Stocks")
                    .with_apy(3.10)
                    .with_notes("After-tax income proxy"),
            )
            .with_account(Account::new("REITs").with_apy(4.50).with_notes("Higher yield"))
            .with_account(
                Account::new("Crypto")
                    .with_apy(40.0)
                    .with_notes("High risk / high potential"),
            )
            .with_preferred("Bonds")
            .with_overflow(),
            Tier::new("Tier 5", "Capital gains tax holding (1-yr horizon)", dollars(25_000), 5)
                .with_account(
                    Account::new("Short-Term Bonds (Schwab)")
                        .with_apy(4.25)
                        .with_notes("Hold until taxes due"),
                )
                .with_preferred("Short-Term Bonds (Schwab)"),
            Tier::new("Tier 6", "Temporary holding (unallocated cash)", Money::zero(), 6)
                .with_account(
                    Account::new("Savings")
                        .with_apy(3.75)
                        .with_notes("Parking until allocated"),
                )
                .with_preferred("Savings"),
        ])
    }
}
