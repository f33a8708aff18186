//! Tier model
//!
//! A tier is a prioritized bucket of accounts with a funding target. It owns
//! the rules for splitting new cash across its accounts: preferred account
//! first, then a weighted split that respects each account's capacity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::{Account, AccountPatch, Room};
use super::money::Money;
use super::validation::{check_amount, clean_name, MAX_NAME_LEN};
use crate::error::{ReserveError, ReserveResult};

/// A single account-level share of an amount routed into a tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountShare {
    pub account: String,
    pub amount: Money,
}

/// Outcome of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// A prioritized group of accounts with a funding target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Tier name, unique within a plan
    pub name: String,

    /// What the money in this tier is for
    #[serde(default)]
    pub purpose: String,

    /// Funding target
    #[serde(default)]
    pub target: Money,

    /// Lower numbers are funded first
    #[serde(default)]
    pub priority: i32,

    /// Accounts in display order
    #[serde(default)]
    pub accounts: Vec<Account>,

    /// Account that receives new cash before the weighted split
    #[serde(default)]
    pub preferred_account: Option<String>,

    /// Receives cash left over once every tier target is met
    #[serde(default)]
    pub absorbs_overflow: bool,
}

impl Tier {
    /// Create an empty tier
    pub fn new(name: impl Into<String>, purpose: impl Into<String>, target: Money, priority: i32) -> Self {
        Self {
            name: name.into(),
            purpose: purpose.into(),
            target,
            priority,
            accounts: Vec::new(),
            preferred_account: None,
            absorbs_overflow: false,
        }
    }

    /// Add an account (builder style)
    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    /// Set the preferred account (builder style, unchecked)
    pub fn with_preferred(mut self, account: impl Into<String>) -> Self {
        self.preferred_account = Some(account.into());
        self
    }

    /// Mark this tier as the overflow destination (builder style)
    pub fn with_overflow(mut self) -> Self {
        self.absorbs_overflow = true;
        self
    }

    /// Sum of account balances
    pub fn total(&self) -> Money {
        self.accounts.iter().map(|a| a.balance).sum()
    }

    /// Shortfall against the target, never negative
    pub fn gap(&self) -> Money {
        (self.target - self.total()).non_negative()
    }

    /// Amount held above the target, never negative
    pub fn excess(&self) -> Money {
        (self.total() - self.target).non_negative()
    }

    /// Funding level as a percentage of the target (0 when there is no target)
    pub fn coverage_pct(&self) -> f64 {
        if !self.target.is_positive() {
            return 0.0;
        }
        self.total().as_dollars_f64() / self.target.as_dollars_f64() * 100.0
    }

    /// Look up an account by name
    pub fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.name == name)
    }

    /// Look up an account by name, mutably
    pub fn account_mut(&mut self, name: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.name == name)
    }

    /// Look up an account or fail with a "not found" error
    pub fn require_account(&self, name: &str) -> ReserveResult<&Account> {
        self.account(name)
            .ok_or_else(|| ReserveError::account_not_found(&self.name, name))
    }

    /// Look up an account mutably or fail with a "not found" error
    pub fn require_account_mut(&mut self, name: &str) -> ReserveResult<&mut Account> {
        let tier_name = self.name.clone();
        self.account_mut(name)
            .ok_or_else(|| ReserveError::account_not_found(&tier_name, name))
    }

    /// Create or update an account by name
    ///
    /// Only the fields present in the patch are changed on an existing
    /// account. The patch is validated before anything is modified.
    pub fn add_or_update_account(
        &mut self,
        name: &str,
        patch: &AccountPatch,
    ) -> ReserveResult<UpsertOutcome> {
        let name = clean_name(name, "Account name", MAX_NAME_LEN)?;
        patch.validate()?;

        if let Some(account) = self.account_mut(&name) {
            account.apply(patch);
            return Ok(UpsertOutcome::Updated);
        }

        let mut account = Account::new(name);
        account.apply(patch);
        self.accounts.push(account);
        Ok(UpsertOutcome::Created)
    }

    /// Remove an account; clears the preferred reference if it pointed at it
    pub fn remove_account(&mut self, name: &str) -> ReserveResult<Account> {
        let index = self
            .accounts
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| ReserveError::account_not_found(&self.name, name))?;

        if self.preferred_account.as_deref() == Some(name) {
            self.preferred_account = None;
        }
        Ok(self.accounts.remove(index))
    }

    /// Set or clear the preferred account
    pub fn set_preferred(&mut self, account: Option<&str>) -> ReserveResult<()> {
        match account {
            None => {
                self.preferred_account = None;
                Ok(())
            }
            Some(name) => {
                self.require_account(name)?;
                self.preferred_account = Some(name.to_string());
                Ok(())
            }
        }
    }

    /// Split `amount` across this tier's accounts
    ///
    /// 1. The preferred account (if set and open) takes as much as its room allows.
    /// 2. The rest is split by weight across accounts with room, each share
    ///    capped at that account's room, repeating until the amount is placed
    ///    or no account has room.
    /// 3. When a pass places nothing, the first open account takes what it
    ///    can. With zero total weight that ends distribution; when every share
    ///    merely rounded to zero cents, passes continue on the residual.
    ///
    /// Room is tracked as shares are assigned, so capacities are never
    /// exceeded. Each account appears at most once in the result, in the order
    /// it first received money.
    pub fn allocate_into_accounts(&self, amount: Money) -> Vec<AccountShare> {
        let mut remaining = amount.non_negative();
        let mut shares: Vec<AccountShare> = Vec::new();
        if remaining.is_zero() || self.accounts.is_empty() {
            return shares;
        }

        let mut rooms: Vec<Room> = self.accounts.iter().map(Account::remaining_room).collect();
        let mut slots: Vec<Option<usize>> = vec![None; self.accounts.len()];

        let mut assign = |index: usize, add: Money, rooms: &mut Vec<Room>, shares: &mut Vec<AccountShare>| {
            if let Room::Limited(room) = rooms[index] {
                rooms[index] = Room::Limited(room - add);
            }
            match slots[index] {
                Some(slot) => shares[slot].amount += add,
                None => {
                    slots[index] = Some(shares.len());
                    shares.push(AccountShare {
                        account: self.accounts[index].name.clone(),
                        amount: add,
                    });
                }
            }
        };

        if let Some(preferred) = &self.preferred_account {
            match self.accounts.iter().position(|a| &a.name == preferred) {
                Some(index) => {
                    let add = rooms[index].clamp(remaining);
                    if add.is_positive() {
                        assign(index, add, &mut rooms, &mut shares);
                        remaining -= add;
                    }
                }
                None => {
                    tracing::debug!(tier = %self.name, preferred = %preferred, "preferred account missing, skipping");
                }
            }
        }

        while remaining.is_positive() {
            let candidates: Vec<usize> = (0..self.accounts.len())
                .filter(|&i| rooms[i].is_open())
                .collect();
            if candidates.is_empty() {
                break;
            }

            let total_weight: f64 = candidates
                .iter()
                .map(|&i| self.accounts[i].effective_weight())
                .sum();

            let mut progressed = false;
            if total_weight > 0.0 {
                let pool = remaining.cents() as f64;
                for &i in &candidates {
                    let weight = self.accounts[i].effective_weight();
                    let share = Money::from_cents((pool * weight / total_weight).round() as i64);
                    let add = rooms[i].clamp(share).min(remaining);
                    if add.is_positive() {
                        assign(i, add, &mut rooms, &mut shares);
                        remaining -= add;
                        progressed = true;
                    }
                }
            }

            if !progressed {
                // First open account takes what fits.
                let first = candidates[0];
                let add = rooms[first].clamp(remaining);
                if !add.is_positive() {
                    break;
                }
                assign(first, add, &mut rooms, &mut shares);
                remaining -= add;

                // Zero weights end distribution; only residual cents keep looping.
                if total_weight <= 0.0 {
                    break;
                }
            }
        }

        if remaining.is_positive() {
            tracing::debug!(tier = %self.name, unplaced = %remaining, "no account room left");
        }
        shares
    }

    /// Validate names, references, and amounts
    pub fn validate(&self) -> ReserveResult<()> {
        clean_name(&self.name, "Tier name", MAX_NAME_LEN)?;
        check_amount(self.target, "Tier target")?;

        for (i, account) in self.accounts.iter().enumerate() {
            account.validate()?;
            if self.accounts[..i].iter().any(|a| a.name == account.name) {
                return Err(ReserveError::Duplicate {
                    entity_type: "Account",
                    identifier: format!("{} in {}", account.name, self.name),
                });
            }
        }

        if let Some(preferred) = &self.preferred_account {
            self.require_account(preferred)?;
        }
        Ok(())
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.priority, self.name)
    }
}
