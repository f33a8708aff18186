//! Cross-tier allocation and rebalancing
//!
//! Waterfall allocation fills tier gaps strictly in priority order, then hands
//! any leftover to the overflow tier. Rebalancing pairs overfunded tiers with
//! underfunded ones. Both are pure: they compute movements and never touch
//! balances.

use serde::Serialize;

use super::money::Money;
use super::plan::Plan;
use super::tier::{AccountShare, Tier};

/// Tier-level movement of new cash
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierMove {
    pub tier: String,
    pub amount: Money,
    /// Leftover routed after every gap was filled
    pub overflow: bool,
}

/// Result of a tier-level waterfall
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationPlan {
    pub requested: Money,
    pub moves: Vec<TierMove>,
    pub unallocated: Money,
}

impl AllocationPlan {
    /// Sum of every movement
    pub fn allocated(&self) -> Money {
        self.moves.iter().map(|m| m.amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Account-level movement of new cash
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountMove {
    pub tier: String,
    pub account: String,
    pub amount: Money,
    pub overflow: bool,
}

/// Result of a detailed waterfall
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedAllocation {
    pub requested: Money,
    pub moves: Vec<AccountMove>,
    /// Requested minus what the moves place
    pub unallocated: Money,
}

impl DetailedAllocation {
    /// Sum of every movement
    pub fn allocated(&self) -> Money {
        self.moves.iter().map(|m| m.amount).sum()
    }

    /// Sum of the movements into one tier
    pub fn tier_total(&self, tier: &str) -> Money {
        self.moves
            .iter()
            .filter(|m| m.tier == tier)
            .map(|m| m.amount)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Suggested transfer between tiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RebalanceMove {
    pub from_tier: String,
    pub to_tier: String,
    pub amount: Money,
}

/// Split a tier's share into accounts, falling back to the first account
/// when no account reports room.
fn split_into_accounts(tier: &Tier, amount: Money) -> Vec<AccountShare> {
    let shares = tier.allocate_into_accounts(amount);
    if !shares.is_empty() {
        return shares;
    }
    match tier.accounts.first() {
        Some(first) => {
            tracing::debug!(tier = %tier.name, account = %first.name, %amount, "no room in any account, using first account");
            vec![AccountShare {
                account: first.name.clone(),
                amount,
            }]
        }
        None => {
            tracing::debug!(tier = %tier.name, %amount, "tier has no accounts, amount dropped");
            Vec::new()
        }
    }
}

impl Plan {
    /// Fill tier gaps in priority order; leftover goes to the overflow tier
    pub fn allocation_plan(&self, amount: Money) -> AllocationPlan {
        let requested = amount.non_negative();
        let mut remaining = requested;
        let mut moves = Vec::new();

        for tier in self.sorted_by_priority() {
            if !remaining.is_positive() {
                break;
            }
            let need = tier.gap();
            if !need.is_positive() {
                continue;
            }
            let take = remaining.min(need);
            moves.push(TierMove {
                tier: tier.name.clone(),
                amount: take,
                overflow: false,
            });
            remaining -= take;
        }

        if remaining.is_positive() {
            if let Some(tier) = self.overflow_tier() {
                moves.push(TierMove {
                    tier: tier.name.clone(),
                    amount: remaining,
                    overflow: true,
                });
                remaining = Money::zero();
            }
        }

        AllocationPlan {
            requested,
            moves,
            unallocated: remaining,
        }
    }

    /// Waterfall allocation broken down to individual accounts
    ///
    /// Each tier's share is split with [`Tier::allocate_into_accounts`]. When a
    /// tier has no accounts, or its accounts cannot hold the full share, the
    /// difference shows up in `unallocated` rather than in any move.
    pub fn allocation_plan_detailed(&self, amount: Money) -> DetailedAllocation {
        let requested = amount.non_negative();
        let mut remaining = requested;
        let mut moves = Vec::new();

        let mut push = |tier: &Tier, shares: Vec<AccountShare>, overflow: bool| {
            moves.extend(shares.into_iter().map(|share| AccountMove {
                tier: tier.name.clone(),
                account: share.account,
                amount: share.amount,
                overflow,
            }));
        };

        for tier in self.sorted_by_priority() {
            if !remaining.is_positive() {
                break;
            }
            let need = tier.gap();
            if !need.is_positive() {
                continue;
            }
            let take = remaining.min(need);
            push(tier, split_into_accounts(tier, take), false);
            remaining -= take;
        }

        if remaining.is_positive() {
            if let Some(tier) = self.overflow_tier() {
                push(tier, split_into_accounts(tier, remaining), true);
            }
        }

        let allocated: Money = moves.iter().map(|m: &AccountMove| m.amount).sum();
        DetailedAllocation {
            requested,
            unallocated: requested - allocated,
            moves,
        }
    }

    /// Suggest transfers from overfunded tiers to underfunded ones
    ///
    /// Underfunded tiers are served in priority order; overfunded tiers give
    /// in plan order. Greedy two-pointer matching.
    pub fn rebalancing_moves(&self) -> Vec<RebalanceMove> {
        let mut under: Vec<(&Tier, Money)> = self
            .sorted_by_priority()
            .into_iter()
            .map(|t| (t, t.gap()))
            .filter(|(_, need)| need.is_positive())
            .collect();
        let mut over: Vec<(&Tier, Money)> = self
            .tiers
            .iter()
            .map(|t| (t, t.excess()))
            .filter(|(_, excess)| excess.is_positive())
            .collect();

        let mut moves = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < over.len() && j < under.len() {
            let amount = over[i].1.min(under[j].1);
            if amount.is_positive() {
                moves.push(RebalanceMove {
                    from_tier: over[i].0.name.clone(),
                    to_tier: under[j].0.name.clone(),
                    amount,
                });
                over[i].1 -= amount;
                under[j].1 -= amount;
            }
            if !over[i].1.is_positive() {
                i += 1;
            }
            if !under[j].1.is_positive() {
                j += 1;
            }
        }
        moves
    }
}
