//! Allocation and rebalancing display

use crate::models::{AllocationPlan, DetailedAllocation, Money, RebalanceMove};

use super::format::{column_width, money, separator};

/// Tier-level waterfall preview
pub fn format_allocation_plan(plan: &AllocationPlan, symbol: &str) -> String {
    let mut output = format!("Allocating {}\n", money(plan.requested, symbol));
    if plan.is_empty() {
        output.push_str("Nothing to allocate.\n");
        return output;
    }

    let width = column_width("Tier", plan.moves.iter().map(|m| m.tier.as_str()));
    output.push_str(&format!("{:<width$}  {:>14}\n", "Tier", "Amount"));
    output.push_str(&format!("{}\n", separator(width + 16)));
    for m in &plan.moves {
        let note = if m.overflow { "  (overflow)" } else { "" };
        output.push_str(&format!("{:<width$}  {:>14}{}\n", m.tier, money(m.amount, symbol), note));
    }

    push_footer(&mut output, plan.allocated(), plan.unallocated, symbol);
    output
}

/// Account-level waterfall preview
pub fn format_detailed_allocation(plan: &DetailedAllocation, symbol: &str) -> String {
    let mut output = format!("Allocating {}\n", money(plan.requested, symbol));
    if plan.is_empty() {
        output.push_str("Nothing to allocate.\n");
        return output;
    }

    let tier_width = column_width("Tier", plan.moves.iter().map(|m| m.tier.as_str()));
    let account_width = column_width("Account", plan.moves.iter().map(|m| m.account.as_str()));
    output.push_str(&format!(
        "{:<tier_width$}  {:<account_width$}  {:>14}\n",
        "Tier", "Account", "Amount"
    ));
    output.push_str(&format!("{}\n", separator(tier_width + account_width + 18)));
    for m in &plan.moves {
        let note = if m.overflow { "  (overflow)" } else { "" };
        output.push_str(&format!(
            "{:<tier_width$}  {:<account_width$}  {:>14}{}\n",
            m.tier,
            m.account,
            money(m.amount, symbol),
            note
        ));
    }

    push_footer(&mut output, plan.allocated(), plan.unallocated, symbol);
    output
}

fn push_footer(output: &mut String, allocated: Money, unallocated: Money, symbol: &str) {
    output.push_str(&format!("Allocated:   {}\n", money(allocated, symbol)));
    if unallocated.is_positive() {
        output.push_str(&format!("Unallocated: {}\n", money(unallocated, symbol)));
    }
}

/// Suggested transfers from over-target tiers
pub fn format_rebalancing(moves: &[RebalanceMove], symbol: &str) -> String {
    if moves.is_empty() {
        return "No rebalancing needed.".to_string();
    }

    let mut output = String::from("Suggested transfers:\n");
    for m in moves {
        output.push_str(&format!(
            "  {} -> {}: {}\n",
            m.from_tier,
            m.to_tier,
            money(m.amount, symbol)
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Plan;

    fn dollars(d: i64) -> Money {
        Money::from_dollars_cents(d, 0)
    }

    #[test]
    fn test_format_allocation_plan() {
        let plan = Plan::starter().allocation_plan(dollars(40_000));
        let output = format_allocation_plan(&plan, "$");
        assert!(output.contains("Allocating $40,000.00"));
        assert!(output.contains("Tier 1"));
        assert!(output.contains("$30,000.00"));
        assert!(output.contains("Allocated:   $40,000.00"));
        assert!(!output.contains("Unallocated"));
    }

    #[test]
    fn test_format_detailed_allocation() {
        let plan = Plan::starter().allocation_plan_detailed(dollars(25_000));
        let output = format_detailed_allocation(&plan, "$");
        assert!(output.contains("Savings (Discover)"));
        assert!(output.contains("$23,000.00"));
        assert!(output.contains("Checking"));
    }

    #[test]
    fn test_format_empty_allocation() {
        let plan = Plan::starter().allocation_plan(Money::zero());
        assert!(format_allocation_plan(&plan, "$").contains("Nothing to allocate."));
    }

    #[test]
    fn test_format_rebalancing() {
        assert_eq!(format_rebalancing(&[], "$"), "No rebalancing needed.");

        let moves = vec![RebalanceMove {
            from_tier: "Tier 5".into(),
            to_tier: "Tier 1".into(),
            amount: dollars(5_000),
        }];
        assert!(format_rebalancing(&moves, "$").contains("Tier 5 -> Tier 1: $5,000.00"));
    }
}
