//! Plan display formatting
//!
//! Status table of tiers and their accounts, plus a detail view of one tier.

use crate::models::{Plan, Tier};

use super::format::{column_width, coverage_bar, money, percentage, separator};

/// Tiers in priority order with coverage, followed by plan totals
pub fn format_status(plan: &Plan, symbol: &str) -> String {
    if plan.tiers.is_empty() {
        return "No tiers defined.".to_string();
    }

    let tiers = plan.sorted_by_priority();
    let labels: Vec<String> = tiers.iter().map(|t| tier_label(t)).collect();
    let name_width = column_width("Tier", labels.iter().map(String::as_str));

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>14}  {:>14}  {:>14}  {:>8}  {}\n",
        "Tier", "Target", "Balance", "Gap", "Coverage", "",
    ));
    output.push_str(&format!("{}\n", separator(name_width + 72)));

    for (tier, label) in tiers.iter().zip(&labels) {
        output.push_str(&format!(
            "{:<name_width$}  {:>14}  {:>14}  {:>14}  {:>8}  {}\n",
            label,
            money(tier.target, symbol),
            money(tier.total(), symbol),
            money(tier.gap(), symbol),
            percentage(tier.coverage_pct()),
            coverage_bar(tier.coverage_pct(), 10),
        ));
    }

    let totals = plan.totals();
    output.push_str(&format!("{}\n", separator(name_width + 72)));
    output.push_str(&format!(
        "{:<name_width$}  {:>14}  {:>14}  {:>14}\n",
        "TOTAL",
        money(totals.target, symbol),
        money(totals.reserves, symbol),
        money(totals.gap, symbol),
    ));
    if totals.excess.is_positive() {
        output.push_str(&format!("Excess above targets: {}\n", money(totals.excess, symbol)));
    }
    output.push_str(&format!("Last updated: {}\n", plan.last_updated));

    output
}

/// Accounts of one tier with weights, yields, and caps
pub fn format_tier_details(tier: &Tier, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", tier_label(tier)));
    if !tier.purpose.is_empty() {
        output.push_str(&format!("  Purpose:  {}\n", tier.purpose));
    }
    output.push_str(&format!(
        "  Target:   {}   Balance: {}   Gap: {}\n",
        money(tier.target, symbol),
        money(tier.total(), symbol),
        money(tier.gap(), symbol),
    ));

    if tier.accounts.is_empty() {
        output.push_str("  (no accounts)\n");
        return output;
    }

    let name_width = column_width("Account", tier.accounts.iter().map(|a| a.name.as_str())) + 2;
    output.push_str(&format!(
        "  {:<name_width$}  {:>14}  {:>7}  {:>6}  {:>14}  {}\n",
        "Account", "Balance", "APY", "Weight", "Cap", "Notes",
    ));

    for account in &tier.accounts {
        let marker = if tier.preferred_account.as_deref() == Some(account.name.as_str()) {
            " *"
        } else {
            ""
        };
        let cap = account
            .account_target
            .map(|c| money(c, symbol))
            .unwrap_or_else(|| "-".to_string());

        output.push_str(&format!(
            "  {:<name_width$}  {:>14}  {:>7}  {:>6.2}  {:>14}  {}\n",
            format!("{}{}", account.name, marker),
            money(account.balance, symbol),
            format!("{:.2}%", account.apy_pct),
            account.alloc_weight,
            cap,
            account.notes,
        ));
    }

    if tier.preferred_account.is_some() {
        output.push_str("  * preferred account\n");
    }
    output
}

/// Every tier's detail view in priority order
pub fn format_plan_details(plan: &Plan, symbol: &str) -> String {
    plan.sorted_by_priority()
        .into_iter()
        .map(|t| format_tier_details(t, symbol))
        .collect::<Vec<_>>()
        .join("\n")
}

fn tier_label(tier: &Tier) -> String {
    if tier.absorbs_overflow {
        format!("{} (overflow)", tier)
    } else {
        tier.to_string()
    }
}
