//! History and recurring rule display

use chrono::NaiveDate;

use crate::history::HistoryEntry;
use crate::models::{Money, RecurringContribution};

use super::format::{column_width, money, separator, truncate};

/// History entries, one per line
pub fn format_history(entries: &[HistoryEntry], symbol: &str) -> String {
    if entries.is_empty() {
        return "No history entries found.".to_string();
    }

    let tier_width = column_width("Tier", entries.iter().map(|e| e.tier.as_str()));
    let account_width = column_width("Account", entries.iter().map(|e| e.account.as_str()));

    let mut output = String::new();
    output.push_str(&format!(
        "{:<16}  {:<10}  {:<tier_width$}  {:<account_width$}  {:>14}  {:>14}  {}\n",
        "When", "Kind", "Tier", "Account", "Change", "Balance", "Description"
    ));
    output.push_str(&format!("{}\n", separator(tier_width + account_width + 90)));

    for entry in entries {
        output.push_str(&format!(
            "{:<16}  {:<10}  {:<tier_width$}  {:<account_width$}  {:>14}  {:>14}  {}\n",
            entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            entry.kind.to_string(),
            entry.tier,
            entry.account,
            signed(entry.amount, symbol),
            money(entry.balance_after, symbol),
            truncate(&entry.description, 40),
        ));
    }
    output
}

/// Balance of one account over time
pub fn format_balance_history(points: &[(NaiveDate, Money)], symbol: &str) -> String {
    if points.is_empty() {
        return "No balance changes recorded.".to_string();
    }
    points
        .iter()
        .map(|(date, balance)| format!("{}  {:>14}\n", date, money(*balance, symbol)))
        .collect()
}

/// Recurring contribution rules
pub fn format_recurring_list(rules: &[RecurringContribution], symbol: &str) -> String {
    if rules.is_empty() {
        return "No recurring contributions.".to_string();
    }

    let name_width = column_width("Name", rules.iter().map(|r| r.name.as_str()));

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<name_width$}  {:>12}  {:<10}  {:<10}  {}\n",
        "ID", "Name", "Amount", "Every", "Next", "Target"
    ));
    output.push_str(&format!("{}\n", separator(name_width + 80)));

    for rule in rules {
        let status = if rule.enabled { "" } else { "  (disabled)" };
        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:>12}  {:<10}  {:<10}  {} / {}{}\n",
            rule.id.to_string(),
            rule.name,
            money(rule.amount, symbol),
            rule.frequency.to_string(),
            rule.next_date.to_string(),
            rule.tier,
            rule.account,
            status,
        ));
    }
    output
}

fn signed(amount: Money, symbol: &str) -> String {
    if amount.is_negative() {
        money(amount, symbol)
    } else {
        format!("+{}", money(amount, symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::EntryKind;
    use crate::models::Frequency;

    #[test]
    fn test_format_history() {
        let entries = vec![
            HistoryEntry::new(
                EntryKind::Allocation,
                "Tier 1",
                "Checking",
                Money::from_cents(150_000),
                Money::from_cents(150_000),
            )
            .with_description("Bonus"),
            HistoryEntry::new(
                EntryKind::Manual,
                "Tier 1",
                "Checking",
                Money::from_cents(-50_000),
                Money::from_cents(100_000),
            ),
        ];

        let output = format_history(&entries, "$");
        assert!(output.contains("allocation"));
        assert!(output.contains("+$1,500.00"));
        assert!(output.contains("-$500.00"));
        assert!(output.contains("Bonus"));
    }

    #[test]
    fn test_format_history_empty() {
        assert_eq!(format_history(&[], "$"), "No history entries found.");
    }

    #[test]
    fn test_format_recurring_list() {
        let mut rule = RecurringContribution::new(
            "Paycheck",
            "Tier 1",
            "Checking",
            Money::from_cents(50_000),
            Frequency::Biweekly,
            NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
        )
        .unwrap();
        rule.enabled = false;

        let output = format_recurring_list(&[rule], "$");
        assert!(output.contains("Paycheck"));
        assert!(output.contains("biweekly"));
        assert!(output.contains("2025-01-03"));
        assert!(output.contains("Tier 1 / Checking  (disabled)"));
    }

    #[test]
    fn test_format_balance_history() {
        let points = vec![(NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(), Money::from_cents(100))];
        assert_eq!(format_balance_history(&points, "$"), "2025-01-03           $1.00\n");
    }
}
