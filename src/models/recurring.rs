//! Recurring contribution model
//!
//! A recurring contribution adds a fixed amount to one account on a schedule.
//! Rules live outside the plan and refer to their target by tier and account
//! name.

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::RecurringId;
use super::money::Money;
use super::validation::{clean_name, MAX_NAME_LEN};
use crate::error::{ReserveError, ReserveResult};

/// How often a recurring contribution repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Annually,
}

impl Frequency {
    pub const ALL: [Frequency; 6] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Annually,
    ];

    /// The date one period after `date`
    ///
    /// Month-based frequencies clamp to the last day of a shorter month
    /// (Jan 31 + 1 month = Feb 28/29).
    pub fn advance(&self, date: NaiveDate) -> NaiveDate {
        let next = match self {
            Self::Daily => date.checked_add_signed(Duration::days(1)),
            Self::Weekly => date.checked_add_signed(Duration::weeks(1)),
            Self::Biweekly => date.checked_add_signed(Duration::weeks(2)),
            Self::Monthly => date.checked_add_months(Months::new(1)),
            Self::Quarterly => date.checked_add_months(Months::new(3)),
            Self::Annually => date.checked_add_months(Months::new(12)),
        };
        next.unwrap_or(NaiveDate::MAX)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annually => "annually",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ReserveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| {
                ReserveError::Validation(format!(
                    "Unknown frequency '{}' (expected daily, weekly, biweekly, monthly, quarterly or annually)",
                    s
                ))
            })
    }
}

fn default_enabled() -> bool {
    true
}

/// A scheduled contribution into one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringContribution {
    pub id: RecurringId,
    pub name: String,
    pub tier: String,
    pub account: String,
    pub amount: Money,
    pub frequency: Frequency,
    /// Next date the contribution is due
    pub next_date: NaiveDate,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
}

impl RecurringContribution {
    /// Create an enabled rule after validating its fields
    pub fn new(
        name: &str,
        tier: &str,
        account: &str,
        amount: Money,
        frequency: Frequency,
        next_date: NaiveDate,
    ) -> ReserveResult<Self> {
        let rule = Self {
            id: RecurringId::new(),
            name: clean_name(name, "Name", MAX_NAME_LEN)?,
            tier: clean_name(tier, "Tier name", MAX_NAME_LEN)?,
            account: clean_name(account, "Account name", MAX_NAME_LEN)?,
            amount,
            frequency,
            next_date,
            enabled: true,
            description: String::new(),
        };
        rule.validate()?;
        Ok(rule)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the rule should run on `today`
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.enabled && self.next_date <= today
    }

    /// Move `next_date` forward by one period
    pub fn advance(&mut self) {
        self.next_date = self.frequency.advance(self.next_date);
    }

    /// History description for one run
    pub fn history_description(&self) -> String {
        if self.description.is_empty() {
            format!("Recurring: {}", self.name)
        } else {
            format!("Recurring: {} - {}", self.name, self.description)
        }
    }

    pub fn validate(&self) -> ReserveResult<()> {
        if !self.amount.is_positive() {
            return Err(ReserveError::Validation(format!(
                "Recurring amount must be positive, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

impl fmt::Display for RecurringContribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {} to {} / {})",
            self.name, self.amount, self.frequency, self.tier, self.account
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_advance_fixed_periods() {
        let start = date(2025, 3, 10);
        assert_eq!(Frequency::Daily.advance(start), date(2025, 3, 11));
        assert_eq!(Frequency::Weekly.advance(start), date(2025, 3, 17));
        assert_eq!(Frequency::Biweekly.advance(start), date(2025, 3, 24));
    }

    #[test]
    fn test_advance_months_clamps_day() {
        assert_eq!(Frequency::Monthly.advance(date(2025, 1, 31)), date(2025, 2, 28));
        assert_eq!(Frequency::Monthly.advance(date(2024, 1, 31)), date(2024, 2, 29));
        assert_eq!(Frequency::Monthly.advance(date(2025, 12, 15)), date(2026, 1, 15));
        assert_eq!(Frequency::Quarterly.advance(date(2025, 11, 30)), date(2026, 2, 28));
        assert_eq!(Frequency::Annually.advance(date(2024, 2, 29)), date(2025, 2, 28));
    }

    #[test]
    fn test_frequency_parse() {
        assert_eq!("Monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!(" biweekly ".parse::<Frequency>().unwrap(), Frequency::Biweekly);
        assert!("fortnightly".parse::<Frequency>().unwrap_err().is_validation());
    }

    #[test]
    fn test_frequency_serialization() {
        let json = serde_json::to_string(&Frequency::Quarterly).unwrap();
        assert_eq!(json, "\"quarterly\"");
    }

    #[test]
    fn test_is_due_and_advance() {
        let mut rule = RecurringContribution::new(
            "Paycheck",
            "Tier 1",
            "Checking",
            Money::from_cents(50_000),
            Frequency::Biweekly,
            date(2025, 1, 3),
        )
        .unwrap();

        assert!(!rule.is_due(date(2025, 1, 2)));
        assert!(rule.is_due(date(2025, 1, 3)));

        rule.advance();
        assert_eq!(rule.next_date, date(2025, 1, 17));

        rule.enabled = false;
        assert!(!rule.is_due(date(2025, 2, 1)));
    }

    #[test]
    fn test_new_rejects_bad_input() {
        let today = date(2025, 1, 1);
        assert!(RecurringContribution::new("x", "T", "A", Money::zero(), Frequency::Daily, today).is_err());
        assert!(RecurringContribution::new("", "T", "A", Money::from_cents(1), Frequency::Daily, today).is_err());
    }

    #[test]
    fn test_history_description() {
        let rule = RecurringContribution::new(
            "Savings sweep",
            "Tier 2",
            "USDC",
            Money::from_cents(10_000),
            Frequency::Monthly,
            date(2025, 1, 1),
        )
        .unwrap();
        assert_eq!(rule.history_description(), "Recurring: Savings sweep");
        let rule = rule.with_description("from paycheck");
        assert_eq!(rule.history_description(), "Recurring: Savings sweep - from paycheck");
    }
}
