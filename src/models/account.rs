//! Account model
//!
//! An account is a named balance inside a tier, with a yield rate, an
//! allocation weight, and an optional capacity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::validation::{check_amount, check_weight, check_yield};
use crate::error::ReserveResult;

fn default_weight() -> f64 {
    1.0
}

/// A money container inside a tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Account name, unique within its tier
    pub name: String,

    /// Current balance
    #[serde(default)]
    pub balance: Money,

    /// Annual percentage yield, e.g. 4.25 for 4.25%
    #[serde(default)]
    pub apy_pct: f64,

    /// Relative weight when distributing cash within a tier
    #[serde(default = "default_weight")]
    pub alloc_weight: f64,

    /// Optional capacity for this account
    #[serde(default)]
    pub account_target: Option<Money>,

    /// Free-text notes
    #[serde(default)]
    pub notes: String,
}

/// How much more an account can absorb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Room {
    /// No capacity set
    Unbounded,
    /// Capacity set; never negative
    Limited(Money),
}

impl Room {
    /// Whether the account can take any more money
    pub fn is_open(&self) -> bool {
        match self {
            Room::Unbounded => true,
            Room::Limited(room) => room.is_positive(),
        }
    }

    /// Cap an amount at this room
    pub fn clamp(&self, amount: Money) -> Money {
        match self {
            Room::Unbounded => amount,
            Room::Limited(room) => amount.min(*room),
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Room::Unbounded => write!(f, "unbounded"),
            Room::Limited(room) => write!(f, "{}", room),
        }
    }
}

impl Account {
    /// Create a new account with default values
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            balance: Money::zero(),
            apy_pct: 0.0,
            alloc_weight: default_weight(),
            account_target: None,
            notes: String::new(),
        }
    }

    /// Set the starting balance
    pub fn with_balance(mut self, balance: Money) -> Self {
        self.balance = balance;
        self
    }

    /// Set the annual yield
    pub fn with_apy(mut self, apy_pct: f64) -> Self {
        self.apy_pct = apy_pct;
        self
    }

    /// Set the allocation weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.alloc_weight = weight;
        self
    }

    /// Set the capacity
    pub fn with_cap(mut self, cap: Money) -> Self {
        self.account_target = Some(cap);
        self
    }

    /// Set the notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Remaining capacity: `cap - balance` clamped at zero, or unbounded
    pub fn remaining_room(&self) -> Room {
        match self.account_target {
            None => Room::Unbounded,
            Some(cap) => Room::Limited((cap - self.balance).non_negative()),
        }
    }

    /// Weight used for splitting; negative weights count as zero
    pub fn effective_weight(&self) -> f64 {
        if self.alloc_weight.is_finite() {
            self.alloc_weight.max(0.0)
        } else {
            0.0
        }
    }

    /// Interest earned over `months` with monthly compounding
    ///
    /// `balance * ((1 + apy/1200)^months - 1)`; zero for non-positive balance,
    /// yield, or month count. Growth beyond the representable range saturates.
    pub fn expected_growth(&self, months: i32) -> Money {
        if self.apy_pct <= 0.0 || !self.balance.is_positive() || months <= 0 {
            return Money::zero();
        }
        let monthly_rate = self.apy_pct / 1200.0;
        let factor = (1.0 + monthly_rate).powi(months) - 1.0;
        let growth = self.balance.as_dollars_f64() * factor;
        if growth.is_nan() {
            return Money::zero();
        }
        Money::from_dollars_f64(growth.min(Money::MAX.as_dollars_f64()))
    }

    /// Simple (non-compounded) interest for a single month
    pub fn monthly_yield(&self) -> f64 {
        if self.apy_pct <= 0.0 || !self.balance.is_positive() {
            return 0.0;
        }
        self.balance.as_dollars_f64() * self.apy_pct / 1200.0
    }

    /// Apply a patch to this account
    pub fn apply(&mut self, patch: &AccountPatch) {
        if let Some(balance) = patch.balance {
            self.balance = balance;
        }
        if let Some(apy) = patch.apy_pct {
            self.apy_pct = apy;
        }
        if let Some(weight) = patch.alloc_weight {
            self.alloc_weight = weight;
        }
        match patch.cap {
            CapChange::Keep => {}
            CapChange::Set(cap) => self.account_target = Some(cap),
            CapChange::Clear => self.account_target = None,
        }
        if let Some(notes) = &patch.notes {
            self.notes.clone_from(notes);
        }
    }

    /// Validate the account's numeric fields
    pub fn validate(&self) -> ReserveResult<()> {
        check_amount(self.balance, "Balance")?;
        check_yield(self.apy_pct)?;
        check_weight(self.alloc_weight)?;
        if let Some(cap) = self.account_target {
            check_amount(cap, "Account cap")?;
        }
        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.balance)
    }
}

/// Change to an account's capacity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CapChange {
    /// Leave the cap as it is
    #[default]
    Keep,
    /// Set a new cap
    Set(Money),
    /// Remove the cap (unbounded)
    Clear,
}

/// Partial update for an account; `None` means "leave unchanged"
///
/// When the patch creates a new account, omitted fields take the account
/// defaults (zero balance, zero yield, weight 1.0, no cap, empty notes).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountPatch {
    pub balance: Option<Money>,
    pub apy_pct: Option<f64>,
    pub alloc_weight: Option<f64>,
    pub cap: CapChange,
    pub notes: Option<String>,
}

impl AccountPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(mut self, balance: Money) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn apy(mut self, apy_pct: f64) -> Self {
        self.apy_pct = Some(apy_pct);
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.alloc_weight = Some(weight);
        self
    }

    pub fn cap(mut self, cap: Money) -> Self {
        self.cap = CapChange::Set(cap);
        self
    }

    pub fn clear_cap(mut self) -> Self {
        self.cap = CapChange::Clear;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Check the values carried by the patch
    pub fn validate(&self) -> ReserveResult<()> {
        if let Some(balance) = self.balance {
            check_amount(balance, "Balance")?;
        }
        if let Some(apy) = self.apy_pct {
            check_yield(apy)?;
        }
        if let Some(weight) = self.alloc_weight {
            check_weight(weight)?;
        }
        if let CapChange::Set(cap) = self.cap {
            check_amount(cap, "Account cap")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_room() {
        let open = Account::new("Bonds").with_balance(Money::from_cents(50_000));
        assert_eq!(open.remaining_room(), Room::Unbounded);
        assert!(open.remaining_room().is_open());

        let capped = open.clone().with_cap(Money::from_cents(80_000));
        assert_eq!(capped.remaining_room(), Room::Limited(Money::from_cents(30_000)));

        let over = open.with_cap(Money::from_cents(10_000));
        assert_eq!(over.remaining_room(), Room::Limited(Money::zero()));
        assert!(!over.remaining_room().is_open());
    }

    #[test]
    fn test_room_clamp() {
        let amount = Money::from_cents(500);
        assert_eq!(Room::Unbounded.clamp(amount), amount);
        assert_eq!(Room::Limited(Money::from_cents(200)).clamp(amount).cents(), 200);
    }

    #[test]
    fn test_expected_growth_monthly_compounding() {
        let account = Account::new("HYSA")
            .with_balance(Money::from_dollars_cents(10_000, 0))
            .with_apy(6.0);
        assert_eq!(account.expected_growth(12), Money::from_cents(61_678));
    }

    #[test]
    fn test_expected_growth_saturates_on_long_horizons() {
        let crypto = Account::new("Crypto")
            .with_balance(Money::from_dollars_cents(10_000, 0))
            .with_apy(40.0);
        assert_eq!(crypto.expected_growth(1000), Money::MAX);
        assert_eq!(crypto.expected_growth(i32::MAX), Money::MAX);
    }

    #[test]
    fn test_expected_growth_zero_cases() {
        let funded = Account::new("A").with_balance(Money::from_cents(100_000)).with_apy(5.0);
        assert_eq!(funded.expected_growth(0), Money::zero());
        assert_eq!(funded.expected_growth(-3), Money::zero());

        let empty = Account::new("B").with_apy(5.0);
        assert_eq!(empty.expected_growth(12), Money::zero());

        let no_yield = Account::new("C").with_balance(Money::from_cents(100_000));
        assert_eq!(no_yield.expected_growth(12), Money::zero());
    }

    #[test]
    fn test_effective_weight() {
        assert_eq!(Account::new("A").with_weight(-2.0).effective_weight(), 0.0);
        assert_eq!(Account::new("A").with_weight(f64::NAN).effective_weight(), 0.0);
        assert_eq!(Account::new("A").with_weight(2.5).effective_weight(), 2.5);
    }

    #[test]
    fn test_apply_patch() {
        let mut account = Account::new("USDC")
            .with_balance(Money::from_cents(100))
            .with_cap(Money::from_cents(5_000))
            .with_notes("stablecoin");

        account.apply(&AccountPatch::new().apy(5.2).weight(2.0));
        assert_eq!(account.apy_pct, 5.2);
        assert_eq!(account.alloc_weight, 2.0);
        assert_eq!(account.balance.cents(), 100);
        assert_eq!(account.account_target, Some(Money::from_cents(5_000)));
        assert_eq!(account.notes, "stablecoin");

        account.apply(&AccountPatch::new().clear_cap().notes(""));
        assert_eq!(account.account_target, None);
        assert_eq!(account.notes, "");
    }

    #[test]
    fn test_validate() {
        assert!(Account::new("A").validate().is_ok());
        assert!(Account::new("A").with_apy(-1.0).validate().is_err());
        assert!(Account::new("A")
            .with_balance(Money::from_cents(-1))
            .validate()
            .is_err());
        assert!(AccountPatch::new().weight(-1.0).validate().is_err());
    }

    #[test]
    fn test_cap_survives_serialization() {
        let capped = Account::new("A").with_cap(Money::zero());
        let json = serde_json::to_string(&capped).unwrap();
        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(back.account_target, Some(Money::zero()));

        let uncapped: Account = serde_json::from_str(r#"{"name": "B"}"#).unwrap();
        assert_eq!(uncapped.account_target, None);
        assert_eq!(uncapped.alloc_weight, 1.0);
    }
}
