//! Growth forecasting
//!
//! `forecast` compounds each account independently; `projection` walks total
//! reserves forward month by month with a fixed contribution.

use serde::Serialize;

use super::money::Money;
use super::plan::Plan;

/// Expected growth of one tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierForecast {
    pub tier: String,
    pub growth: Money,
}

/// Expected growth of every tier over a horizon
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Forecast {
    pub months: i32,
    /// Tiers in plan order
    pub tiers: Vec<TierForecast>,
}

impl Forecast {
    pub fn total(&self) -> Money {
        self.tiers.iter().map(|t| t.growth).sum()
    }

    /// Growth for a single tier
    pub fn growth_for(&self, tier: &str) -> Option<Money> {
        self.tiers.iter().find(|t| t.tier == tier).map(|t| t.growth)
    }
}

/// One month of a reserves projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectionPoint {
    pub month: u32,
    pub balance: Money,
    /// Contributions added up to and including this month
    pub contributed: Money,
    /// Interest added up to and including this month
    pub interest: Money,
}

/// Longest projection horizon, in months
pub const MAX_PROJECTION_MONTHS: u32 = 1200;

impl Plan {
    /// Expected interest per tier over `months`, monthly compounding
    pub fn forecast(&self, months: i32) -> Forecast {
        let tiers = self
            .tiers
            .iter()
            .map(|tier| TierForecast {
                tier: tier.name.clone(),
                growth: tier.accounts.iter().map(|a| a.expected_growth(months)).sum(),
            })
            .collect();
        Forecast { months, tiers }
    }

    /// Month-by-month total reserves with a fixed monthly contribution
    ///
    /// Month 0 is today's total. Each month adds the contribution plus one
    /// month of simple yield on today's account balances. The horizon is
    /// capped at [`MAX_PROJECTION_MONTHS`].
    pub fn projection(&self, months: u32, monthly_contribution: Money) -> Vec<ProjectionPoint> {
        let months = months.min(MAX_PROJECTION_MONTHS);
        let monthly_yield: f64 = self
            .tiers
            .iter()
            .flat_map(|t| t.accounts.iter())
            .map(|a| a.monthly_yield())
            .sum();
        let contribution = monthly_contribution.non_negative();

        let start = self.total_reserves();
        let mut points = Vec::with_capacity(months as usize + 1);
        points.push(ProjectionPoint {
            month: 0,
            balance: start,
            contributed: Money::zero(),
            interest: Money::zero(),
        });

        for month in 1..=months {
            let interest = Money::from_dollars_f64(monthly_yield * f64::from(month));
            let contributed = Money::from_cents(contribution.cents().saturating_mul(i64::from(month)));
            points.push(ProjectionPoint {
                month,
                balance: start + contributed + interest,
                contributed,
                interest,
            });
        }
        points
    }
}
