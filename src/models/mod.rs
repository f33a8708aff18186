//! Core data models for the reserve manager
//!
//! This module contains the reserve domain: accounts grouped into prioritized
//! tiers, the plan that orders them, and the allocation, rebalancing, and
//! forecasting engine that runs over a plan snapshot.

pub mod account;
pub mod allocation;
pub mod forecast;
pub mod ids;
pub mod money;
pub mod plan;
pub mod recurring;
pub mod tier;
pub mod validation;

pub use account::{Account, AccountPatch, CapChange, Room};
pub use allocation::{AccountMove, AllocationPlan, DetailedAllocation, RebalanceMove, TierMove};
pub use forecast::{Forecast, ProjectionPoint, TierForecast, MAX_PROJECTION_MONTHS};
pub use ids::{HistoryId, RecurringId};
pub use money::Money;
pub use plan::{MoveDirection, Plan, PlanTotals};
pub use recurring::{Frequency, RecurringContribution};
pub use tier::{AccountShare, Tier, UpsertOutcome};
