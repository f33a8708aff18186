//! Reserve Manager - tiered cash reserve planning
//!
//! A reserve plan is a list of prioritized tiers, each holding one or more
//! accounts with a target. New money flows through a waterfall: the
//! highest-priority tier with a gap is filled first, split across its
//! accounts by weight and capped by each account's limit.
//!
//! # Architecture
//!
//! - `config`: Paths and user settings
//! - `error`: Error type and result alias
//! - `models`: Money, accounts, tiers, the plan, allocation results, forecasts
//! - `storage`: JSON file storage for the plan and recurring rules
//! - `history`: Append-only balance history log
//! - `services`: Allocation engine, plan editing, recurring contributions, CSV import
//! - `backup`: Archive and restore of the plan
//! - `display`: Plain-text formatting for terminal output
//! - `cli`: Command handlers for the `reserve` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use reserve_manager::config::paths::ReservePaths;
//! use reserve_manager::models::Money;
//! use reserve_manager::storage::Storage;
//! use reserve_manager::services::AllocationService;
//!
//! let storage = Storage::new(ReservePaths::new()?)?;
//! let plan = AllocationService::new(&storage).preview(Money::from_cents(500_000))?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod history;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{ReserveError, ReserveResult};
