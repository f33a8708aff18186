//! Service layer for the reserve manager
//!
//! Services sit on top of storage: they load the plan, run the engine or an
//! edit, save, and record history for balance changes.

pub mod allocation;
pub mod import;
pub mod plan;
pub mod recurring;

pub use allocation::{AllocationService, AppliedAllocation};
pub use import::{ImportPreview, ImportResult, ImportRow, ImportService, RowError};
pub use plan::PlanService;
pub use recurring::{ProcessedContribution, RecurringService};
