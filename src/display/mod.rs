//! Display formatting for terminal output
//!
//! Plain-text tables for the plan, allocation previews, forecasts, and
//! history. Every formatter takes the currency symbol from settings.

pub mod allocation;
pub mod forecast;
pub mod format;
pub mod history;
pub mod plan;

pub use allocation::{format_allocation_plan, format_detailed_allocation, format_rebalancing};
pub use forecast::{format_forecast, format_projection};
pub use history::{format_balance_history, format_history, format_recurring_list};
pub use plan::{format_plan_details, format_status, format_tier_details};
