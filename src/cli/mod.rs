//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Amounts arrive as
//! strings and go through the validation parsers before any service call.

pub mod account;
pub mod backup;
pub mod history;
pub mod import;
pub mod recurring;
pub mod reserve;
pub mod tier;

pub use account::{handle_account_command, AccountCommands};
pub use backup::{handle_backup_command, BackupCommands};
pub use history::{handle_history_command, HistoryArgs};
pub use import::handle_import_command;
pub use recurring::{handle_recurring_command, RecurringCommands};
pub use reserve::{
    handle_allocate_command, handle_forecast_command, handle_project_command, handle_rebalance_command,
    handle_status_command,
};
pub use tier::{handle_tier_command, TierCommands};
