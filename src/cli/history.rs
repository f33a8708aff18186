//! History CLI command

use chrono::Utc;
use clap::Args;

use crate::config::settings::Settings;
use crate::display::format_history;
use crate::error::{ReserveError, ReserveResult};
use crate::history::{EntryKind, HistoryFilter};
use crate::storage::Storage;

/// Filters for `history`
#[derive(Args, Debug, Default)]
pub struct HistoryArgs {
    /// Only entries for this tier
    #[arg(short, long)]
    pub tier: Option<String>,
    /// Only entries for this account
    #[arg(short, long)]
    pub account: Option<String>,
    /// Only entries of this kind (manual, allocation, rebalance, import, recurring)
    #[arg(short, long)]
    pub kind: Option<String>,
    /// Only entries within the last N days
    #[arg(short, long)]
    pub days: Option<i64>,
    /// Maximum number of entries to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

fn parse_kind(value: &str) -> ReserveResult<EntryKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "manual" => Ok(EntryKind::Manual),
        "allocation" => Ok(EntryKind::Allocation),
        "rebalance" => Ok(EntryKind::Rebalance),
        "import" => Ok(EntryKind::Import),
        "recurring" => Ok(EntryKind::Recurring),
        other => Err(ReserveError::Validation(format!(
            "Unknown history kind '{}'. Use manual, allocation, rebalance, import, or recurring",
            other
        ))),
    }
}

/// Print history entries, newest first
pub fn handle_history_command(storage: &Storage, settings: &Settings, args: HistoryArgs) -> ReserveResult<()> {
    let mut filter = HistoryFilter::new();
    if let Some(tier) = args.tier {
        filter = filter.tier(tier);
    }
    if let Some(account) = args.account {
        filter = filter.account(account);
    }
    if let Some(kind) = args.kind {
        filter = filter.kind(parse_kind(&kind)?);
    }
    if let Some(days) = args.days {
        filter = filter.within_days(days, Utc::now());
    }

    let mut entries = storage.history.query(&filter)?;
    let total = entries.len();
    entries.truncate(args.limit);

    println!("{}", format_history(&entries, &settings.currency_symbol).trim_end());
    if total > entries.len() {
        println!("... {} older entries not shown (use --limit)", total - entries.len());
    }
    Ok(())
}
