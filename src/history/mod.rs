//! Balance-change history
//!
//! Every applied allocation, manual balance edit, import, and recurring
//! contribution is appended to `history.jsonl` with the balance it produced.
//!
//! - `HistoryEntry`: one signed change to one account, with its cause.
//! - `HistoryFilter`: tier / account / kind / time-window selection.
//! - `HistoryLog`: the JSONL file, with querying and per-account balance series.

mod entry;
mod logger;

pub use entry::{EntryKind, HistoryEntry, HistoryFilter};
pub use logger::HistoryLog;
