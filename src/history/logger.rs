//! Append-only history log
//!
//! Entries are stored one JSON object per line (JSONL) and flushed on every
//! write, so a crash never loses an entry that was reported as recorded.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{ReserveError, ReserveResult};
use crate::models::Money;

use super::entry::{HistoryEntry, HistoryFilter};

/// Reads and appends balance-change history
pub struct HistoryLog {
    log_path: PathBuf,
}

impl HistoryLog {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    fn open_for_append(&self) -> ReserveResult<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| ReserveError::Io(format!("Failed to open history log: {}", e)))
    }

    fn append(file: &mut File, entry: &HistoryEntry) -> ReserveResult<()> {
        let json = serde_json::to_string(entry)
            .map_err(|e| ReserveError::Json(format!("Failed to serialize history entry: {}", e)))?;
        writeln!(file, "{}", json)
            .map_err(|e| ReserveError::Io(format!("Failed to write history entry: {}", e)))
    }

    /// Append one entry
    pub fn record(&self, entry: &HistoryEntry) -> ReserveResult<()> {
        self.record_batch(std::slice::from_ref(entry))
    }

    /// Append several entries with a single flush
    pub fn record_batch(&self, entries: &[HistoryEntry]) -> ReserveResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut file = self.open_for_append()?;
        for entry in entries {
            Self::append(&mut file, entry)?;
        }
        file.flush()
            .map_err(|e| ReserveError::Io(format!("Failed to flush history log: {}", e)))?;

        tracing::debug!(count = entries.len(), "recorded history entries");
        Ok(())
    }

    /// Every entry, oldest first
    pub fn read_all(&self) -> ReserveResult<Vec<HistoryEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| ReserveError::Io(format!("Failed to open history log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                ReserveError::Io(format!("Failed to read history line {}: {}", line_num + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: HistoryEntry = serde_json::from_str(&line).map_err(|e| {
                ReserveError::Json(format!(
                    "Failed to parse history entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Entries matching `filter`, newest first
    pub fn query(&self, filter: &HistoryFilter) -> ReserveResult<Vec<HistoryEntry>> {
        let mut entries: Vec<HistoryEntry> = self
            .read_all()?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    /// The last `count` entries written, oldest first
    pub fn recent(&self, count: usize) -> ReserveResult<Vec<HistoryEntry>> {
        let mut all = self.read_all()?;
        let start = all.len().saturating_sub(count);
        Ok(all.split_off(start))
    }

    /// `(date, balance_after)` points for one account, oldest first
    pub fn balance_history(
        &self,
        tier: &str,
        account: &str,
        since: Option<DateTime<Utc>>,
    ) -> ReserveResult<Vec<(NaiveDate, Money)>> {
        let mut filter = HistoryFilter::new().tier(tier).account(account);
        filter.since = since;

        let mut entries = self.query(&filter)?;
        entries.reverse();
        Ok(entries
            .into_iter()
            .map(|e| (e.timestamp.date_naive(), e.balance_after))
            .collect())
    }

    pub fn entry_count(&self) -> ReserveResult<usize> {
        Ok(self.read_all()?.len())
    }

    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::EntryKind;
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_log() -> (HistoryLog, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let log = HistoryLog::new(temp_dir.path().join("history.jsonl"));
        (log, temp_dir)
    }

    fn entry(account: &str, cents: i64, after: i64, days_ago: i64) -> HistoryEntry {
        HistoryEntry::new(
            EntryKind::Manual,
            "Tier 1",
            account,
            Money::from_cents(cents),
            Money::from_cents(after),
        )
        .with_timestamp(Utc::now() - Duration::days(days_ago))
    }

    #[test]
    fn test_empty_log() {
        let (log, _temp) = create_test_log();
        assert!(!log.exists());
        assert_eq!(log.entry_count().unwrap(), 0);
        assert!(log.query(&HistoryFilter::new()).unwrap().is_empty());
    }

    #[test]
    fn test_record_and_read() {
        let (log, _temp) = create_test_log();
        log.record(&entry("Savings", 500, 500, 0)).unwrap();
        log.record_batch(&[entry("Checking", 100, 100, 0), entry("Savings", 200, 700, 0)])
            .unwrap();

        let all = log.read_all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].account, "Savings");
        assert_eq!(all[2].balance_after, Money::from_cents(700));
    }

    #[test]
    fn test_query_newest_first_with_filters() {
        let (log, _temp) = create_test_log();
        log.record(&entry("Savings", 100, 100, 30)).unwrap();
        log.record(&entry("Checking", 50, 50, 10)).unwrap();
        log.record(&entry("Savings", 100, 200, 2)).unwrap();

        let savings = log.query(&HistoryFilter::new().account("Savings")).unwrap();
        assert_eq!(savings.len(), 2);
        assert_eq!(savings[0].balance_after, Money::from_cents(200));

        let recent = log
            .query(&HistoryFilter::new().within_days(14, Utc::now()))
            .unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].account, "Savings");
        assert_eq!(recent[1].account, "Checking");
    }

    #[test]
    fn test_recent() {
        let (log, _temp) = create_test_log();
        for i in 0..5 {
            log.record(&entry(&format!("A{}", i), 1, 1, 0)).unwrap();
        }
        let recent = log.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].account, "A3");
        assert_eq!(recent[1].account, "A4");
        assert_eq!(log.recent(10).unwrap().len(), 5);
    }

    #[test]
    fn test_balance_history_oldest_first() {
        let (log, _temp) = create_test_log();
        log.record(&entry("Savings", 100, 100, 5)).unwrap();
        log.record(&entry("Checking", 100, 100, 4)).unwrap();
        log.record(&entry("Savings", 300, 400, 1)).unwrap();

        let points = log.balance_history("Tier 1", "Savings", None).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].1, Money::from_cents(100));
        assert_eq!(points[1].1, Money::from_cents(400));
        assert!(points[0].0 <= points[1].0);

        let since = Utc::now() - Duration::days(3);
        assert_eq!(log.balance_history("Tier 1", "Savings", Some(since)).unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_line_is_reported() {
        let (log, _temp) = create_test_log();
        log.record(&entry("Savings", 1, 1, 0)).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(log.path())
            .and_then(|mut f| writeln!(f, "{{broken"))
            .unwrap();

        let err = log.read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
