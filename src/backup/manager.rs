//! Backup manager
//!
//! Writes timestamped JSON archives of the plan and recurring rules and
//! prunes them according to the retention policy.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::ReservePaths;
use crate::config::settings::BackupRetention;
use crate::error::{ReserveError, ReserveResult};
use crate::models::Plan;
use crate::storage::{read_json, read_json_required, write_json_atomic, RecurringData};

/// Current archive layout version
pub const ARCHIVE_SCHEMA_VERSION: u32 = 1;

/// Metadata about a backup file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// Oldest backup of its calendar month; kept under the monthly quota
    pub is_monthly: bool,
}

/// Backup archive format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupArchive {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    pub plan: Plan,
    #[serde(default)]
    pub recurring: RecurringData,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    paths: ReservePaths,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(paths: ReservePaths, retention: BackupRetention) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            paths,
            retention,
        }
    }

    /// Archive the current plan and recurring rules
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self) -> ReserveResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| ReserveError::Backup(format!("Failed to create backup directory: {}", e)))?;

        let now = Utc::now();
        let filename = format!(
            "backup-{}-{:03}.json",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = self.backup_dir.join(&filename);

        let archive = BackupArchive {
            schema_version: ARCHIVE_SCHEMA_VERSION,
            created_at: now,
            plan: read_json_required(self.paths.plan_file())
                .map_err(|e| ReserveError::Backup(format!("Nothing to back up: {}", e)))?,
            recurring: read_json(self.paths.recurring_file())?,
        };
        write_json_atomic(&backup_path, &archive)?;

        tracing::debug!(path = %backup_path.display(), "created backup");
        Ok(backup_path)
    }

    /// All backups, newest first
    pub fn list_backups(&self) -> ReserveResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.backup_dir)
            .map_err(|e| ReserveError::Backup(format!("Failed to read backup directory: {}", e)))?;

        let mut backups = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| ReserveError::Backup(format!("Failed to read directory entry: {}", e)))?
                .path();
            if let Some(info) = parse_backup_info(&path) {
                backups.push(info);
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mark_monthly(&mut backups);
        Ok(backups)
    }

    /// Delete backups beyond the daily and monthly quotas
    pub fn enforce_retention(&self) -> ReserveResult<Vec<PathBuf>> {
        let (monthly, daily): (Vec<_>, Vec<_>) =
            self.list_backups()?.into_iter().partition(|b| b.is_monthly);

        let expired = daily
            .into_iter()
            .skip(self.retention.daily_count as usize)
            .chain(monthly.into_iter().skip(self.retention.monthly_count as usize));

        let mut deleted = Vec::new();
        for backup in expired {
            fs::remove_file(&backup.path)
                .map_err(|e| ReserveError::Backup(format!("Failed to delete old backup: {}", e)))?;
            deleted.push(backup.path);
        }

        if !deleted.is_empty() {
            tracing::debug!(count = deleted.len(), "pruned old backups");
        }
        Ok(deleted)
    }

    /// Create a backup and then enforce retention
    pub fn create_backup_with_retention(&self) -> ReserveResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup()?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Look up a backup by filename
    pub fn get_backup(&self, filename: &str) -> ReserveResult<Option<BackupInfo>> {
        Ok(self
            .list_backups()?
            .into_iter()
            .find(|b| b.filename == filename))
    }

    pub fn get_latest_backup(&self) -> ReserveResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let stamp = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(stamp)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
        is_monthly: false,
    })
}

/// Flag the oldest backup of each month; `backups` must be newest first
fn mark_monthly(backups: &mut [BackupInfo]) {
    let mut seen = HashSet::new();
    for backup in backups.iter_mut().rev() {
        let month = (backup.created_at.year(), backup.created_at.month());
        backup.is_monthly = seen.insert(month);
    }
}

/// Parse `YYYYMMDD-HHMMSS` or `YYYYMMDD-HHMMSS-mmm`
fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = stamp.split('-').collect();
    let (date_part, time_part, millis) = match parts.as_slice() {
        [d, t] => (*d, *t, 0),
        [d, t, ms] => (*d, *t, ms.parse().ok()?),
        _ => return None,
    };
    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let date = NaiveDate::parse_from_str(date_part, "%Y%m%d").ok()?;
    let time = NaiveTime::parse_from_str(time_part, "%H%M%S")
        .ok()?
        .with_nanosecond(millis * 1_000_000)?;
    Some(NaiveDateTime::new(date, time).and_utc())
}
