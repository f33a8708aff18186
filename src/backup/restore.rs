//! Backup restoration
//!
//! An archive is fully validated before anything on disk is replaced.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::config::paths::ReservePaths;
use crate::error::{ReserveError, ReserveResult};
use crate::storage::{read_json_required, write_json_atomic};

use super::manager::{BackupArchive, ARCHIVE_SCHEMA_VERSION};

/// Handles restoring from backups
pub struct RestoreManager {
    paths: ReservePaths,
}

impl RestoreManager {
    pub fn new(paths: ReservePaths) -> Self {
        Self { paths }
    }

    /// Replace the plan and recurring rules with the contents of a backup file
    pub fn restore_from_file(&self, backup_path: &Path) -> ReserveResult<RestoreResult> {
        let archive = read_archive(backup_path)?;
        self.restore_from_archive(&archive)
    }

    /// Replace the plan and recurring rules with a parsed archive
    pub fn restore_from_archive(&self, archive: &BackupArchive) -> ReserveResult<RestoreResult> {
        check_archive(archive)?;
        self.paths.ensure_directories()?;

        write_json_atomic(self.paths.plan_file(), &archive.plan)?;
        write_json_atomic(self.paths.recurring_file(), &archive.recurring)?;

        let result = RestoreResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            tiers: archive.plan.tiers.len(),
            accounts: archive.plan.tiers.iter().map(|t| t.accounts.len()).sum(),
            recurring_rules: archive.recurring.rules.len(),
        };
        tracing::info!(
            tiers = result.tiers,
            accounts = result.accounts,
            rules = result.recurring_rules,
            "restored backup"
        );
        Ok(result)
    }

    /// Check a backup file without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> ReserveResult<ValidationResult> {
        let archive = read_archive(backup_path)?;
        let problem = check_archive(&archive).err().map(|e| e.to_string());

        Ok(ValidationResult {
            is_valid: problem.is_none(),
            problem,
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            tiers: archive.plan.tiers.len(),
            recurring_rules: archive.recurring.rules.len(),
        })
    }
}

fn read_archive(path: &Path) -> ReserveResult<BackupArchive> {
    read_json_required(path).map_err(|e| ReserveError::Backup(format!("Unreadable backup: {}", e)))
}

fn check_archive(archive: &BackupArchive) -> ReserveResult<()> {
    if archive.schema_version > ARCHIVE_SCHEMA_VERSION {
        return Err(ReserveError::Backup(format!(
            "Backup schema version {} is newer than supported ({})",
            archive.schema_version, ARCHIVE_SCHEMA_VERSION
        )));
    }
    if archive.plan.tiers.is_empty() {
        return Err(ReserveError::Backup("Backup contains no tiers".into()));
    }
    archive
        .plan
        .validate()
        .map_err(|e| ReserveError::Backup(format!("Backup plan is invalid: {}", e)))?;
    for rule in &archive.recurring.rules {
        rule.validate()
            .map_err(|e| ReserveError::Backup(format!("Recurring rule '{}' is invalid: {}", rule.name, e)))?;
    }
    Ok(())
}

/// Result of a restore operation
#[derive(Debug, Clone)]
pub struct RestoreResult {
    pub schema_version: u32,
    pub backup_date: DateTime<Utc>,
    pub tiers: usize,
    pub accounts: usize,
    pub recurring_rules: usize,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        format!(
            "Restored {} tier(s), {} account(s), {} recurring rule(s) from {}",
            self.tiers,
            self.accounts,
            self.recurring_rules,
            self.backup_date.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

/// Result of validating a backup
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// First problem found, if any
    pub problem: Option<String>,
    pub schema_version: u32,
    pub backup_date: DateTime<Utc>,
    pub tiers: usize,
    pub recurring_rules: usize,
}

impl ValidationResult {
    pub fn summary(&self) -> String {
        match &self.problem {
            None => format!(
                "Valid backup from {}: {} tier(s), {} recurring rule(s)",
                self.backup_date.format("%Y-%m-%d %H:%M:%S UTC"),
                self.tiers,
                self.recurring_rules
            ),
            Some(problem) => format!("Invalid backup: {}", problem),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::BackupManager;
    use crate::config::settings::BackupRetention;
    use crate::models::Money;
    use crate::storage::{initialize_storage, Storage};
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ReservePaths) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReservePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        initialize_storage(&storage, false).unwrap();
        (temp_dir, paths)
    }

    #[test]
    fn test_restore_round_trip() {
        let (_temp, paths) = setup();
        let manager = BackupManager::new(paths.clone(), BackupRetention::default());
        let backup = manager.create_backup().unwrap();

        let storage = Storage::new(paths.clone()).unwrap();
        let mut plan = storage.load_plan().unwrap();
        plan.account_mut("Tier 1", "Checking").unwrap().balance = Money::from_cents(999);
        storage.save_plan(&mut plan).unwrap();

        let restore = RestoreManager::new(paths.clone());
        let result = restore.restore_from_file(&backup).unwrap();
        assert_eq!(result.tiers, 6);
        assert_eq!(result.recurring_rules, 0);

        let restored = Storage::new(paths).unwrap().load_plan().unwrap();
        assert_eq!(restored.account("Tier 1", "Checking").unwrap().balance, Money::zero());
    }

    #[test]
    fn test_invalid_backup_leaves_data_alone() {
        let (temp, paths) = setup();
        let manager = BackupManager::new(paths.clone(), BackupRetention::default());
        let backup = manager.create_backup().unwrap();

        let mut archive: BackupArchive = read_json_required(&backup).unwrap();
        archive.plan.tiers[0].accounts[0].balance = Money::from_cents(-100);
        let bad = temp.path().join("bad.json");
        write_json_atomic(&bad, &archive).unwrap();

        let restore = RestoreManager::new(paths.clone());
        let validation = restore.validate_backup(&bad).unwrap();
        assert!(!validation.is_valid);
        assert!(validation.summary().starts_with("Invalid backup"));

        assert!(restore.restore_from_file(&bad).is_err());
        assert_eq!(Storage::new(paths).unwrap().load_plan().unwrap().total_reserves(), Money::zero());
    }

    #[test]
    fn test_unreadable_backup() {
        let (temp, paths) = setup();
        let junk = temp.path().join("junk.json");
        fs::write(&junk, "not json").unwrap();

        let restore = RestoreManager::new(paths);
        assert!(matches!(restore.validate_backup(&junk), Err(ReserveError::Backup(_))));
    }
}
