//! Backup and restore
//!
//! Archives are JSON files named `backup-YYYYMMDD-HHMMSS-mmm.json` in the
//! backup directory. Each one holds the plan and the recurring rules; the
//! history log is append-only and is not archived.
//!
//! Retention keeps the newest `daily_count` backups plus the oldest backup
//! of each of the last `monthly_count` months.
//!
//! ```rust,ignore
//! use reserve_manager::backup::{BackupManager, RestoreManager};
//! use reserve_manager::config::{paths::ReservePaths, settings::BackupRetention};
//!
//! let paths = ReservePaths::new()?;
//! let manager = BackupManager::new(paths.clone(), BackupRetention::default());
//! let (backup_path, _pruned) = manager.create_backup_with_retention()?;
//!
//! let result = RestoreManager::new(paths).restore_from_file(&backup_path)?;
//! println!("{}", result.summary());
//! ```

mod manager;
mod restore;

pub use manager::{BackupArchive, BackupInfo, BackupManager, ARCHIVE_SCHEMA_VERSION};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
