//! Backup CLI commands

use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;

use crate::backup::{BackupManager, RestoreManager};
use crate::config::paths::ReservePaths;
use crate::config::settings::Settings;
use crate::error::{ReserveError, ReserveResult};

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Archive the plan and recurring rules now
    Create,

    /// List available backups, newest first
    List {
        /// Show size and age of each backup
        #[arg(short, long)]
        verbose: bool,
    },

    /// Replace the plan and recurring rules with a backup
    Restore {
        /// Backup filename or path ('latest' for the most recent)
        backup: String,

        /// Restore without stopping at the confirmation notice
        #[arg(short, long)]
        force: bool,
    },

    /// Delete backups beyond the retention policy
    Prune,
}

/// Handle a backup command
pub fn handle_backup_command(paths: &ReservePaths, settings: &Settings, cmd: BackupCommands) -> ReserveResult<()> {
    let manager = BackupManager::new(paths.clone(), settings.backup_retention.clone());

    match cmd {
        BackupCommands::Create => {
            let (backup_path, pruned) = manager.create_backup_with_retention()?;
            println!("Backup created: {}", file_label(&backup_path));
            println!("Location: {}", backup_path.display());
            if !pruned.is_empty() {
                println!("Pruned {} old backup(s).", pruned.len());
            }
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list_backups()?;
            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: reserve backup create");
                return Ok(());
            }

            for (i, backup) in backups.iter().enumerate() {
                let monthly = if backup.is_monthly { " [monthly]" } else { "" };
                if verbose {
                    let age = Utc::now().signed_duration_since(backup.created_at);
                    println!(
                        "  {}. {}{} ({} ago, {})",
                        i + 1,
                        backup.filename,
                        monthly,
                        format_age(age),
                        format_size(backup.size_bytes)
                    );
                } else {
                    println!("  {}. {}{}", i + 1, backup.filename, monthly);
                }
            }
            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, paths, &backup)?;
            let restore_manager = RestoreManager::new(paths.clone());
            let validation = restore_manager.validate_backup(&backup_path)?;

            println!("File: {}", backup_path.display());
            println!("{}", validation.summary());
            if !validation.is_valid {
                return Err(ReserveError::Backup(format!(
                    "Refusing to restore {}",
                    file_label(&backup_path)
                )));
            }

            if !force {
                println!();
                println!("This replaces the current plan and recurring rules.");
                println!("To proceed, run again with --force:");
                println!("  reserve backup restore {} --force", backup);
                return Ok(());
            }

            if paths.plan_file().exists() {
                let safety = manager.create_backup()?;
                println!("Current data saved to: {}", file_label(&safety));
            }

            let result = restore_manager.restore_from_file(&backup_path)?;
            println!("{}", result.summary());
        }

        BackupCommands::Prune => {
            let deleted = manager.enforce_retention()?;
            println!(
                "Deleted {} backup(s) (keeping {} daily, {} monthly).",
                deleted.len(),
                settings.backup_retention.daily_count,
                settings.backup_retention.monthly_count
            );
        }
    }

    Ok(())
}

/// Resolve `latest`, a path, or a filename in the backup directory
fn resolve_backup_path(manager: &BackupManager, paths: &ReservePaths, backup: &str) -> ReserveResult<PathBuf> {
    let not_found = || ReserveError::NotFound {
        entity_type: "Backup",
        identifier: backup.to_string(),
    };

    if backup.eq_ignore_ascii_case("latest") {
        return manager.get_latest_backup()?.map(|b| b.path).ok_or_else(not_found);
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    let in_dir = paths.backup_dir().join(backup);
    if in_dir.exists() {
        return Ok(in_dir);
    }
    let with_ext = paths.backup_dir().join(format!("{}.json", backup));
    if with_ext.exists() {
        return Ok(with_ext);
    }

    Err(not_found())
}

fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn format_age(duration: chrono::Duration) -> String {
    let minutes = duration.num_minutes();
    if minutes < 1 {
        format!("{}s", duration.num_seconds().max(0))
    } else if minutes < 60 {
        format!("{}m", minutes)
    } else if minutes < 60 * 24 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}d", minutes / (60 * 24))
    }
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(chrono::Duration::seconds(42)), "42s");
        assert_eq!(format_age(chrono::Duration::minutes(5)), "5m");
        assert_eq!(format_age(chrono::Duration::hours(3)), "3h");
        assert_eq!(format_age(chrono::Duration::days(9)), "9d");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
    }
}
