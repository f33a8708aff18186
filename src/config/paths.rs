//! Path management for the reserve manager
//!
//! Provides XDG-compliant path resolution for settings, plan data, history,
//! and backups.
//!
//! ## Path Resolution Order
//!
//! 1. `RESERVE_MANAGER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/reserve-manager` or `~/.config/reserve-manager`
//! 3. Windows: `%APPDATA%\reserve-manager`

use std::path::PathBuf;

use crate::error::ReserveError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "RESERVE_MANAGER_DATA_DIR";

/// Manages all paths used by the reserve manager
#[derive(Debug, Clone)]
pub struct ReservePaths {
    /// Base directory for all reserve manager data
    base_dir: PathBuf,
}

impl ReservePaths {
    /// Create a new ReservePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, ReserveError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create ReservePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/reserve-manager/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/reserve-manager/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the backup directory (~/.config/reserve-manager/backups/)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the history log
    pub fn history_log(&self) -> PathBuf {
        self.base_dir.join("history.jsonl")
    }

    /// Get the path to plan.json
    pub fn plan_file(&self) -> PathBuf {
        self.data_dir().join("plan.json")
    }

    /// Get the path to recurring.json
    pub fn recurring_file(&self) -> PathBuf {
        self.data_dir().join("recurring.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), ReserveError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ReserveError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| ReserveError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| ReserveError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if a plan has been initialized
    pub fn is_initialized(&self) -> bool {
        self.plan_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, ReserveError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                ReserveError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("reserve-manager"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, ReserveError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| ReserveError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("reserve-manager"))
}
