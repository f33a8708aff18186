//! User settings for the reserve manager
//!
//! Manages user preferences such as the default contribution, forecast
//! horizon, and backup retention policy.

use serde::{Deserialize, Serialize};

use super::paths::ReservePaths;
use crate::error::ReserveError;
use crate::models::Money;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of daily backups to keep
    pub daily_count: u32,
    /// Number of monthly backups to keep
    pub monthly_count: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            daily_count: 30,
            monthly_count: 12,
        }
    }
}

/// User settings for the reserve manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Monthly contribution used by projections when none is given
    #[serde(default = "default_contribution")]
    pub default_contribution: Money,

    /// Forecast horizon in months used when none is given
    #[serde(default = "default_forecast_months")]
    pub forecast_months: u32,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Create a backup before every command that writes the plan
    #[serde(default = "default_auto_backup")]
    pub auto_backup: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_contribution() -> Money {
    Money::from_dollars_cents(1000, 0)
}

fn default_forecast_months() -> u32 {
    12
}

fn default_auto_backup() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            default_contribution: default_contribution(),
            forecast_months: default_forecast_months(),
            backup_retention: BackupRetention::default(),
            auto_backup: default_auto_backup(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &ReservePaths) -> Result<Self, ReserveError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                ReserveError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ReserveError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ReservePaths) -> Result<(), ReserveError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            ReserveError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| ReserveError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
