//! Custom error types for the reserve manager
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for reserve manager operations
#[derive(Error, Debug)]
pub enum ReserveError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for inputs and plan data
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Backup and restore errors
    #[error("Backup error: {0}")]
    Backup(String),
}

impl ReserveError {
    /// Create a "not found" error for tiers
    pub fn tier_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Tier",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for an account inside a tier
    pub fn account_not_found(tier: &str, account: &str) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: format!("{} in {}", account, tier),
        }
    }

    /// Create a "not found" error for recurring contributions
    pub fn recurring_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Recurring contribution",
            identifier: identifier.into(),
        }
    }

    /// Create a "duplicate" error for tiers
    pub fn duplicate_tier(identifier: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: "Tier",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for ReserveError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ReserveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for ReserveError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

/// Result type alias for reserve manager operations
pub type ReserveResult<T> = Result<T, ReserveError>;
