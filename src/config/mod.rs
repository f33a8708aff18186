//! Configuration module for the reserve manager
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::ReservePaths;
pub use settings::{BackupRetention, Settings};
