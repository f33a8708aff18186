//! CLI command handler for CSV import
//!
//! Shows a preview of the parsed rows and imports them unless `--dry-run`
//! is given. Any row error stops the import.

use std::path::Path;

use crate::config::settings::Settings;
use crate::error::{ReserveError, ReserveResult};
use crate::services::ImportService;
use crate::storage::Storage;

/// Handle the import command
pub fn handle_import_command(storage: &Storage, settings: &Settings, file: &str, dry_run: bool) -> ReserveResult<()> {
    let service = ImportService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    let path = Path::new(file);
    if !path.exists() {
        return Err(ReserveError::Import(format!("File not found: {}", file)));
    }

    let preview = service.parse_file(path)?;
    if preview.rows.is_empty() && preview.is_clean() {
        println!("No rows found in CSV file.");
        return Ok(());
    }

    println!("Import Preview for '{}'", file);
    println!("{}", "=".repeat(40));
    println!("  Rows:   {}", preview.rows.len());
    println!("  Tiers:  {}", preview.tier_names().join(", "));
    println!("  Errors: {}", preview.errors.len());
    println!();

    for row in preview.rows.iter().take(10) {
        let balance = row
            .patch
            .balance
            .map(|b| b.format_with_symbol(symbol))
            .unwrap_or_default();
        println!("  {} / {}: {}", row.tier, row.account, balance);
    }
    if preview.rows.len() > 10 {
        println!("  ... and {} more", preview.rows.len() - 10);
    }

    if !preview.is_clean() {
        println!();
        for error in &preview.errors {
            println!("  Line {}: {}", error.line, error.message);
        }
        return Err(ReserveError::Import(format!(
            "{} row(s) could not be parsed; nothing was imported",
            preview.errors.len()
        )));
    }

    if dry_run {
        println!();
        println!("Dry run: nothing was imported.");
        return Ok(());
    }

    let result = service.import(&preview)?;
    println!();
    println!("Import Complete!");
    println!("  Accounts created: {}", result.created_accounts);
    println!("  Accounts updated: {}", result.updated_accounts);
    if !result.created_tiers.is_empty() {
        println!("  Tiers created:    {}", result.created_tiers.join(", "));
    }
    Ok(())
}
