//! CSV account import
//!
//! Reads account balances from a CSV with `Tier`, `Account`, and `Balance`
//! columns (plus optional `APY_%`, `Weight`, `Cap`, `Notes`). Parsing builds a
//! preview with per-row errors; importing refuses a preview that has any.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{ReserveError, ReserveResult};
use crate::history::{EntryKind, HistoryEntry};
use crate::models::validation::{clean_name, parse_currency, parse_percentage, parse_weight, MAX_NAME_LEN};
use crate::models::{AccountPatch, Money, Tier, UpsertOutcome};
use crate::storage::Storage;

const REQUIRED_COLUMNS: [&str; 3] = ["Tier", "Account", "Balance"];

/// One parsed CSV row
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// Line number in the file (header is line 1)
    pub line: usize,
    pub tier: String,
    pub account: String,
    pub patch: AccountPatch,
}

/// A row that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Parsed CSV ready for review
#[derive(Debug, Clone, Default)]
pub struct ImportPreview {
    pub rows: Vec<ImportRow>,
    pub errors: Vec<RowError>,
}

impl ImportPreview {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Tiers named by the rows, in first-seen order
    pub fn tier_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !names.contains(&row.tier.as_str()) {
                names.push(&row.tier);
            }
        }
        names
    }
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub created_tiers: Vec<String>,
    pub created_accounts: usize,
    pub updated_accounts: usize,
}

/// Column positions found in the header
struct Columns {
    index: HashMap<&'static str, usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> ReserveResult<Self> {
        let known = ["Tier", "Account", "Balance", "APY_%", "Weight", "Cap", "Notes"];
        let mut index = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(name) = known.iter().find(|k| k.eq_ignore_ascii_case(header.trim())) {
                index.entry(*name).or_insert(i);
            }
        }

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !index.contains_key(c))
            .collect();
        if !missing.is_empty() {
            let found: Vec<&str> = headers.iter().collect();
            return Err(ReserveError::Import(format!(
                "CSV must contain columns: {} (missing {}; found: {})",
                REQUIRED_COLUMNS.join(", "),
                missing.join(", "),
                found.join(", ")
            )));
        }
        Ok(Self { index })
    }

    /// Trimmed cell, `None` when the column is absent or the cell empty
    fn get<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.index
            .get(column)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Service for importing accounts from CSV
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse a CSV file into a preview
    pub fn parse_file(&self, path: &Path) -> ReserveResult<ImportPreview> {
        let file = std::fs::File::open(path)
            .map_err(|e| ReserveError::Import(format!("Failed to open {}: {}", path.display(), e)))?;
        self.parse_csv(file)
    }

    /// Parse CSV data into a preview
    pub fn parse_csv<R: Read>(&self, input: R) -> ReserveResult<ImportPreview> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(input);
        let columns = Columns::from_headers(reader.headers()?)?;

        let mut preview = ImportPreview::default();
        for (idx, result) in reader.records().enumerate() {
            let line = idx + 2;
            let parsed = result
                .map_err(|e| format!("Error reading CSV record: {}", e))
                .and_then(|record| Self::parse_record(&columns, &record, line));
            match parsed {
                Ok(row) => preview.rows.push(row),
                Err(message) => preview.errors.push(RowError { line, message }),
            }
        }
        Ok(preview)
    }

    fn parse_record(columns: &Columns, record: &StringRecord, line: usize) -> Result<ImportRow, String> {
        let text = |column: &str| columns.get(record, column).unwrap_or_default();

        let tier = clean_name(text("Tier"), "Tier", MAX_NAME_LEN).map_err(|e| e.to_string())?;
        let account = clean_name(text("Account"), "Account", MAX_NAME_LEN).map_err(|e| e.to_string())?;
        let balance = parse_currency(text("Balance"), "Balance").map_err(|e| e.to_string())?;

        let mut patch = AccountPatch::new().balance(balance);
        if let Some(apy) = columns.get(record, "APY_%") {
            patch = patch.apy(parse_percentage(apy, "APY_%").map_err(|e| e.to_string())?);
        }
        if let Some(weight) = columns.get(record, "Weight") {
            patch = patch.weight(parse_weight(weight).map_err(|e| e.to_string())?);
        }
        if let Some(cap) = columns.get(record, "Cap") {
            patch = patch.cap(parse_currency(cap, "Cap").map_err(|e| e.to_string())?);
        }
        if let Some(notes) = columns.get(record, "Notes") {
            patch = patch.notes(notes);
        }

        Ok(ImportRow {
            line,
            tier,
            account,
            patch,
        })
    }

    /// Apply a clean preview to the plan
    ///
    /// Missing tiers are created with a zero target after the existing ones.
    /// Balance changes are recorded in the history log.
    pub fn import(&self, preview: &ImportPreview) -> ReserveResult<ImportResult> {
        if let Some(first) = preview.errors.first() {
            return Err(ReserveError::Import(format!(
                "{} row(s) have errors; first at line {}: {}",
                preview.errors.len(),
                first.line,
                first.message
            )));
        }

        let mut plan = self.storage.load_plan()?;
        let mut result = ImportResult::default();
        let mut entries = Vec::new();

        for row in &preview.rows {
            if plan.find_tier(&row.tier).is_none() {
                let priority = plan.tiers.len() as i32 + 1;
                let tier = Tier::new(&row.tier, format!("Imported tier for {}", row.tier), Money::zero(), priority);
                plan.add_tier(tier)?;
                result.created_tiers.push(row.tier.clone());
            }

            let tier = plan.tier_mut(&row.tier)?;
            let before = tier.account(&row.account).map(|a| a.balance).unwrap_or_default();
            match tier.add_or_update_account(&row.account, &row.patch)? {
                UpsertOutcome::Created => result.created_accounts += 1,
                UpsertOutcome::Updated => result.updated_accounts += 1,
            }

            let after = tier.require_account(&row.account)?.balance;
            if after != before {
                entries.push(
                    HistoryEntry::new(EntryKind::Import, &row.tier, &row.account, after - before, after)
                        .with_description("CSV import"),
                );
            }
        }

        self.storage.save_plan(&mut plan)?;
        self.storage.history.record_batch(&entries)?;

        tracing::info!(
            created_tiers = result.created_tiers.len(),
            created = result.created_accounts,
            updated = result.updated_accounts,
            "imported accounts"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::ReservePaths;
    use crate::models::CapChange;
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReservePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        initialize_storage(&storage, false).unwrap();
        (temp_dir, storage)
    }

    const SAMPLE: &str = "\
Tier,Account,Balance,APY_%,Weight,Cap,Notes
Tier 1,Checking,\"$2,500.00\",0.05,,,Bills
Tier 2,I-Bonds,1000,4.3,2,\"$10,000\",TreasuryDirect
Brokerage,Index Fund,15000.50,,,,
";

    #[test]
    fn test_parse_csv() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let preview = service.parse_csv(SAMPLE.as_bytes()).unwrap();
        assert!(preview.is_clean());
        assert_eq!(preview.rows.len(), 3);
        assert_eq!(preview.tier_names(), vec!["Tier 1", "Tier 2", "Brokerage"]);

        let first = &preview.rows[0];
        assert_eq!(first.line, 2);
        assert_eq!(first.patch.balance, Some(Money::from_cents(250_000)));
        assert_eq!(first.patch.alloc_weight, None);
        assert_eq!(first.patch.cap, CapChange::Keep);

        let second = &preview.rows[1];
        assert_eq!(second.patch.cap, CapChange::Set(Money::from_cents(1_000_000)));
        assert_eq!(second.patch.alloc_weight, Some(2.0));
    }

    #[test]
    fn test_missing_required_column() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let err = service.parse_csv("Tier,Account\nTier 1,Checking\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ReserveError::Import(_)));
        assert!(err.to_string().contains("Balance"));
    }

    #[test]
    fn test_row_errors_block_import() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let preview = service
            .parse_csv("Tier,Account,Balance\nTier 1,Checking,lots\nTier 1,Savings,-5\n".as_bytes())
            .unwrap();
        assert_eq!(preview.errors.len(), 2);
        assert_eq!(preview.errors[0].line, 2);
        assert_eq!(preview.errors[1].line, 3);

        assert!(service.import(&preview).is_err());
        assert_eq!(storage.load_plan().unwrap().total_reserves(), Money::zero());
    }

    #[test]
    fn test_import_creates_tiers_and_accounts() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let preview = service.parse_csv(SAMPLE.as_bytes()).unwrap();
        let result = service.import(&preview).unwrap();
        assert_eq!(result.created_tiers, vec!["Brokerage"]);
        assert_eq!(result.created_accounts, 2);
        assert_eq!(result.updated_accounts, 1);

        let plan = storage.load_plan().unwrap();
        let brokerage = plan.tier("Brokerage").unwrap();
        assert_eq!(brokerage.purpose, "Imported tier for Brokerage");
        assert_eq!(brokerage.priority, 7);
        assert_eq!(brokerage.target, Money::zero());

        let checking = plan.account("Tier 1", "Checking").unwrap();
        assert_eq!(checking.balance, Money::from_cents(250_000));
        assert_eq!(checking.apy_pct, 0.05);
        assert_eq!(checking.notes, "Bills");

        let bonds = plan.account("Tier 2", "I-Bonds").unwrap();
        assert_eq!(bonds.account_target, Some(Money::from_cents(1_000_000)));
        assert_eq!(storage.history.entry_count().unwrap(), 3);
    }
}
