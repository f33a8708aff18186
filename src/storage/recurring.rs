//! Recurring contribution repository
//!
//! Manages loading and saving recurring rules to recurring.json

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::error::{ReserveError, ReserveResult};
use crate::models::{RecurringContribution, RecurringId};

use super::file_io::{read_json, write_json_atomic};

/// On-disk layout of recurring.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecurringData {
    #[serde(default)]
    pub rules: Vec<RecurringContribution>,
}

/// Repository for recurring contribution rules, kept in creation order
pub struct RecurringRepository {
    path: PathBuf,
    data: RwLock<Vec<RecurringContribution>>,
}

impl RecurringRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> ReserveResult<RwLockReadGuard<'_, Vec<RecurringContribution>>> {
        self.data
            .read()
            .map_err(|e| ReserveError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> ReserveResult<RwLockWriteGuard<'_, Vec<RecurringContribution>>> {
        self.data
            .write()
            .map_err(|e| ReserveError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load rules from disk (missing file means no rules)
    pub fn load(&self) -> ReserveResult<()> {
        let file_data: RecurringData = read_json(&self.path)?;
        *self.write()? = file_data.rules;
        Ok(())
    }

    /// Save rules to disk
    pub fn save(&self) -> ReserveResult<()> {
        let file_data = RecurringData {
            rules: self.read()?.clone(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get_all(&self) -> ReserveResult<Vec<RecurringContribution>> {
        Ok(self.read()?.clone())
    }

    pub fn get(&self, id: RecurringId) -> ReserveResult<Option<RecurringContribution>> {
        Ok(self.read()?.iter().find(|r| r.id == id).cloned())
    }

    /// Resolve user input (ID, ID prefix, or exact name) to a single rule
    pub fn find(&self, input: &str) -> ReserveResult<RecurringContribution> {
        let data = self.read()?;
        let mut matches = data
            .iter()
            .filter(|r| r.id.matches(input) || r.name.eq_ignore_ascii_case(input.trim()));

        let first = matches
            .next()
            .ok_or_else(|| ReserveError::recurring_not_found(input))?;
        if matches.next().is_some() {
            return Err(ReserveError::Validation(format!(
                "'{}' matches more than one recurring contribution; use the ID",
                input
            )));
        }
        Ok(first.clone())
    }

    /// Insert a new rule or replace the one with the same ID
    pub fn upsert(&self, rule: RecurringContribution) -> ReserveResult<()> {
        let mut data = self.write()?;
        match data.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => *existing = rule,
            None => data.push(rule),
        }
        Ok(())
    }

    pub fn delete(&self, id: RecurringId) -> ReserveResult<bool> {
        let mut data = self.write()?;
        let before = data.len();
        data.retain(|r| r.id != id);
        Ok(data.len() != before)
    }

    /// Replace every rule at once
    pub fn replace_all(&self, rules: Vec<RecurringContribution>) -> ReserveResult<()> {
        *self.write()? = rules;
        Ok(())
    }

    pub fn count(&self) -> ReserveResult<usize> {
        Ok(self.read()?.len())
    }
}
