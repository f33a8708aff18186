//! Plan persistence
//!
//! The engine only depends on [`PlanStore`]; the CLI uses the JSON file
//! backend and tests can swap in the in-memory one.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{ReserveError, ReserveResult};
use crate::models::Plan;

use super::file_io::{read_json_required, write_json_atomic};

/// Load/save contract for a single plan
pub trait PlanStore: Send + Sync {
    /// Load the stored plan; fails if nothing has been saved yet
    fn load(&self) -> ReserveResult<Plan>;

    /// Replace the stored plan
    fn save(&self, plan: &Plan) -> ReserveResult<()>;

    /// Whether a plan has been saved
    fn exists(&self) -> bool;
}

fn not_initialized() -> ReserveError {
    ReserveError::Config("No plan found. Run 'reserve init' first.".into())
}

/// Plan stored as pretty-printed JSON
pub struct JsonPlanStore {
    path: PathBuf,
}

impl JsonPlanStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlanStore for JsonPlanStore {
    fn load(&self) -> ReserveResult<Plan> {
        if !self.path.exists() {
            return Err(not_initialized());
        }
        read_json_required(&self.path)
    }

    fn save(&self, plan: &Plan) -> ReserveResult<()> {
        write_json_atomic(&self.path, plan)
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Plan held in memory
#[derive(Default)]
pub struct MemoryPlanStore {
    plan: RwLock<Option<Plan>>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a saved plan
    pub fn with_plan(plan: Plan) -> Self {
        Self {
            plan: RwLock::new(Some(plan)),
        }
    }
}

impl PlanStore for MemoryPlanStore {
    fn load(&self) -> ReserveResult<Plan> {
        let plan = self
            .plan
            .read()
            .map_err(|e| ReserveError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        plan.clone().ok_or_else(not_initialized)
    }

    fn save(&self, plan: &Plan) -> ReserveResult<()> {
        let mut slot = self
            .plan
            .write()
            .map_err(|e| ReserveError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *slot = Some(plan.clone());
        Ok(())
    }

    fn exists(&self) -> bool {
        self.plan.read().map(|p| p.is_some()).unwrap_or(false)
    }
}
