//! Storage layer for the reserve manager
//!
//! JSON file storage with atomic writes. The plan goes through the
//! [`PlanStore`] contract; recurring rules and history have their own files.

pub mod file_io;
pub mod init;
pub mod plan;
pub mod recurring;

pub use file_io::{read_json, read_json_required, write_json_atomic};
pub use init::initialize_storage;
pub use plan::{JsonPlanStore, MemoryPlanStore, PlanStore};
pub use recurring::{RecurringData, RecurringRepository};

use crate::config::paths::ReservePaths;
use crate::error::ReserveResult;
use crate::history::HistoryLog;
use crate::models::Plan;

/// Storage coordinator handed to every service
pub struct Storage {
    paths: ReservePaths,
    plan: Box<dyn PlanStore>,
    pub recurring: RecurringRepository,
    pub history: HistoryLog,
}

impl Storage {
    /// Open file-backed storage under `paths`
    pub fn new(paths: ReservePaths) -> ReserveResult<Self> {
        let store = JsonPlanStore::new(paths.plan_file());
        Self::with_plan_store(paths, Box::new(store))
    }

    /// Open storage with a custom plan backend
    pub fn with_plan_store(paths: ReservePaths, plan: Box<dyn PlanStore>) -> ReserveResult<Self> {
        paths.ensure_directories()?;

        let storage = Self {
            recurring: RecurringRepository::new(paths.recurring_file()),
            history: HistoryLog::new(paths.history_log()),
            plan,
            paths,
        };
        storage.recurring.load()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &ReservePaths {
        &self.paths
    }

    /// Load the current plan
    pub fn load_plan(&self) -> ReserveResult<Plan> {
        self.plan.load()
    }

    /// Validate, stamp, and persist a plan
    pub fn save_plan(&self, plan: &mut Plan) -> ReserveResult<()> {
        plan.validate()?;
        plan.touch();
        self.plan.save(plan)
    }

    /// Whether a plan has been saved
    pub fn is_initialized(&self) -> bool {
        self.plan.exists()
    }
}
