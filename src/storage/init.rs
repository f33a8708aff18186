//! Storage initialization
//!
//! First-run setup: directories, settings, and the starter plan.

use crate::config::settings::Settings;
use crate::error::{ReserveError, ReserveResult};
use crate::models::Plan;

use super::Storage;

/// Write the starter plan (and default settings if missing)
///
/// Refuses to replace an existing plan unless `force` is set.
pub fn initialize_storage(storage: &Storage, force: bool) -> ReserveResult<Plan> {
    let paths = storage.paths();
    paths.ensure_directories()?;

    if storage.is_initialized() && !force {
        return Err(ReserveError::Config(format!(
            "A plan already exists at {}. Use --force to overwrite it.",
            paths.plan_file().display()
        )));
    }

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }

    let mut plan = Plan::starter();
    storage.save_plan(&mut plan)?;
    tracing::info!(tiers = plan.tiers.len(), force, "initialized plan");
    Ok(plan)
}
