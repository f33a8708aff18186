//! Top-level reserve commands
//!
//! Status, allocation, rebalancing, forecast, and projection. Only
//! `allocate --apply` writes to the plan.

use crate::config::settings::Settings;
use crate::display::{
    format_allocation_plan, format_detailed_allocation, format_forecast, format_projection,
    format_rebalancing, format_status,
};
use crate::error::{ReserveError, ReserveResult};
use crate::models::validation::parse_currency;
use crate::models::MAX_PROJECTION_MONTHS;
use crate::services::{AllocationService, PlanService};
use crate::storage::Storage;

/// Print the status table
pub fn handle_status_command(storage: &Storage, settings: &Settings) -> ReserveResult<()> {
    let plan = PlanService::new(storage).load()?;
    print!("{}", format_status(&plan, &settings.currency_symbol));
    Ok(())
}

/// Preview (and optionally apply) an allocation
pub fn handle_allocate_command(
    storage: &Storage,
    settings: &Settings,
    amount: &str,
    detailed: bool,
    apply: bool,
    description: Option<&str>,
) -> ReserveResult<()> {
    let amount = parse_currency(amount, "Amount")?;
    let service = AllocationService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    if !apply {
        if detailed {
            print!("{}", format_detailed_allocation(&service.preview_detailed(amount)?, symbol));
        } else {
            print!("{}", format_allocation_plan(&service.preview(amount)?, symbol));
        }
        println!();
        println!("Preview only. Run again with --apply to update balances.");
        return Ok(());
    }

    let applied = service.allocate(amount, description)?;
    print!("{}", format_detailed_allocation(&applied.allocation, symbol));
    println!();
    println!("Applied {} move(s).", applied.entries.len());
    Ok(())
}

/// Print suggested transfers between tiers
pub fn handle_rebalance_command(storage: &Storage, settings: &Settings) -> ReserveResult<()> {
    let moves = AllocationService::new(storage).rebalance()?;
    println!("{}", format_rebalancing(&moves, &settings.currency_symbol).trim_end());
    Ok(())
}

/// Print expected growth per tier
pub fn handle_forecast_command(storage: &Storage, settings: &Settings, months: Option<u32>) -> ReserveResult<()> {
    let months = months.unwrap_or(settings.forecast_months);
    let months = i32::try_from(months)
        .map_err(|_| ReserveError::Validation(format!("Too many months: {}", months)))?;

    let plan = PlanService::new(storage).load()?;
    print!("{}", format_forecast(&plan.forecast(months), &settings.currency_symbol));
    Ok(())
}

/// Print a month-by-month projection
pub fn handle_project_command(
    storage: &Storage,
    settings: &Settings,
    months: Option<u32>,
    contribution: Option<&str>,
) -> ReserveResult<()> {
    let months = months.unwrap_or(settings.forecast_months);
    if months > MAX_PROJECTION_MONTHS {
        return Err(ReserveError::Validation(format!(
            "Projection horizon of {} months is too long (max: {})",
            months, MAX_PROJECTION_MONTHS
        )));
    }
    let contribution = match contribution {
        Some(c) => parse_currency(c, "Contribution")?,
        None => settings.default_contribution,
    };

    let plan = PlanService::new(storage).load()?;
    println!(
        "{}",
        format_projection(&plan.projection(months, contribution), &settings.currency_symbol).trim_end()
    );
    Ok(())
}
