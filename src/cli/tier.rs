//! Tier CLI commands

use clap::{Subcommand, ValueEnum};

use crate::config::settings::Settings;
use crate::display::{format_plan_details, format_tier_details};
use crate::error::ReserveResult;
use crate::models::validation::parse_currency;
use crate::models::MoveDirection;
use crate::services::PlanService;
use crate::storage::Storage;

/// Direction for `tier move`
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Direction {
    Up,
    Down,
}

impl From<Direction> for MoveDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => MoveDirection::Up,
            Direction::Down => MoveDirection::Down,
        }
    }
}

/// Tier subcommands
#[derive(Subcommand)]
pub enum TierCommands {
    /// Show one tier, or every tier, with its accounts
    Show {
        /// Tier name (all tiers when omitted)
        name: Option<String>,
    },
    /// Add an empty tier
    Add {
        /// Tier name
        name: String,
        /// What the tier is for
        #[arg(short, long, default_value = "")]
        purpose: String,
        /// Target amount (e.g., "30000" or "$30,000.00")
        #[arg(short, long, default_value = "0")]
        target: String,
        /// Priority (lower is funded first; defaults to after the last tier)
        #[arg(long)]
        priority: Option<i32>,
    },
    /// Remove a tier and its accounts
    Remove {
        /// Tier name
        name: String,
    },
    /// Change a tier's target
    SetTarget {
        /// Tier name
        name: String,
        /// New target amount
        target: String,
    },
    /// Change a tier's priority
    SetPriority {
        /// Tier name
        name: String,
        /// New priority
        #[arg(allow_hyphen_values = true)]
        priority: i32,
    },
    /// Change a tier's purpose
    SetPurpose {
        /// Tier name
        name: String,
        /// New purpose
        purpose: String,
    },
    /// Move a tier up or down in plan order
    Move {
        /// Tier name
        name: String,
        /// Direction to move
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Choose the tier that absorbs amounts beyond every target
    Overflow {
        /// Tier name
        name: Option<String>,
        /// Clear the overflow designation
        #[arg(long, conflicts_with = "name")]
        clear: bool,
    },
}

/// Handle a tier command
pub fn handle_tier_command(storage: &Storage, settings: &Settings, cmd: TierCommands) -> ReserveResult<()> {
    let service = PlanService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TierCommands::Show { name } => {
            let plan = service.load()?;
            match name {
                Some(name) => print!("{}", format_tier_details(plan.tier(&name)?, symbol)),
                None => print!("{}", format_plan_details(&plan, symbol)),
            }
        }

        TierCommands::Add {
            name,
            purpose,
            target,
            priority,
        } => {
            let target = parse_currency(&target, "Target")?;
            let priority = match priority {
                Some(p) => p,
                None => next_priority(&service)?,
            };
            let tier = service.add_tier(&name, &purpose, target, priority)?;
            println!("Added tier: {}", tier);
            println!("  Target: {}", target.format_with_symbol(symbol));
        }

        TierCommands::Remove { name } => {
            let removed = service.remove_tier(&name)?;
            println!("Removed tier: {}", removed);
            if !removed.accounts.is_empty() {
                println!("  {} account(s) removed with it", removed.accounts.len());
            }
        }

        TierCommands::SetTarget { name, target } => {
            let target = parse_currency(&target, "Target")?;
            service.set_tier_target(&name, target)?;
            println!("Target for '{}' set to {}", name, target.format_with_symbol(symbol));
        }

        TierCommands::SetPriority { name, priority } => {
            service.set_tier_priority(&name, priority)?;
            println!("Priority for '{}' set to {}", name, priority);
        }

        TierCommands::SetPurpose { name, purpose } => {
            service.set_tier_purpose(&name, &purpose)?;
            println!("Purpose for '{}' updated", name);
        }

        TierCommands::Move { name, direction } => {
            if service.move_tier(&name, direction.into())? {
                let label = match direction {
                    Direction::Up => "up",
                    Direction::Down => "down",
                };
                println!("Moved '{}' {}", name, label);
            } else {
                println!("'{}' is already at the edge of the plan", name);
            }
        }

        TierCommands::Overflow { name, clear } => match (name, clear) {
            (Some(name), false) => {
                service.set_overflow_tier(Some(&name))?;
                println!("'{}' now absorbs overflow", name);
            }
            (None, true) => {
                service.set_overflow_tier(None)?;
                println!("Overflow tier cleared; amounts beyond all targets stay unallocated");
            }
            _ => {
                let plan = service.load()?;
                match plan.overflow_tier() {
                    Some(tier) => println!("Overflow tier: {}", tier),
                    None => println!("No overflow tier set"),
                }
            }
        },
    }

    Ok(())
}

fn next_priority(service: &PlanService<'_>) -> ReserveResult<i32> {
    let plan = service.load()?;
    Ok(plan.tiers.iter().map(|t| t.priority).max().unwrap_or(0) + 1)
}
