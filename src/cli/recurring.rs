//! Recurring contribution CLI commands

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_recurring_list;
use crate::error::{ReserveError, ReserveResult};
use crate::models::validation::parse_currency;
use crate::models::{Frequency, RecurringContribution};
use crate::services::RecurringService;
use crate::storage::Storage;

/// Recurring subcommands
#[derive(Subcommand)]
pub enum RecurringCommands {
    /// Add a recurring contribution into an account
    Add {
        /// Rule name
        name: String,
        /// Tier name
        tier: String,
        /// Account name
        account: String,
        /// Amount per period
        amount: String,
        /// daily, weekly, biweekly, monthly, quarterly, or annually
        #[arg(short, long, default_value = "monthly")]
        frequency: String,
        /// First due date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        start: Option<String>,
        /// Description added to history entries
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List recurring contributions
    List,
    /// Remove a rule by ID, ID prefix, or name
    Remove {
        /// Rule ID or name
        rule: String,
    },
    /// Resume a disabled rule
    Enable {
        /// Rule ID or name
        rule: String,
    },
    /// Pause a rule without removing it
    Disable {
        /// Rule ID or name
        rule: String,
    },
    /// Apply every rule that is due
    Process {
        /// Process as of this date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
}

fn parse_date(value: Option<&str>) -> ReserveResult<NaiveDate> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| ReserveError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", s))),
        None => Ok(Local::now().date_naive()),
    }
}

/// Handle a recurring command
pub fn handle_recurring_command(storage: &Storage, settings: &Settings, cmd: RecurringCommands) -> ReserveResult<()> {
    let service = RecurringService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        RecurringCommands::Add {
            name,
            tier,
            account,
            amount,
            frequency,
            start,
            description,
        } => {
            let amount = parse_currency(&amount, "Amount")?;
            let frequency: Frequency = frequency.parse()?;
            let start = parse_date(start.as_deref())?;

            let mut rule = RecurringContribution::new(&name, &tier, &account, amount, frequency, start)?;
            if let Some(description) = description {
                rule = rule.with_description(description);
            }
            let rule = service.add(rule)?;
            println!("Added recurring contribution: {}", rule);
            println!("  ID: {}", rule.id);
            println!("  Next due: {}", rule.next_date);
        }

        RecurringCommands::List => {
            println!("{}", format_recurring_list(&service.list()?, symbol).trim_end());
        }

        RecurringCommands::Remove { rule } => {
            let removed = service.remove(&rule)?;
            println!("Removed recurring contribution: {}", removed.name);
        }

        RecurringCommands::Enable { rule } => {
            let rule = service.set_enabled(&rule, true)?;
            println!("Enabled: {}", rule.name);
        }

        RecurringCommands::Disable { rule } => {
            let rule = service.set_enabled(&rule, false)?;
            println!("Disabled: {}", rule.name);
        }

        RecurringCommands::Process { date } => {
            let today = parse_date(date.as_deref())?;
            let processed = service.process_due(today)?;
            if processed.is_empty() {
                println!("No recurring contributions due.");
                return Ok(());
            }
            for p in &processed {
                println!(
                    "  {} ({}): {} -> {} / {} (balance {})",
                    p.name,
                    p.due,
                    p.amount.format_with_symbol(symbol),
                    p.tier,
                    p.account,
                    p.balance_after.format_with_symbol(symbol)
                );
            }
            println!("Processed {} contribution(s).", processed.len());
        }
    }

    Ok(())
}
