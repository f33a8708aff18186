//! Account CLI commands
//!
//! Accounts are addressed by tier name and account name.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_balance_history;
use crate::error::{ReserveError, ReserveResult};
use crate::models::validation::{parse_currency, parse_percentage, parse_weight};
use crate::models::{AccountPatch, UpsertOutcome};
use crate::services::PlanService;
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create an account or update the given fields of an existing one
    Set {
        /// Tier name
        tier: String,
        /// Account name
        account: String,
        /// Current balance
        #[arg(short, long)]
        balance: Option<String>,
        /// Annual yield in percent (e.g., "4.25")
        #[arg(short, long)]
        apy: Option<String>,
        /// Allocation weight within the tier
        #[arg(short, long)]
        weight: Option<String>,
        /// Maximum balance this account should hold
        #[arg(short, long)]
        cap: Option<String>,
        /// Remove the account's cap
        #[arg(long, conflicts_with = "cap")]
        clear_cap: bool,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Remove an account from its tier
    Remove {
        /// Tier name
        tier: String,
        /// Account name
        account: String,
    },
    /// Make an account the first to be filled in its tier
    Prefer {
        /// Tier name
        tier: String,
        /// Account name
        account: Option<String>,
        /// Clear the preferred account
        #[arg(long, conflicts_with = "account")]
        clear: bool,
    },
    /// Change an account's allocation weight
    Weight {
        /// Tier name
        tier: String,
        /// Account name
        account: String,
        /// New weight
        weight: String,
    },
    /// Set or clear an account's cap
    Cap {
        /// Tier name
        tier: String,
        /// Account name
        account: String,
        /// New cap
        cap: Option<String>,
        /// Remove the cap
        #[arg(long, conflicts_with = "cap")]
        clear: bool,
    },
    /// Show how an account's balance changed over time
    Balances {
        /// Tier name
        tier: String,
        /// Account name
        account: String,
        /// Only changes within the last N days
        #[arg(short, long)]
        days: Option<i64>,
    },
}

/// Handle an account command
pub fn handle_account_command(storage: &Storage, settings: &Settings, cmd: AccountCommands) -> ReserveResult<()> {
    let service = PlanService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        AccountCommands::Set {
            tier,
            account,
            balance,
            apy,
            weight,
            cap,
            clear_cap,
            notes,
        } => {
            let mut patch = AccountPatch::new();
            if let Some(balance) = balance {
                patch = patch.balance(parse_currency(&balance, "Balance")?);
            }
            if let Some(apy) = apy {
                patch = patch.apy(parse_percentage(&apy, "APY")?);
            }
            if let Some(weight) = weight {
                patch = patch.weight(parse_weight(&weight)?);
            }
            if let Some(cap) = cap {
                patch = patch.cap(parse_currency(&cap, "Cap")?);
            }
            if clear_cap {
                patch = patch.clear_cap();
            }
            if let Some(notes) = notes {
                patch = patch.notes(notes);
            }

            match service.upsert_account(&tier, &account, &patch)? {
                UpsertOutcome::Created => println!("Created account '{}' in '{}'", account.trim(), tier),
                UpsertOutcome::Updated => println!("Updated account '{}' in '{}'", account.trim(), tier),
            }
            let plan = service.load()?;
            let saved = plan.account(&tier, account.trim())?;
            println!("  Balance: {}", saved.balance.format_with_symbol(symbol));
        }

        AccountCommands::Remove { tier, account } => {
            service.remove_account(&tier, &account)?;
            println!("Removed account '{}' from '{}'", account, tier);
        }

        AccountCommands::Prefer { tier, account, clear } => {
            if account.is_none() && !clear {
                return Err(ReserveError::Validation(
                    "Give an account name or --clear".into(),
                ));
            }
            service.set_preferred(&tier, account.as_deref())?;
            match account {
                Some(account) => println!("'{}' is now the preferred account of '{}'", account, tier),
                None => println!("Cleared the preferred account of '{}'", tier),
            }
        }

        AccountCommands::Weight { tier, account, weight } => {
            let weight = parse_weight(&weight)?;
            service.set_weight(&tier, &account, weight)?;
            println!("Weight for '{}' set to {}", account, weight);
        }

        AccountCommands::Cap {
            tier,
            account,
            cap,
            clear,
        } => {
            let cap = match (cap, clear) {
                (Some(cap), _) => Some(parse_currency(&cap, "Cap")?),
                (None, true) => None,
                (None, false) => {
                    return Err(ReserveError::Validation("Give a cap amount or --clear".into()));
                }
            };
            service.set_cap(&tier, &account, cap)?;
            match cap {
                Some(cap) => println!("Cap for '{}' set to {}", account, cap.format_with_symbol(symbol)),
                None => println!("Cap for '{}' removed", account),
            }
        }

        AccountCommands::Balances { tier, account, days } => {
            service.load()?.account(&tier, &account)?;
            let since = days.map(|d| chrono::Utc::now() - chrono::Duration::days(d));
            let points = storage.history.balance_history(&tier, &account, since)?;
            print!("{}", format_balance_history(&points, symbol));
            if points.is_empty() {
                println!();
            }
        }
    }

    Ok(())
}
