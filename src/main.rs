use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reserve_manager::backup::BackupManager;
use reserve_manager::cli::{
    handle_account_command, handle_allocate_command, handle_backup_command, handle_forecast_command,
    handle_history_command, handle_import_command, handle_project_command, handle_rebalance_command,
    handle_recurring_command, handle_status_command, handle_tier_command, AccountCommands, BackupCommands,
    HistoryArgs, RecurringCommands, TierCommands,
};
use reserve_manager::config::{paths::ReservePaths, settings::Settings};
use reserve_manager::display::format_status;
use reserve_manager::models::validation::parse_currency;
use reserve_manager::storage::{initialize_storage, Storage};

/// Environment variable holding the log filter
const LOG_ENV: &str = "RESERVE_LOG";

#[derive(Parser)]
#[command(
    name = "reserve",
    version,
    about = "Tiered cash reserve planner",
    long_about = "Plans cash reserves as prioritized tiers of accounts. New money is \
                  allocated through a waterfall that fills each tier's gap in priority \
                  order, split across the tier's accounts by weight and capped by each \
                  account's limit."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the starter six-tier plan
    Init {
        /// Overwrite an existing plan
        #[arg(long)]
        force: bool,
    },

    /// Show tiers, balances, and coverage
    Status,

    /// Preview or apply an allocation of new money
    Allocate {
        /// Amount to allocate (e.g., "5000" or "$5,000.00")
        amount: String,
        /// Break the allocation down by account
        #[arg(short, long)]
        detailed: bool,
        /// Update account balances
        #[arg(long)]
        apply: bool,
        /// Description recorded in history
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Suggest transfers from over-target tiers to under-target ones
    Rebalance,

    /// Expected interest per tier
    Forecast {
        /// Horizon in months (defaults to the configured value)
        #[arg(short, long)]
        months: Option<u32>,
    },

    /// Month-by-month projection of total reserves
    Project {
        /// Horizon in months (defaults to the configured value)
        #[arg(short, long)]
        months: Option<u32>,
        /// Monthly contribution (defaults to the configured value)
        #[arg(short, long)]
        contribution: Option<String>,
    },

    /// Tier management commands
    #[command(subcommand)]
    Tier(TierCommands),

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Show balance change history
    History(HistoryArgs),

    /// Recurring contribution commands
    #[command(subcommand)]
    Recurring(RecurringCommands),

    /// Import account balances from CSV
    Import {
        /// Path to CSV file
        file: String,
        /// Show the preview without importing
        #[arg(long)]
        dry_run: bool,
    },

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Show or change configuration
    Config {
        /// Currency symbol used in output
        #[arg(long)]
        currency: Option<String>,
        /// Default monthly contribution for projections
        #[arg(long)]
        contribution: Option<String>,
        /// Default horizon in months for forecasts and projections
        #[arg(long)]
        months: Option<u32>,
        /// Back up before every command that changes the plan
        #[arg(long)]
        auto_backup: Option<bool>,
    },
}

impl Commands {
    /// Whether the command can change the plan or recurring rules
    fn writes_data(&self) -> bool {
        match self {
            Commands::Allocate { apply, .. } => *apply,
            Commands::Tier(cmd) => !matches!(cmd, TierCommands::Show { .. }),
            Commands::Account(cmd) => !matches!(cmd, AccountCommands::Balances { .. }),
            Commands::Recurring(cmd) => !matches!(cmd, RecurringCommands::List),
            Commands::Import { dry_run, .. } => !*dry_run,
            _ => false,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = ReservePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let storage = Storage::new(paths.clone())?;

    let writes = cli.command.as_ref().is_some_and(Commands::writes_data);
    if writes && settings.auto_backup && storage.is_initialized() {
        let manager = BackupManager::new(paths.clone(), settings.backup_retention.clone());
        let (backup, _) = manager
            .create_backup_with_retention()
            .context("automatic backup failed")?;
        tracing::debug!(path = %backup.display(), "automatic backup");
    }

    match cli.command {
        Some(Commands::Init { force }) => {
            let plan = initialize_storage(&storage, force)?;
            println!("Initialized reserve plan at: {}", paths.base_dir().display());
            println!();
            print!("{}", format_status(&plan, &settings.currency_symbol));
            println!();
            println!("Add balances with 'reserve account set <tier> <account> --balance <amount>'.");
        }
        Some(Commands::Status) => handle_status_command(&storage, &settings)?,
        Some(Commands::Allocate {
            amount,
            detailed,
            apply,
            description,
        }) => handle_allocate_command(&storage, &settings, &amount, detailed, apply, description.as_deref())?,
        Some(Commands::Rebalance) => handle_rebalance_command(&storage, &settings)?,
        Some(Commands::Forecast { months }) => handle_forecast_command(&storage, &settings, months)?,
        Some(Commands::Project { months, contribution }) => {
            handle_project_command(&storage, &settings, months, contribution.as_deref())?
        }
        Some(Commands::Tier(cmd)) => handle_tier_command(&storage, &settings, cmd)?,
        Some(Commands::Account(cmd)) => handle_account_command(&storage, &settings, cmd)?,
        Some(Commands::History(args)) => handle_history_command(&storage, &settings, args)?,
        Some(Commands::Recurring(cmd)) => handle_recurring_command(&storage, &settings, cmd)?,
        Some(Commands::Import { file, dry_run }) => handle_import_command(&storage, &settings, &file, dry_run)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&paths, &settings, cmd)?,
        Some(Commands::Config {
            currency,
            contribution,
            months,
            auto_backup,
        }) => {
            let changed = currency.is_some() || contribution.is_some() || months.is_some() || auto_backup.is_some();
            if let Some(currency) = currency {
                settings.currency_symbol = currency;
            }
            if let Some(contribution) = contribution {
                settings.default_contribution = parse_currency(&contribution, "Contribution")?;
            }
            if let Some(months) = months {
                settings.forecast_months = months;
            }
            if let Some(auto_backup) = auto_backup {
                settings.auto_backup = auto_backup;
            }
            if changed {
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }

            println!("Reserve Manager Configuration");
            println!("=============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Plan file:        {}", paths.plan_file().display());
            println!("History log:      {}", paths.history_log().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:      {}", settings.currency_symbol);
            println!(
                "  Default contribution: {}",
                settings.default_contribution.format_with_symbol(&settings.currency_symbol)
            );
            println!("  Forecast months:      {}", settings.forecast_months);
            println!("  Auto backup:          {}", settings.auto_backup);
            println!(
                "  Backup retention:     {} daily, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            );
        }
        None => {
            println!("reserve - tiered cash reserve planner");
            println!();
            println!("Run 'reserve init' to create a starter plan.");
            println!("Run 'reserve --help' for usage information.");
        }
    }

    Ok(())
}
