use anyhow::Result;
use clap::{Parser, Subcommand};

use budget_planner::cli::{
    handle_asset_command, handle_bill_command, handle_category_command, handle_expense_command,
    handle_income_command, handle_liability_command, handle_planner_command,
    handle_scenario_command, handle_status_command, handle_totals_command, parse_scenario,
    resolve_planner, AssetCommands, BillCommands, CategoryCommands, ExpenseCommands, IncomeCommands,
    LiabilityCommands, PlannerCommands, ScenarioCommands, TotalsArgs,
};
use budget_planner::config::{paths::PlannerPaths, settings::Settings};
use budget_planner::logging::init_tracing;
use budget_planner::services::PlannerService;
use budget_planner::storage::{initialize_storage, seed_demo_planner, Storage};

#[derive(Parser)]
#[command(
    name = "budget-planner",
    version,
    about = "Multi-scenario household budget planner",
    long_about = "budget-planner keeps assets, liabilities, income, expenses and bills \
                  for one or more household plans, and computes monthly cash flow under \
                  what-if scenarios. Switching an asset off also switches off everything \
                  that depends on it."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and empty data files
    Init,

    /// Show or change configuration
    Config {
        /// Currency symbol used when printing amounts
        #[arg(long)]
        currency: Option<String>,
        /// Planner used when a command omits --planner
        #[arg(long)]
        default_planner: Option<String>,
        /// Scenario selector used when a command omits --scenario
        #[arg(long)]
        default_scenario: Option<String>,
        /// Log filter used when BUDGET_PLANNER_LOG is unset
        #[arg(long)]
        log_level: Option<String>,
    },

    /// Create the demo planner with sample data
    Seed,

    /// Planner management commands
    #[command(subcommand)]
    Planner(PlannerCommands),

    /// Scenario management commands
    Scenario {
        /// Planner name or ID
        #[arg(short, long, global = true)]
        planner: Option<String>,
        #[command(subcommand)]
        cmd: ScenarioCommands,
    },

    /// Category management commands
    Category {
        /// Planner name or ID
        #[arg(short, long, global = true)]
        planner: Option<String>,
        #[command(subcommand)]
        cmd: CategoryCommands,
    },

    /// Asset commands
    Asset {
        /// Planner name or ID
        #[arg(short, long, global = true)]
        planner: Option<String>,
        #[command(subcommand)]
        cmd: AssetCommands,
    },

    /// Liability commands
    Liability {
        /// Planner name or ID
        #[arg(short, long, global = true)]
        planner: Option<String>,
        #[command(subcommand)]
        cmd: LiabilityCommands,
    },

    /// Income commands
    Income {
        /// Planner name or ID
        #[arg(short, long, global = true)]
        planner: Option<String>,
        #[command(subcommand)]
        cmd: IncomeCommands,
    },

    /// Expense commands
    Expense {
        /// Planner name or ID
        #[arg(short, long, global = true)]
        planner: Option<String>,
        #[command(subcommand)]
        cmd: ExpenseCommands,
    },

    /// Bill commands
    Bill {
        /// Planner name or ID
        #[arg(short, long, global = true)]
        planner: Option<String>,
        #[command(subcommand)]
        cmd: BillCommands,
    },

    /// Monthly totals for a planner
    Totals(TotalsArgs),

    /// Items of one kind with their effective status
    Status {
        /// Planner name or ID
        planner: String,
        /// Item kind (asset, liability, income, expense, bill)
        kind: String,
        /// Scenario selector
        #[arg(short, long)]
        scenario: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = PlannerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    init_tracing(Some(settings.log_level.as_str()));

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing budget-planner at: {}", paths.base_dir().display());
            let created = initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete! ({} data files created)", created);
            println!();
            println!("Run 'budget-planner seed' to create a demo planner, or");
            println!("'budget-planner planner create <name>' to start your own.");
        }
        Some(Commands::Config {
            currency,
            default_planner,
            default_scenario,
            log_level,
        }) => {
            let changed = currency.is_some()
                || default_planner.is_some()
                || default_scenario.is_some()
                || log_level.is_some();
            if let Some(currency) = currency {
                settings.currency_symbol = currency;
            }
            if let Some(planner) = default_planner {
                let planner = PlannerService::new(&storage).require(&planner)?;
                settings.default_planner = Some(planner.name);
            }
            if let Some(scenario) = default_scenario {
                settings.default_scenario = parse_scenario(&scenario)?;
            }
            if let Some(level) = log_level {
                settings.log_level = level;
            }
            if changed {
                settings.save(&paths)?;
            }

            println!("budget-planner Configuration");
            println!("============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!(
                "  Default planner:  {}",
                settings.default_planner.as_deref().unwrap_or("(none)")
            );
            println!("  Default scenario: {}", settings.default_scenario);
            println!("  Log level:        {}", settings.log_level);
        }
        Some(Commands::Seed) => {
            let planner = seed_demo_planner(&storage)?;
            if settings.default_planner.is_none() {
                settings.default_planner = Some(planner.name.clone());
                settings.save(&paths)?;
            }
            println!("Created demo planner: {}", planner.name);
            println!("  Scenarios: {}", planner.scenarios.len());
            println!("  ID: {}", planner.id);
            println!();
            println!("Run 'budget-planner totals \"{}\"' to see its cash flow.", planner.name);
        }
        Some(Commands::Planner(cmd)) => {
            handle_planner_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Scenario { planner, cmd }) => {
            let planner = resolve_planner(&storage, &settings, planner.as_deref())?;
            handle_scenario_command(&storage, &planner, cmd)?;
        }
        Some(Commands::Category { planner, cmd }) => {
            let planner = resolve_planner(&storage, &settings, planner.as_deref())?;
            handle_category_command(&storage, &planner, cmd)?;
        }
        Some(Commands::Asset { planner, cmd }) => {
            let planner = resolve_planner(&storage, &settings, planner.as_deref())?;
            handle_asset_command(&storage, &settings, &planner, cmd)?;
        }
        Some(Commands::Liability { planner, cmd }) => {
            let planner = resolve_planner(&storage, &settings, planner.as_deref())?;
            handle_liability_command(&storage, &settings, &planner, cmd)?;
        }
        Some(Commands::Income { planner, cmd }) => {
            let planner = resolve_planner(&storage, &settings, planner.as_deref())?;
            handle_income_command(&storage, &settings, &planner, cmd)?;
        }
        Some(Commands::Expense { planner, cmd }) => {
            let planner = resolve_planner(&storage, &settings, planner.as_deref())?;
            handle_expense_command(&storage, &settings, &planner, cmd)?;
        }
        Some(Commands::Bill { planner, cmd }) => {
            let planner = resolve_planner(&storage, &settings, planner.as_deref())?;
            handle_bill_command(&storage, &settings, &planner, cmd)?;
        }
        Some(Commands::Totals(args)) => {
            let planner = PlannerService::new(&storage).require(&args.planner)?;
            handle_totals_command(&storage, &settings, &planner, args)?;
        }
        Some(Commands::Status {
            planner,
            kind,
            scenario,
            json,
        }) => {
            let planner = PlannerService::new(&storage).require(&planner)?;
            handle_status_command(&storage, &settings, &planner, &kind, scenario.as_deref(), json)?;
        }
        None => {
            println!("budget-planner - multi-scenario household budget planner");
            println!();
            println!("Run 'budget-planner --help' for usage information.");
        }
    }

    Ok(())
}
