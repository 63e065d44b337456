//! Planner CLI commands

use clap::Subcommand;

use super::{parse_money, resolve_scenario};
use crate::config::settings::Settings;
use crate::display::{format_planner_details, format_planner_list};
use crate::error::PlannerResult;
use crate::services::{PlannerService, TotalsService};
use crate::storage::Storage;

/// Planner subcommands
#[derive(Subcommand)]
pub enum PlannerCommands {
    /// Create a new planner
    Create {
        /// Planner name
        name: String,
        /// Starting cash (e.g., "10000.00" or "10000")
        #[arg(short, long, default_value = "0")]
        cash: String,
    },
    /// List all planners
    List,
    /// Show a planner with its scenarios and totals
    Show {
        /// Planner name or ID
        planner: String,
        /// Scenario selector for the totals line
        #[arg(short, long)]
        scenario: Option<String>,
    },
    /// Rename a planner or change its starting cash
    Edit {
        /// Planner name or ID
        planner: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New starting cash
        #[arg(short, long)]
        cash: Option<String>,
    },
    /// Delete a planner and all of its items
    Remove {
        /// Planner name or ID
        planner: String,
    },
}

/// Handle a planner command
pub fn handle_planner_command(
    storage: &Storage,
    settings: &Settings,
    cmd: PlannerCommands,
) -> PlannerResult<()> {
    let service = PlannerService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        PlannerCommands::Create { name, cash } => {
            let planner = service.create(&name, parse_money(&cash)?)?;

            println!("Created planner: {}", planner.name);
            println!("  Starting Cash: {}", planner.starting_cash.format_with_symbol(symbol));
            println!("  ID: {}", planner.id);
        }

        PlannerCommands::List => {
            let planners = service.list()?;
            print!("{}", format_planner_list(&planners, symbol));
        }

        PlannerCommands::Show { planner, scenario } => {
            let found = service.require(&planner)?;
            let scenario = resolve_scenario(settings, scenario.as_deref())?;
            let totals = TotalsService::new(storage).compute_monthly_totals(found.id, &scenario)?;
            print!("{}", format_planner_details(&found, &totals, symbol));
        }

        PlannerCommands::Edit { planner, name, cash } => {
            if name.is_none() && cash.is_none() {
                println!("No changes specified. Use --name or --cash.");
                return Ok(());
            }
            let cash = cash.as_deref().map(parse_money).transpose()?;
            let updated = service.update(&planner, name.as_deref(), cash)?;
            println!("Updated planner: {}", updated.name);
        }

        PlannerCommands::Remove { planner } => {
            let (removed, count) = service.remove(&planner)?;
            println!("Removed planner: {} ({} records deleted)", removed.name, count);
        }
    }

    Ok(())
}
