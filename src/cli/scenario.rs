//! Scenario CLI commands

use clap::Subcommand;

use crate::display::format_scenario_list;
use crate::error::PlannerResult;
use crate::models::Planner;
use crate::services::PlannerService;
use crate::storage::Storage;

/// Scenario subcommands
#[derive(Subcommand)]
pub enum ScenarioCommands {
    /// Define a scenario on the planner
    Add {
        /// Identifier items are tagged with (letters and digits, e.g. "B")
        scenario: String,
        /// Friendly name
        name: String,
        /// Month in which assets are sold (0 = never)
        #[arg(short = 'm', long, default_value = "0")]
        sale_month: u8,
    },
    /// List the planner's scenarios
    List,
    /// Change a scenario's name or sale month
    #[command(alias = "rename")]
    Update {
        /// Scenario identifier
        scenario: String,
        /// New friendly name
        #[arg(short, long)]
        name: Option<String>,
        /// New sale month
        #[arg(short = 'm', long)]
        sale_month: Option<u8>,
    },
    /// Remove a scenario no item is tagged with
    Remove {
        /// Scenario identifier
        scenario: String,
    },
}

/// Handle a scenario command
pub fn handle_scenario_command(
    storage: &Storage,
    planner: &Planner,
    cmd: ScenarioCommands,
) -> PlannerResult<()> {
    let service = PlannerService::new(storage);
    let planner_id = planner.id.to_string();

    match cmd {
        ScenarioCommands::Add {
            scenario,
            name,
            sale_month,
        } => {
            let definition = service.add_scenario(&planner_id, &scenario, &name, sale_month)?;
            println!(
                "Added scenario {} ({}) to {}",
                definition.scenario, definition.display_name, planner.name
            );
        }

        ScenarioCommands::List => {
            let scenarios = service.list_scenarios(&planner_id)?;
            print!("{}", format_scenario_list(&scenarios));
        }

        ScenarioCommands::Update {
            scenario,
            name,
            sale_month,
        } => {
            if name.is_none() && sale_month.is_none() {
                println!("No changes specified. Use --name or --sale-month.");
                return Ok(());
            }
            let definition =
                service.update_scenario(&planner_id, &scenario, name.as_deref(), sale_month)?;
            println!(
                "Updated scenario {}: {} (sale month {})",
                definition.scenario, definition.display_name, definition.sale_month
            );
        }

        ScenarioCommands::Remove { scenario } => {
            let removed = service.remove_scenario(&planner_id, &scenario)?;
            println!("Removed scenario {}", removed.scenario);
        }
    }

    Ok(())
}
