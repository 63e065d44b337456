//! Totals and status CLI commands

use std::fs::File;
use std::io::BufWriter;

use clap::Args;

use super::{resolve_scenario, items::print_effective_list};
use crate::config::settings::Settings;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{ItemKind, Planner};
use crate::reports::CashFlowReport;
use crate::storage::Storage;

/// Arguments of the `totals` command
#[derive(Args)]
pub struct TotalsArgs {
    /// Planner name or ID
    pub planner: String,
    /// Scenario selector (ALL or a scenario identifier)
    #[arg(short, long)]
    pub scenario: Option<String>,
    /// Print the monthly totals as JSON
    #[arg(long)]
    pub json: bool,
    /// With --json, include every item and its effective status
    #[arg(long, requires = "json")]
    pub items: bool,
    /// Write the cash-flow report to a CSV file
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Handle the `totals` command
pub fn handle_totals_command(
    storage: &Storage,
    settings: &Settings,
    planner: &Planner,
    args: TotalsArgs,
) -> PlannerResult<()> {
    let scenario = resolve_scenario(settings, args.scenario.as_deref())?;
    let report = CashFlowReport::generate(storage, planner, &scenario)?;

    if let Some(output_path) = args.output {
        let file = File::create(&output_path)
            .map_err(|e| PlannerError::Export(format!("Failed to create file: {}", e)))?;
        report.export_csv(BufWriter::new(file))?;
        println!("Cash flow report exported to: {}", output_path);
    } else if args.json {
        let json = if args.items {
            report.to_json()?
        } else {
            serde_json::to_string_pretty(&report.totals)?
        };
        println!("{}", json);
    } else {
        print!("{}", report.format_terminal(&settings.currency_symbol));
    }

    Ok(())
}

/// Handle the `status` command: one kind's items with their effective status
pub fn handle_status_command(
    storage: &Storage,
    settings: &Settings,
    planner: &Planner,
    kind: &str,
    scenario: Option<&str>,
    json: bool,
) -> PlannerResult<()> {
    let kind: ItemKind = kind.parse().map_err(PlannerError::Validation)?;
    let scenario = resolve_scenario(settings, scenario)?;
    print_effective_list(storage, settings, planner, kind, &scenario, json)
}
