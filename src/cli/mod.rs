//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod category;
pub mod items;
pub mod planner;
pub mod report;
pub mod scenario;

pub use category::{handle_category_command, CategoryCommands};
pub use items::{
    handle_asset_command, handle_bill_command, handle_expense_command, handle_income_command,
    handle_liability_command, AssetCommands, BillCommands, ExpenseCommands, IncomeCommands,
    LiabilityCommands,
};
pub use planner::{handle_planner_command, PlannerCommands};
pub use report::{handle_status_command, handle_totals_command, TotalsArgs};
pub use scenario::{handle_scenario_command, ScenarioCommands};

use crate::config::settings::Settings;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{Money, Planner, Scenario};
use crate::services::PlannerService;
use crate::storage::Storage;

/// Resolve the planner a command works on
///
/// An explicit argument wins; otherwise the `default_planner` setting is used.
pub fn resolve_planner(
    storage: &Storage,
    settings: &Settings,
    planner: Option<&str>,
) -> PlannerResult<Planner> {
    let identifier = planner
        .or(settings.default_planner.as_deref())
        .ok_or_else(|| {
            PlannerError::Validation(
                "No planner given. Pass --planner or set one with 'config --default-planner'"
                    .into(),
            )
        })?;
    PlannerService::new(storage).require(identifier)
}

/// Parse a `--scenario` argument, falling back to the configured default
pub fn resolve_scenario(settings: &Settings, scenario: Option<&str>) -> PlannerResult<Scenario> {
    match scenario {
        Some(s) => parse_scenario(s),
        None => Ok(settings.default_scenario.clone()),
    }
}

pub fn parse_scenario(s: &str) -> PlannerResult<Scenario> {
    Scenario::parse(s).map_err(|e| PlannerError::Validation(format!("Invalid scenario '{}': {}", s, e)))
}

/// Parse an amount such as "1200", "1200.50" or "-3.5"
pub fn parse_money(s: &str) -> PlannerResult<Money> {
    Money::parse(s).map_err(|e| {
        PlannerError::Validation(format!(
            "Invalid amount '{}'. Use a format like '1200.00' or '1200'. Error: {}",
            s, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PlannerPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_resolve_planner_uses_default() {
        let (_temp_dir, storage) = create_test_storage();
        PlannerService::new(&storage)
            .create("Household", Money::zero())
            .unwrap();

        let mut settings = Settings::default();
        assert!(resolve_planner(&storage, &settings, None)
            .unwrap_err()
            .is_validation());

        settings.default_planner = Some("household".into());
        assert_eq!(
            resolve_planner(&storage, &settings, None).unwrap().name,
            "Household"
        );
        assert!(resolve_planner(&storage, &settings, Some("Other"))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_resolve_scenario() {
        let mut settings = Settings::default();
        assert_eq!(resolve_scenario(&settings, None).unwrap(), Scenario::All);
        settings.default_scenario = Scenario::named("B").unwrap();
        assert_eq!(
            resolve_scenario(&settings, None).unwrap(),
            Scenario::named("B").unwrap()
        );
        assert_eq!(resolve_scenario(&settings, Some("all")).unwrap(), Scenario::All);
        assert!(resolve_scenario(&settings, Some("a-b")).is_err());
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("1200.50").unwrap(), Money::from_cents(120_050));
        assert!(parse_money("abc").unwrap_err().is_validation());
    }
}
