//! Planner service
//!
//! Planner CRUD plus management of the scenario definitions each planner
//! carries.

use crate::error::{PlannerError, PlannerResult};
use crate::models::{
    LineItem, Money, Planner, PlannerId, PlannerValidationError, Scenario, ScenarioDefinition,
    ScenarioFilter,
};
use crate::storage::{ItemRepository, Storage};

/// Service for planner management
pub struct PlannerService<'a> {
    storage: &'a Storage,
}

impl<'a> PlannerService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new planner
    pub fn create(&self, name: &str, starting_cash: Money) -> PlannerResult<Planner> {
        let name = name.trim();

        if self.storage.planners.name_exists(name, None)? {
            return Err(PlannerError::Duplicate {
                entity_type: "Planner",
                identifier: name.to_string(),
            });
        }

        let planner = Planner::with_starting_cash(name, starting_cash);
        planner
            .validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;

        self.storage.planners.upsert_and_save(planner.clone())?;

        tracing::debug!(planner = %planner.id, name = %planner.name, "created planner");
        Ok(planner)
    }

    pub fn get(&self, id: PlannerId) -> PlannerResult<Option<Planner>> {
        self.storage.planners.get(id)
    }

    /// Find a planner by name or ID string
    pub fn find(&self, identifier: &str) -> PlannerResult<Option<Planner>> {
        self.storage.planners.find(identifier)
    }

    /// Find a planner or fail with a not-found error
    pub fn require(&self, identifier: &str) -> PlannerResult<Planner> {
        self.find(identifier)?
            .ok_or_else(|| PlannerError::planner_not_found(identifier))
    }

    pub fn list(&self) -> PlannerResult<Vec<Planner>> {
        self.storage.planners.get_all()
    }

    /// Rename a planner and/or change its starting cash
    pub fn update(
        &self,
        identifier: &str,
        name: Option<&str>,
        starting_cash: Option<Money>,
    ) -> PlannerResult<Planner> {
        let mut planner = self.require(identifier)?;

        if let Some(name) = name {
            let name = name.trim();
            if self.storage.planners.name_exists(name, Some(planner.id))? {
                return Err(PlannerError::Duplicate {
                    entity_type: "Planner",
                    identifier: name.to_string(),
                });
            }
            planner.name = name.to_string();
        }
        if let Some(cash) = starting_cash {
            planner.starting_cash = cash;
        }
        planner
            .validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;
        planner.updated_at = chrono::Utc::now();

        self.storage.planners.upsert_and_save(planner.clone())?;
        Ok(planner)
    }

    /// Delete a planner and everything it owns
    pub fn remove(&self, identifier: &str) -> PlannerResult<(Planner, usize)> {
        let planner = self.require(identifier)?;
        let removed = self.storage.purge_planner(planner.id)?;
        self.storage.save_all()?;

        tracing::debug!(planner = %planner.id, removed, "removed planner");
        Ok((planner, removed))
    }

    /// Define a new named scenario on a planner
    pub fn add_scenario(
        &self,
        identifier: &str,
        scenario: &str,
        display_name: &str,
        sale_month: u8,
    ) -> PlannerResult<ScenarioDefinition> {
        let mut planner = self.require(identifier)?;
        let scenario =
            Scenario::named(scenario).map_err(|e| PlannerError::Validation(e.to_string()))?;

        let definition = ScenarioDefinition::new(scenario, display_name.trim(), sale_month);
        planner.add_scenario(definition.clone()).map_err(|e| match e {
            PlannerValidationError::DuplicateScenario(id) => {
                PlannerError::Duplicate {
                    entity_type: "Scenario",
                    identifier: id,
                }
            }
            other => PlannerError::Validation(other.to_string()),
        })?;

        self.storage.planners.upsert_and_save(planner)?;
        Ok(definition)
    }

    pub fn list_scenarios(&self, identifier: &str) -> PlannerResult<Vec<ScenarioDefinition>> {
        Ok(self.require(identifier)?.scenarios)
    }

    /// Change the display name and/or sale month of a scenario
    pub fn update_scenario(
        &self,
        identifier: &str,
        scenario: &str,
        display_name: Option<&str>,
        sale_month: Option<u8>,
    ) -> PlannerResult<ScenarioDefinition> {
        let mut planner = self.require(identifier)?;
        let scenario =
            Scenario::parse(scenario).map_err(|e| PlannerError::Validation(e.to_string()))?;

        let definition = planner
            .scenarios
            .iter_mut()
            .find(|s| s.scenario == scenario)
            .ok_or_else(|| PlannerError::scenario_not_found(scenario.to_string()))?;

        if let Some(display_name) = display_name {
            definition.display_name = display_name.trim().to_string();
        }
        if let Some(month) = sale_month {
            definition.sale_month = month;
        }
        definition
            .validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;
        let updated = definition.clone();
        planner.updated_at = chrono::Utc::now();

        self.storage.planners.upsert_and_save(planner)?;
        Ok(updated)
    }

    /// Remove a scenario definition
    ///
    /// Refused while any item of the planner is still tagged with it.
    pub fn remove_scenario(
        &self,
        identifier: &str,
        scenario: &str,
    ) -> PlannerResult<ScenarioDefinition> {
        let mut planner = self.require(identifier)?;
        let scenario =
            Scenario::parse(scenario).map_err(|e| PlannerError::Validation(e.to_string()))?;

        if planner.scenario(&scenario).is_none() {
            return Err(PlannerError::scenario_not_found(scenario.to_string()));
        }

        let tagged = self.count_tagged(planner.id, &scenario)?;
        if tagged > 0 {
            return Err(PlannerError::Validation(format!(
                "Scenario '{}' is still used by {} item(s); retag them first",
                scenario, tagged
            )));
        }

        let removed = planner
            .remove_scenario(&scenario)
            .ok_or_else(|| PlannerError::scenario_not_found(scenario.to_string()))?;
        self.storage.planners.upsert_and_save(planner)?;
        Ok(removed)
    }

    fn count_tagged(&self, planner: PlannerId, scenario: &Scenario) -> PlannerResult<usize> {
        Ok(tagged_with(&self.storage.assets, planner, scenario)?
            + tagged_with(&self.storage.liabilities, planner, scenario)?
            + tagged_with(&self.storage.income, planner, scenario)?
            + tagged_with(&self.storage.expenses, planner, scenario)?
            + tagged_with(&self.storage.bills, planner, scenario)?)
    }
}

fn tagged_with<T: LineItem>(
    repo: &ItemRepository<T>,
    planner: PlannerId,
    scenario: &Scenario,
) -> PlannerResult<usize> {
    Ok(repo
        .list_for_planner(planner, &ScenarioFilter::everything())?
        .iter()
        .filter(|item| item.scenario() == scenario)
        .count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PlannerPaths;
    use crate::models::Income;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_planner() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlannerService::new(&storage);

        let planner = service
            .create("Household", Money::from_cents(1_000_000))
            .unwrap();
        assert_eq!(planner.name, "Household");
        assert_eq!(planner.starting_cash, Money::from_cents(1_000_000));
        assert_eq!(service.require("household").unwrap().id, planner.id);
    }

    #[test]
    fn test_duplicate_and_invalid_names() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlannerService::new(&storage);

        service.create("Household", Money::zero()).unwrap();
        assert!(matches!(
            service.create("HOUSEHOLD", Money::zero()),
            Err(PlannerError::Duplicate { .. })
        ));
        assert!(service.create("  ", Money::zero()).unwrap_err().is_validation());
        assert!(service
            .create("Debt", Money::from_cents(-1))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_scenario_lifecycle() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlannerService::new(&storage);
        service.create("Household", Money::zero()).unwrap();

        service.add_scenario("Household", "b", "Sell house", 3).unwrap();
        assert!(matches!(
            service.add_scenario("Household", "B", "Again", 0),
            Err(PlannerError::Duplicate { .. })
        ));
        assert!(service
            .add_scenario("Household", "ALL", "Everything", 0)
            .unwrap_err()
            .is_validation());

        let updated = service
            .update_scenario("Household", "B", Some("Sell house early"), Some(1))
            .unwrap();
        assert_eq!(updated.display_name, "Sell house early");
        assert_eq!(updated.sale_month, 1);

        assert!(service
            .update_scenario("Household", "B", None, Some(13))
            .unwrap_err()
            .is_validation());

        service.remove_scenario("Household", "B").unwrap();
        assert!(service.list_scenarios("Household").unwrap().is_empty());
        assert!(service
            .remove_scenario("Household", "B")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_scenario_in_use_cannot_be_removed() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlannerService::new(&storage);
        let planner = service.create("Household", Money::zero()).unwrap();
        service.add_scenario("Household", "A", "Rent out", 0).unwrap();

        let mut rental = Income::new(planner.id, "Rental", Money::from_cents(50_000));
        rental.scenario = Scenario::named("A").unwrap();
        storage.income.upsert(rental).unwrap();

        let err = service.remove_scenario("Household", "A").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.list_scenarios("Household").unwrap().len(), 1);
    }

    #[test]
    fn test_remove_planner_purges_items() {
        let (_temp_dir, storage) = create_test_storage();
        let service = PlannerService::new(&storage);
        let planner = service.create("Household", Money::zero()).unwrap();
        storage
            .income
            .upsert(Income::new(planner.id, "Salary", Money::from_cents(1)))
            .unwrap();

        let (removed, count) = service.remove("Household").unwrap();
        assert_eq!(removed.id, planner.id);
        assert_eq!(count, 2);
        assert!(service.find("Household").unwrap().is_none());
        assert_eq!(storage.income.count().unwrap(), 0);
    }
}
