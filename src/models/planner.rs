//! Planner model
//!
//! A planner is one household budget plan. It owns every line item and keeps
//! the list of named what-if scenarios the user has defined.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::PlannerId;
use super::item::validate_name;
use super::money::Money;
use super::scenario::Scenario;

/// Latest month a scenario can schedule an asset sale in
pub const MAX_SALE_MONTH: u8 = 12;

/// A named what-if variant defined on a planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDefinition {
    /// Identifier items are tagged with (never `ALL`)
    pub scenario: Scenario,
    /// Friendly label, e.g. "Sell house"
    pub display_name: String,
    /// Month in the plan horizon when assets are sold (0 = no sales)
    #[serde(default)]
    pub sale_month: u8,
    pub created_at: DateTime<Utc>,
}

impl ScenarioDefinition {
    pub fn new(scenario: Scenario, display_name: impl Into<String>, sale_month: u8) -> Self {
        Self {
            scenario,
            display_name: display_name.into(),
            sale_month,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), PlannerValidationError> {
        if self.scenario.is_all() {
            return Err(PlannerValidationError::ReservedScenario);
        }
        if validate_name(&self.display_name).is_err() {
            return Err(PlannerValidationError::InvalidDisplayName);
        }
        if self.sale_month > MAX_SALE_MONTH {
            return Err(PlannerValidationError::SaleMonthOutOfRange(self.sale_month));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planner {
    pub id: PlannerId,
    pub name: String,
    /// Cash on hand at the start of the plan
    #[serde(default)]
    pub starting_cash: Money,
    #[serde(default)]
    pub scenarios: Vec<ScenarioDefinition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Planner {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PlannerId::new(),
            name: name.into(),
            starting_cash: Money::zero(),
            scenarios: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_starting_cash(name: impl Into<String>, starting_cash: Money) -> Self {
        let mut planner = Self::new(name);
        planner.starting_cash = starting_cash;
        planner
    }

    pub fn scenario(&self, scenario: &Scenario) -> Option<&ScenarioDefinition> {
        self.scenarios.iter().find(|s| &s.scenario == scenario)
    }

    /// Whether items may be tagged with `scenario` on this planner
    pub fn knows_scenario(&self, scenario: &Scenario) -> bool {
        scenario.is_all() || self.scenario(scenario).is_some()
    }

    pub fn add_scenario(
        &mut self,
        definition: ScenarioDefinition,
    ) -> Result<(), PlannerValidationError> {
        definition.validate()?;
        if self.scenario(&definition.scenario).is_some() {
            return Err(PlannerValidationError::DuplicateScenario(
                definition.scenario.to_string(),
            ));
        }
        self.scenarios.push(definition);
        self.scenarios.sort_by(|a, b| a.scenario.cmp(&b.scenario));
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn remove_scenario(&mut self, scenario: &Scenario) -> Option<ScenarioDefinition> {
        let index = self.scenarios.iter().position(|s| &s.scenario == scenario)?;
        self.updated_at = Utc::now();
        Some(self.scenarios.remove(index))
    }

    pub fn validate(&self) -> Result<(), PlannerValidationError> {
        if self.name.trim().is_empty() {
            return Err(PlannerValidationError::EmptyName);
        }
        if self.starting_cash.is_negative() {
            return Err(PlannerValidationError::NegativeStartingCash);
        }
        if self.starting_cash.exceeds_max() {
            return Err(PlannerValidationError::StartingCashTooLarge);
        }
        for definition in &self.scenarios {
            definition.validate()?;
        }
        Ok(())
    }
}

impl fmt::Display for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerValidationError {
    EmptyName,
    NegativeStartingCash,
    StartingCashTooLarge,
    ReservedScenario,
    InvalidDisplayName,
    SaleMonthOutOfRange(u8),
    DuplicateScenario(String),
}

impl fmt::Display for PlannerValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Planner name cannot be empty"),
            Self::NegativeStartingCash => write!(f, "Starting cash cannot be negative"),
            Self::StartingCashTooLarge => {
                write!(f, "Starting cash cannot exceed {}", Money::MAX)
            }
            Self::ReservedScenario => write!(f, "'ALL' is reserved and cannot be defined"),
            Self::InvalidDisplayName => {
                write!(f, "Scenario display name must be 1-255 characters")
            }
            Self::SaleMonthOutOfRange(m) => {
                write!(f, "Sale month must be between 0 and {} (got {})", MAX_SALE_MONTH, m)
            }
            Self::DuplicateScenario(s) => write!(f, "Scenario '{}' is already defined", s),
        }
    }
}

impl std::error::Error for PlannerValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(s: &str) -> Scenario {
        Scenario::named(s).unwrap()
    }

    #[test]
    fn test_add_scenario_keeps_sorted_and_unique() {
        let mut planner = Planner::new("Household");
        planner
            .add_scenario(ScenarioDefinition::new(named("B"), "Move abroad", 0))
            .unwrap();
        planner
            .add_scenario(ScenarioDefinition::new(named("A"), "Sell house", 6))
            .unwrap();

        let ids: Vec<_> = planner.scenarios.iter().map(|s| s.scenario.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);

        let duplicate = planner.add_scenario(ScenarioDefinition::new(named("A"), "Again", 0));
        assert_eq!(
            duplicate,
            Err(PlannerValidationError::DuplicateScenario("A".into()))
        );
    }

    #[test]
    fn test_scenario_validation() {
        let mut planner = Planner::new("Household");
        let all = ScenarioDefinition::new(Scenario::All, "Everything", 0);
        assert_eq!(
            planner.add_scenario(all),
            Err(PlannerValidationError::ReservedScenario)
        );
        let late = ScenarioDefinition::new(named("C"), "Late sale", 13);
        assert_eq!(
            planner.add_scenario(late),
            Err(PlannerValidationError::SaleMonthOutOfRange(13))
        );
    }

    #[test]
    fn test_starting_cash_bounds() {
        let planner = Planner::with_starting_cash("Household", Money::MAX);
        assert!(planner.validate().is_ok());

        let planner = Planner::with_starting_cash("Household", Money::from_cents(i64::MAX));
        assert_eq!(
            planner.validate(),
            Err(PlannerValidationError::StartingCashTooLarge)
        );
    }

    #[test]
    fn test_knows_scenario() {
        let mut planner = Planner::new("Household");
        planner
            .add_scenario(ScenarioDefinition::new(named("A"), "Sell house", 6))
            .unwrap();
        assert!(planner.knows_scenario(&Scenario::All));
        assert!(planner.knows_scenario(&named("A")));
        assert!(!planner.knows_scenario(&named("Z")));

        assert!(planner.remove_scenario(&named("A")).is_some());
        assert!(!planner.knows_scenario(&named("A")));
    }
}
