//! Read-side seam between storage and the aggregation core

use crate::error::PlannerResult;
use crate::models::{Asset, Bill, Expense, Income, Liability, PlannerId, ScenarioFilter};

use super::Storage;

/// Supplies raw item snapshots for one planner
///
/// Implementations return only items of `planner` that `filter` admits.
/// The core never writes through this trait.
pub trait PlannerSource {
    fn fetch_assets(&self, planner: PlannerId, filter: &ScenarioFilter) -> PlannerResult<Vec<Asset>>;

    fn fetch_liabilities(
        &self,
        planner: PlannerId,
        filter: &ScenarioFilter,
    ) -> PlannerResult<Vec<Liability>>;

    fn fetch_income(&self, planner: PlannerId, filter: &ScenarioFilter) -> PlannerResult<Vec<Income>>;

    fn fetch_expenses(&self, planner: PlannerId, filter: &ScenarioFilter) -> PlannerResult<Vec<Expense>>;

    fn fetch_bills(&self, planner: PlannerId, filter: &ScenarioFilter) -> PlannerResult<Vec<Bill>>;
}

impl PlannerSource for Storage {
    fn fetch_assets(&self, planner: PlannerId, filter: &ScenarioFilter) -> PlannerResult<Vec<Asset>> {
        self.assets.list_for_planner(planner, filter)
    }

    fn fetch_liabilities(
        &self,
        planner: PlannerId,
        filter: &ScenarioFilter,
    ) -> PlannerResult<Vec<Liability>> {
        self.liabilities.list_for_planner(planner, filter)
    }

    fn fetch_income(&self, planner: PlannerId, filter: &ScenarioFilter) -> PlannerResult<Vec<Income>> {
        self.income.list_for_planner(planner, filter)
    }

    fn fetch_expenses(&self, planner: PlannerId, filter: &ScenarioFilter) -> PlannerResult<Vec<Expense>> {
        self.expenses.list_for_planner(planner, filter)
    }

    fn fetch_bills(&self, planner: PlannerId, filter: &ScenarioFilter) -> PlannerResult<Vec<Bill>> {
        self.bills.list_for_planner(planner, filter)
    }
}
