//! Sample data
//!
//! Creates a demo household planner: a house carrying a mortgage, a car
//! carrying a loan, one salary, two expenses and four bills, plus three
//! scenarios with different sale months.

use crate::error::{PlannerError, PlannerResult};
use crate::models::{
    Asset, Bill, Category, CategoryKind, Expense, IncludeToggle, Income, Liability, Money, Planner,
    Scenario, ScenarioDefinition,
};

use super::Storage;

/// Name of the planner `seed_demo_planner` creates
pub const DEMO_PLANNER_NAME: &str = "Main Budget Plan";

fn euros(units: i64) -> Money {
    Money::from_units_cents(units, 0)
}

fn configured<T>(mut item: T, set: impl FnOnce(&mut T)) -> T {
    set(&mut item);
    item
}

/// Create the demo planner and its items, then save everything
///
/// Fails with a duplicate error if a planner of the same name already exists.
pub fn seed_demo_planner(storage: &Storage) -> PlannerResult<Planner> {
    if storage.planners.name_exists(DEMO_PLANNER_NAME, None)? {
        return Err(PlannerError::Duplicate {
            entity_type: "Planner",
            identifier: DEMO_PLANNER_NAME.to_string(),
        });
    }

    let mut planner = Planner::with_starting_cash(DEMO_PLANNER_NAME, euros(10_000));
    let scenarios = [
        ("A", "Keep everything", 0),
        ("B", "Sell in month 3", 3),
        ("C", "Sell in month 1", 1),
    ];
    for (id, label, sale_month) in scenarios {
        let scenario =
            Scenario::named(id).map_err(|e| PlannerError::Validation(e.to_string()))?;
        planner
            .add_scenario(ScenarioDefinition::new(scenario, label, sale_month))
            .map_err(|e| PlannerError::Validation(e.to_string()))?;
    }
    let p = planner.id;

    let housing = Category::new(p, CategoryKind::Bill, "Housing");
    let utilities = Category::new(p, CategoryKind::Bill, "Utilities");
    let transportation = Category::new(p, CategoryKind::Expense, "Transportation");
    let food = Category::new(p, CategoryKind::Expense, "Food");
    let entertainment = Category::new(p, CategoryKind::Expense, "Entertainment");

    let mut house = Asset::new(p, "Family House", euros(250_000));
    house.include_toggle = IncludeToggle::On;
    house.notes = Some("Primary residence".into());
    let mut car = Asset::new(p, "Family Car", euros(15_000));
    car.include_toggle = IncludeToggle::On;
    car.notes = Some("Main family vehicle".into());

    let mortgage = configured(
        Liability::new(p, "House Mortgage", euros(1_200)).linked_to(house.id),
        |l| {
            l.principal = Some(euros(180_000));
            l.notes = Some("Primary mortgage".into());
        },
    );
    let car_loan = configured(
        Liability::new(p, "Car Loan", euros(300)).linked_to(car.id),
        |l| {
            l.principal = Some(euros(8_000));
            l.notes = Some("Car financing".into());
        },
    );

    let salary = configured(Income::new(p, "Primary Salary", euros(4_000)), |i| {
        i.notes = Some("Main employment income".into());
    });

    let groceries = configured(Expense::new(p, "Groceries", euros(600)), |e| {
        e.category_id = Some(food.id);
    });
    let fuel = configured(Expense::new(p, "Gas & Fuel", euros(200)), |e| {
        e.category_id = Some(transportation.id);
        e.linked_asset_id = Some(car.id);
    });

    let bills = [
        ("Electricity Bill", 150, 1, Some(&utilities), true),
        ("Internet & Phone", 80, 1, Some(&utilities), false),
        ("Home Insurance", 1_200, 12, Some(&housing), true),
        ("Property Tax", 2_400, 12, Some(&housing), true),
    ]
    .map(|(name, amount, interval, category, on_house)| {
        configured(Bill::new(p, name, euros(amount), interval), |b| {
            b.category_id = category.map(|c| c.id);
            if on_house {
                b.linked_asset_id = Some(house.id);
            }
        })
    });

    for category in [housing, utilities, transportation, food, entertainment] {
        storage.categories.upsert(category)?;
    }
    storage.assets.upsert(house)?;
    storage.assets.upsert(car)?;
    storage.liabilities.upsert(mortgage)?;
    storage.liabilities.upsert(car_loan)?;
    storage.income.upsert(salary)?;
    storage.expenses.upsert(groceries)?;
    storage.expenses.upsert(fuel)?;
    for bill in bills {
        storage.bills.upsert(bill)?;
    }
    storage.planners.upsert(planner.clone())?;
    storage.save_all()?;

    tracing::debug!(planner = %planner.id, "seeded demo planner");
    Ok(planner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PlannerPaths;
    use crate::services::TotalsService;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_seed_totals() {
        let (_temp_dir, storage) = create_test_storage();
        let planner = seed_demo_planner(&storage).unwrap();
        assert_eq!(planner.scenarios.len(), 3);

        let totals = TotalsService::new(&storage)
            .compute_monthly_totals(planner.id, &Scenario::All)
            .unwrap();
        assert_eq!(totals.monthly_income, euros(4_000));
        assert_eq!(totals.monthly_expenses, euros(800));
        assert_eq!(totals.monthly_bills, euros(530));
        assert_eq!(totals.monthly_liabilities, euros(1_500));
        assert_eq!(totals.total_monthly_outgoings, euros(2_830));
        assert_eq!(totals.net_cash_flow, euros(1_170));
        assert_eq!(totals.asset_sales, euros(265_000));
    }

    #[test]
    fn test_seed_is_not_repeated() {
        let (_temp_dir, storage) = create_test_storage();
        seed_demo_planner(&storage).unwrap();
        assert!(matches!(
            seed_demo_planner(&storage),
            Err(PlannerError::Duplicate { .. })
        ));
        assert_eq!(storage.planners.count().unwrap(), 1);
    }

    #[test]
    fn test_switching_off_house_drops_its_costs() {
        let (_temp_dir, storage) = create_test_storage();
        let planner = seed_demo_planner(&storage).unwrap();

        let mut house = storage.assets.find(planner.id, "Family House").unwrap().unwrap();
        house.include_toggle = IncludeToggle::Off;
        storage.assets.upsert(house).unwrap();

        let totals = TotalsService::new(&storage)
            .compute_monthly_totals(planner.id, &Scenario::All)
            .unwrap();
        // mortgage and the three house-linked bills drop out
        assert_eq!(totals.monthly_liabilities, euros(300));
        assert_eq!(totals.monthly_bills, euros(80));
        assert_eq!(totals.asset_sales, euros(15_000));
    }
}
