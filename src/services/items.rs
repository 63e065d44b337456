//! Line-item service
//!
//! Write-side management shared by all five item kinds. Every write is
//! validated against the owning planner before it is persisted: amounts and
//! names, the scenario tag, and that links and categories point at records of
//! the same planner. Deleting an item never touches the items that link to
//! it; the resolver treats such dangling links as absent.

use crate::error::{PlannerError, PlannerResult};
use crate::models::{
    Asset, Bill, CategoryId, CategoryKind, Expense, IncludeToggle, Income, Liability, LineItem,
    Links, Money, Planner, PlannerId, Scenario, ScenarioFilter,
};
use crate::storage::{ItemRepository, Storage};

/// Storage-facing capabilities of an item kind
pub trait StoredItem: LineItem {
    /// Category kind this item may reference, if any
    const CATEGORY_KIND: Option<CategoryKind> = None;

    fn repository(storage: &Storage) -> &ItemRepository<Self>;

    /// Set the figure the item contributes to totals (sale value, monthly cost, ...)
    fn set_amount(&mut self, amount: Money);

    /// Replace the item's links; kinds that cannot link reject non-empty links
    fn set_links(&mut self, links: Links) -> PlannerResult<()> {
        if links.is_empty() {
            return Ok(());
        }
        Err(PlannerError::Validation(format!(
            "{} items cannot be linked",
            Self::KIND.entity_name()
        )))
    }

    fn category(&self) -> Option<CategoryId> {
        None
    }

    fn set_category(&mut self, _category: Option<CategoryId>) -> PlannerResult<()> {
        Err(PlannerError::Validation(format!(
            "{} items do not have categories",
            Self::KIND.entity_name()
        )))
    }
}

impl StoredItem for Asset {
    fn repository(storage: &Storage) -> &ItemRepository<Self> {
        &storage.assets
    }

    fn set_amount(&mut self, amount: Money) {
        self.set_sale_value(amount);
    }
}

impl StoredItem for Liability {
    fn repository(storage: &Storage) -> &ItemRepository<Self> {
        &storage.liabilities
    }

    fn set_amount(&mut self, amount: Money) {
        self.set_monthly_cost(amount);
    }

    fn set_links(&mut self, links: Links) -> PlannerResult<()> {
        if links.liability.is_some() {
            return Err(PlannerError::Validation(
                "A liability can only be linked to an asset".into(),
            ));
        }
        self.set_linked_asset(links.asset);
        Ok(())
    }
}

impl StoredItem for Income {
    fn repository(storage: &Storage) -> &ItemRepository<Self> {
        &storage.income
    }

    fn set_amount(&mut self, amount: Money) {
        self.set_monthly_amount(amount);
    }
}

impl StoredItem for Expense {
    const CATEGORY_KIND: Option<CategoryKind> = Some(CategoryKind::Expense);

    fn repository(storage: &Storage) -> &ItemRepository<Self> {
        &storage.expenses
    }

    fn set_amount(&mut self, amount: Money) {
        self.set_monthly_amount(amount);
    }

    fn set_links(&mut self, links: Links) -> PlannerResult<()> {
        Expense::set_links(self, links);
        Ok(())
    }

    fn category(&self) -> Option<CategoryId> {
        self.category_id
    }

    fn set_category(&mut self, category: Option<CategoryId>) -> PlannerResult<()> {
        Expense::set_category(self, category);
        Ok(())
    }
}

impl StoredItem for Bill {
    const CATEGORY_KIND: Option<CategoryKind> = Some(CategoryKind::Bill);

    fn repository(storage: &Storage) -> &ItemRepository<Self> {
        &storage.bills
    }

    fn set_amount(&mut self, amount: Money) {
        self.set_bill_amount(amount);
    }

    fn set_links(&mut self, links: Links) -> PlannerResult<()> {
        Bill::set_links(self, links);
        Ok(())
    }

    fn category(&self) -> Option<CategoryId> {
        self.category_id
    }

    fn set_category(&mut self, category: Option<CategoryId>) -> PlannerResult<()> {
        Bill::set_category(self, category);
        Ok(())
    }
}

/// Service for line-item management
pub struct ItemService<'a> {
    storage: &'a Storage,
}

impl<'a> ItemService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate and store a new item
    pub fn add<T: StoredItem>(&self, item: T) -> PlannerResult<T> {
        let planner = self.planner(item.planner_id())?;
        self.check(&planner, &item, None)?;

        T::repository(self.storage).upsert_and_save(item.clone())?;

        let kind = T::KIND;
        tracing::debug!(kind = %kind, item = %item.id(), planner = %planner.id, "added item");
        Ok(item)
    }

    /// Items of a planner visible under `filter`, as stored
    pub fn list<T: StoredItem>(
        &self,
        planner: PlannerId,
        filter: &ScenarioFilter,
    ) -> PlannerResult<Vec<T>> {
        T::repository(self.storage).list_for_planner(planner, filter)
    }

    pub fn find<T: StoredItem>(&self, planner: PlannerId, identifier: &str) -> PlannerResult<Option<T>> {
        T::repository(self.storage).find(planner, identifier)
    }

    /// Find an item or fail with a not-found error naming its kind
    pub fn require<T: StoredItem>(&self, planner: PlannerId, identifier: &str) -> PlannerResult<T> {
        self.find(planner, identifier)?
            .ok_or_else(|| PlannerError::item_not_found(T::KIND, identifier))
    }

    /// Apply `change` to an item, re-validate it, and persist it
    pub fn update<T, F>(&self, planner: PlannerId, identifier: &str, change: F) -> PlannerResult<T>
    where
        T: StoredItem,
        F: FnOnce(&mut T) -> PlannerResult<()>,
    {
        let planner = self.planner(planner)?;
        let original: T = self.require(planner.id, identifier)?;
        let mut item = original.clone();

        change(&mut item)?;
        self.check(&planner, &item, Some(&original))?;

        T::repository(self.storage).upsert_and_save(item.clone())?;
        Ok(item)
    }

    /// Set the manual toggle; `None` flips it
    pub fn set_toggle<T: StoredItem>(
        &self,
        planner: PlannerId,
        identifier: &str,
        toggle: Option<IncludeToggle>,
    ) -> PlannerResult<T> {
        self.update(planner, identifier, |item: &mut T| {
            let next = toggle.unwrap_or_else(|| IncludeToggle::from_bool(item.include_toggle().is_off()));
            item.set_include_toggle(next);
            Ok(())
        })
    }

    pub fn set_scenario<T: StoredItem>(
        &self,
        planner: PlannerId,
        identifier: &str,
        scenario: Scenario,
    ) -> PlannerResult<T> {
        self.update(planner, identifier, |item: &mut T| {
            item.set_scenario(scenario);
            Ok(())
        })
    }

    pub fn set_amount<T: StoredItem>(
        &self,
        planner: PlannerId,
        identifier: &str,
        amount: Money,
    ) -> PlannerResult<T> {
        self.update(planner, identifier, |item: &mut T| {
            item.set_amount(amount);
            Ok(())
        })
    }

    pub fn rename<T: StoredItem>(
        &self,
        planner: PlannerId,
        identifier: &str,
        name: &str,
    ) -> PlannerResult<T> {
        self.update(planner, identifier, |item: &mut T| {
            item.set_name(name.trim().to_string());
            Ok(())
        })
    }

    /// Replace an item's links after resolving them by name or id
    pub fn set_links<T: StoredItem>(
        &self,
        planner: PlannerId,
        identifier: &str,
        asset: Option<&str>,
        liability: Option<&str>,
    ) -> PlannerResult<T> {
        let links = self.resolve_links(planner, asset, liability)?;
        self.update(planner, identifier, |item: &mut T| item.set_links(links))
    }

    /// Set or clear an item's category by name or id
    pub fn set_category<T: StoredItem>(
        &self,
        planner: PlannerId,
        identifier: &str,
        category: Option<&str>,
    ) -> PlannerResult<T> {
        let category = match (category, T::CATEGORY_KIND) {
            (Some(name), Some(kind)) => Some(self.resolve_category(planner, kind, name)?),
            _ => None,
        };
        self.update(planner, identifier, |item: &mut T| item.set_category(category))
    }

    /// Delete an item; links pointing at it are left dangling
    pub fn remove<T: StoredItem>(&self, planner: PlannerId, identifier: &str) -> PlannerResult<T> {
        let item: T = self.require(planner, identifier)?;
        T::repository(self.storage).delete_and_save(item.id())?;

        let kind = T::KIND;
        tracing::debug!(kind = %kind, item = %item.id(), "removed item");
        Ok(item)
    }

    /// Resolve link arguments to ids of the planner's asset and liability
    pub fn resolve_links(
        &self,
        planner: PlannerId,
        asset: Option<&str>,
        liability: Option<&str>,
    ) -> PlannerResult<Links> {
        let asset = asset
            .map(|name| self.require::<Asset>(planner, name).map(|a| a.id))
            .transpose()?;
        let liability = liability
            .map(|name| self.require::<Liability>(planner, name).map(|l| l.id))
            .transpose()?;
        Ok(Links { asset, liability })
    }

    /// Resolve a category argument to the id of the planner's category
    pub fn resolve_category(
        &self,
        planner: PlannerId,
        kind: CategoryKind,
        identifier: &str,
    ) -> PlannerResult<CategoryId> {
        self.storage
            .categories
            .find(planner, kind, identifier)?
            .map(|c| c.id)
            .ok_or_else(|| PlannerError::category_not_found(identifier))
    }

    fn planner(&self, id: PlannerId) -> PlannerResult<Planner> {
        self.storage
            .planners
            .get(id)?
            .ok_or_else(|| PlannerError::planner_not_found(id.to_string()))
    }

    /// Validate `item` for writing; references already held by `original`
    /// are not re-checked, so an item with a dangling link stays editable
    fn check<T: StoredItem>(
        &self,
        planner: &Planner,
        item: &T,
        original: Option<&T>,
    ) -> PlannerResult<()> {
        item.validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;

        if !planner.knows_scenario(item.scenario()) {
            return Err(PlannerError::Validation(format!(
                "Scenario '{}' is not defined on planner '{}'",
                item.scenario(),
                planner.name
            )));
        }

        let name_lower = item.name().trim().to_lowercase();
        let taken = T::repository(self.storage)
            .list_for_planner(planner.id, &ScenarioFilter::everything())?
            .iter()
            .any(|other| other.id() != item.id() && other.name().to_lowercase() == name_lower);
        if taken {
            return Err(PlannerError::Duplicate {
                entity_type: T::KIND.entity_name(),
                identifier: item.name().to_string(),
            });
        }

        let links = item.links();
        let held = original.map(|o| o.links()).unwrap_or_default();
        if let Some(asset) = links.asset.filter(|id| held.asset != Some(*id)) {
            let found = self.storage.assets.get(asset)?;
            if found.map_or(true, |a| a.planner_id != planner.id) {
                return Err(PlannerError::Validation(format!(
                    "Linked asset {} does not exist on planner '{}'",
                    asset, planner.name
                )));
            }
        }
        if let Some(liability) = links.liability.filter(|id| held.liability != Some(*id)) {
            let found = self.storage.liabilities.get(liability)?;
            if found.map_or(true, |l| l.planner_id != planner.id) {
                return Err(PlannerError::Validation(format!(
                    "Linked liability {} does not exist on planner '{}'",
                    liability, planner.name
                )));
            }
        }

        let held_category = original.and_then(|o| o.category());
        if let Some(category) = item.category().filter(|id| held_category != Some(*id)) {
            let found = self.storage.categories.get(category)?;
            let valid = found.map_or(false, |c| {
                c.planner_id == planner.id && Some(c.kind) == T::CATEGORY_KIND
            });
            if !valid {
                return Err(PlannerError::Validation(format!(
                    "Category {} is not a {} category of planner '{}'",
                    category,
                    T::KIND.entity_name().to_lowercase(),
                    planner.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PlannerPaths;
    use crate::models::{Category, ScenarioDefinition};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage, PlannerId) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let mut planner = Planner::new("Household");
        planner
            .add_scenario(ScenarioDefinition::new(
                Scenario::named("A").unwrap(),
                "Sell house",
                6,
            ))
            .unwrap();
        let id = planner.id;
        storage.planners.upsert(planner).unwrap();
        (temp_dir, storage, id)
    }

    fn euros(units: i64) -> Money {
        Money::from_cents(units * 100)
    }

    #[test]
    fn test_add_and_find() {
        let (_temp_dir, storage, planner) = create_test_storage();
        let service = ItemService::new(&storage);

        let salary = service.add(Income::new(planner, "Salary", euros(4_000))).unwrap();
        let found: Income = service.require(planner, "salary").unwrap();
        assert_eq!(found.id, salary.id);

        let missing = service.require::<Income>(planner, "Bonus").unwrap_err();
        assert_eq!(missing.to_string(), "Income not found: Bonus");
    }

    #[test]
    fn test_add_rejects_invalid_items() {
        let (_temp_dir, storage, planner) = create_test_storage();
        let service = ItemService::new(&storage);

        assert!(service
            .add(Expense::new(planner, "Refund", euros(-5)))
            .unwrap_err()
            .is_validation());
        assert!(service
            .add(Bill::new(planner, "Odd", euros(10), 13))
            .unwrap_err()
            .is_validation());

        let mut unknown_tag = Income::new(planner, "Rental", euros(500));
        unknown_tag.scenario = Scenario::named("Z").unwrap();
        assert!(service.add(unknown_tag).unwrap_err().is_validation());

        assert!(service
            .add(Income::new(PlannerId::new(), "Orphan", euros(1)))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_duplicate_names_rejected_per_kind() {
        let (_temp_dir, storage, planner) = create_test_storage();
        let service = ItemService::new(&storage);

        service.add(Income::new(planner, "Salary", euros(1))).unwrap();
        assert!(matches!(
            service.add(Income::new(planner, "SALARY", euros(2))),
            Err(PlannerError::Duplicate { .. })
        ));
        service.add(Expense::new(planner, "Salary", euros(1))).unwrap();
    }

    #[test]
    fn test_links_must_exist_in_same_planner() {
        let (_temp_dir, storage, planner) = create_test_storage();
        let service = ItemService::new(&storage);

        let foreign = Asset::new(PlannerId::new(), "Foreign", euros(1));
        storage.assets.upsert(foreign.clone()).unwrap();

        let loan = Liability::new(planner, "Loan", euros(300)).linked_to(foreign.id);
        assert!(service.add(loan).unwrap_err().is_validation());

        let house = service.add(Asset::new(planner, "House", euros(250_000))).unwrap();
        let mortgage = service
            .add(Liability::new(planner, "Mortgage", euros(1_200)).linked_to(house.id))
            .unwrap();
        assert_eq!(mortgage.linked_asset_id, Some(house.id));
    }

    #[test]
    fn test_set_links_by_name() {
        let (_temp_dir, storage, planner) = create_test_storage();
        let service = ItemService::new(&storage);
        let house = service.add(Asset::new(planner, "House", euros(250_000))).unwrap();
        let mortgage = service.add(Liability::new(planner, "Mortgage", euros(1_200))).unwrap();
        service.add(Bill::new(planner, "Insurance", euros(1_200), 12)).unwrap();

        let bill: Bill = service
            .set_links(planner, "Insurance", Some("house"), Some("mortgage"))
            .unwrap();
        assert_eq!(bill.linked_asset_id, Some(house.id));
        assert_eq!(bill.linked_liability_id, Some(mortgage.id));

        let cleared: Bill = service.set_links(planner, "Insurance", None, None).unwrap();
        assert!(cleared.links().is_empty());

        assert!(service
            .set_links::<Liability>(planner, "Mortgage", None, Some("Mortgage"))
            .unwrap_err()
            .is_validation());
        assert!(service
            .set_links::<Income>(planner, "House", Some("House"), None)
            .is_err());
    }

    #[test]
    fn test_toggle_flips_and_sets() {
        let (_temp_dir, storage, planner) = create_test_storage();
        let service = ItemService::new(&storage);
        service.add(Asset::new(planner, "Car", euros(15_000))).unwrap();

        let car: Asset = service.set_toggle(planner, "Car", None).unwrap();
        assert!(car.include_toggle.is_on());
        let car: Asset = service.set_toggle(planner, "Car", None).unwrap();
        assert!(car.include_toggle.is_off());
        let car: Asset = service
            .set_toggle(planner, "Car", Some(IncludeToggle::Off))
            .unwrap();
        assert!(car.include_toggle.is_off());
    }

    #[test]
    fn test_category_kind_enforced() {
        let (_temp_dir, storage, planner) = create_test_storage();
        let service = ItemService::new(&storage);
        let food = Category::new(planner, CategoryKind::Expense, "Food");
        storage.categories.upsert(food.clone()).unwrap();
        let utilities = Category::new(planner, CategoryKind::Bill, "Utilities");
        storage.categories.upsert(utilities.clone()).unwrap();

        service.add(Expense::new(planner, "Groceries", euros(600))).unwrap();
        let groceries: Expense = service
            .set_category(planner, "Groceries", Some("food"))
            .unwrap();
        assert_eq!(groceries.category_id, Some(food.id));

        // a bill category cannot be named from an expense
        assert!(service
            .set_category::<Expense>(planner, "Groceries", Some("Utilities"))
            .unwrap_err()
            .is_not_found());

        let mut wrong = Bill::new(planner, "Power", euros(150), 1);
        wrong.category_id = Some(food.id);
        assert!(service.add(wrong).unwrap_err().is_validation());
    }

    #[test]
    fn test_remove_leaves_dangling_links() {
        let (_temp_dir, storage, planner) = create_test_storage();
        let service = ItemService::new(&storage);
        let car = service.add(Asset::new(planner, "Car", euros(15_000))).unwrap();
        let mut fuel = Expense::new(planner, "Fuel", euros(200));
        fuel.linked_asset_id = Some(car.id);
        let fuel = service.add(fuel).unwrap();

        service.remove::<Asset>(planner, "Car").unwrap();
        let stored = storage.expenses.get(fuel.id).unwrap().unwrap();
        assert_eq!(stored.linked_asset_id, Some(car.id));

        // still editable with the dangling link in place
        let fuel: Expense = service.set_amount(planner, "Fuel", euros(250)).unwrap();
        assert_eq!(fuel.monthly_amount, euros(250));
    }
}
