//! Category service
//!
//! Expense and bill categories, unique by name within a planner and kind.

use crate::error::{PlannerError, PlannerResult};
use crate::models::{Category, CategoryKind, PlannerId};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a category on a planner
    pub fn create(
        &self,
        planner: PlannerId,
        kind: CategoryKind,
        name: &str,
    ) -> PlannerResult<Category> {
        let name = name.trim();

        if self.storage.planners.get(planner)?.is_none() {
            return Err(PlannerError::planner_not_found(planner.to_string()));
        }

        if self.storage.categories.name_exists(planner, kind, name)? {
            return Err(PlannerError::Duplicate {
                entity_type: "Category",
                identifier: format!("{} ({})", name, kind),
            });
        }

        let category = Category::new(planner, kind, name);
        category
            .validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;

        self.storage.categories.upsert_and_save(category.clone())?;
        Ok(category)
    }

    pub fn list(&self, planner: PlannerId, kind: Option<CategoryKind>) -> PlannerResult<Vec<Category>> {
        self.storage.categories.list_for_planner(planner, kind)
    }

    pub fn find(
        &self,
        planner: PlannerId,
        kind: CategoryKind,
        identifier: &str,
    ) -> PlannerResult<Option<Category>> {
        self.storage.categories.find(planner, kind, identifier)
    }

    /// Find a category or fail with a not-found error
    pub fn require(
        &self,
        planner: PlannerId,
        kind: CategoryKind,
        identifier: &str,
    ) -> PlannerResult<Category> {
        self.find(planner, kind, identifier)?
            .ok_or_else(|| PlannerError::category_not_found(identifier))
    }

    /// Delete a category, clearing it from any expense or bill that used it
    pub fn remove(
        &self,
        planner: PlannerId,
        kind: CategoryKind,
        identifier: &str,
    ) -> PlannerResult<Category> {
        let category = self.require(planner, kind, identifier)?;

        let mut cleared = 0;
        match kind {
            CategoryKind::Expense => {
                for mut expense in self.storage.expenses.get_all()? {
                    if expense.category_id == Some(category.id) {
                        expense.set_category(None);
                        self.storage.expenses.upsert(expense)?;
                        cleared += 1;
                    }
                }
                self.storage.expenses.save()?;
            }
            CategoryKind::Bill => {
                for mut bill in self.storage.bills.get_all()? {
                    if bill.category_id == Some(category.id) {
                        bill.set_category(None);
                        self.storage.bills.upsert(bill)?;
                        cleared += 1;
                    }
                }
                self.storage.bills.save()?;
            }
        }

        self.storage.categories.delete_and_save(category.id)?;

        tracing::debug!(category = %category.id, cleared, "removed category");
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PlannerPaths;
    use crate::models::{Expense, Money, Planner};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage, PlannerId) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        let planner = Planner::new("Household");
        let id = planner.id;
        storage.planners.upsert(planner).unwrap();
        (temp_dir, storage, id)
    }

    #[test]
    fn test_create_and_duplicate() {
        let (_temp_dir, storage, planner) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.create(planner, CategoryKind::Expense, "Food").unwrap();
        assert!(matches!(
            service.create(planner, CategoryKind::Expense, "food"),
            Err(PlannerError::Duplicate { .. })
        ));
        // same name, different kind
        service.create(planner, CategoryKind::Bill, "Food").unwrap();
        assert_eq!(service.list(planner, None).unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_planner() {
        let (_temp_dir, storage, _) = create_test_storage();
        let service = CategoryService::new(&storage);
        assert!(service
            .create(PlannerId::new(), CategoryKind::Bill, "Utilities")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_remove_clears_references() {
        let (_temp_dir, storage, planner) = create_test_storage();
        let service = CategoryService::new(&storage);
        let food = service.create(planner, CategoryKind::Expense, "Food").unwrap();

        let mut groceries = Expense::new(planner, "Groceries", Money::from_cents(60_000));
        groceries.category_id = Some(food.id);
        let id = groceries.id;
        storage.expenses.upsert(groceries).unwrap();

        service.remove(planner, CategoryKind::Expense, "Food").unwrap();
        assert!(storage.expenses.get(id).unwrap().unwrap().category_id.is_none());
        assert!(service.list(planner, None).unwrap().is_empty());
    }
}
