//! Storage layer for the budget planner
//!
//! JSON file storage with atomic writes. Each data set lives in its own file
//! under `data/` and is held in memory behind a lock between load and save.

pub mod categories;
pub mod file_io;
pub mod init;
pub mod items;
pub mod planners;
pub mod seed;
pub mod source;

pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use items::ItemRepository;
pub use planners::PlannerRepository;
pub use seed::seed_demo_planner;
pub use source::PlannerSource;

use crate::config::paths::PlannerPaths;
use crate::error::PlannerError;
use crate::models::{Asset, Bill, Expense, Income, ItemKind, Liability, PlannerId};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: PlannerPaths,
    pub planners: PlannerRepository,
    pub categories: CategoryRepository,
    pub assets: ItemRepository<Asset>,
    pub liabilities: ItemRepository<Liability>,
    pub income: ItemRepository<Income>,
    pub expenses: ItemRepository<Expense>,
    pub bills: ItemRepository<Bill>,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: PlannerPaths) -> Result<Self, PlannerError> {
        paths.ensure_directories()?;

        Ok(Self {
            planners: PlannerRepository::new(paths.planners_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            assets: ItemRepository::new(paths.items_file(ItemKind::Asset)),
            liabilities: ItemRepository::new(paths.items_file(ItemKind::Liability)),
            income: ItemRepository::new(paths.items_file(ItemKind::Income)),
            expenses: ItemRepository::new(paths.items_file(ItemKind::Expense)),
            bills: ItemRepository::new(paths.items_file(ItemKind::Bill)),
            paths,
        })
    }

    pub fn paths(&self) -> &PlannerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), PlannerError> {
        self.planners.load()?;
        self.categories.load()?;
        self.assets.load()?;
        self.liabilities.load()?;
        self.income.load()?;
        self.expenses.load()?;
        self.bills.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), PlannerError> {
        self.planners.save()?;
        self.categories.save()?;
        self.assets.save()?;
        self.liabilities.save()?;
        self.income.save()?;
        self.expenses.save()?;
        self.bills.save()?;
        Ok(())
    }

    /// Remove everything a planner owns, returning the number of records deleted
    pub fn purge_planner(&self, planner: PlannerId) -> Result<usize, PlannerError> {
        let mut removed = self.categories.delete_for_planner(planner)?;
        removed += self.assets.delete_for_planner(planner)?;
        removed += self.liabilities.delete_for_planner(planner)?;
        removed += self.income.delete_for_planner(planner)?;
        removed += self.expenses.delete_for_planner(planner)?;
        removed += self.bills.delete_for_planner(planner)?;
        if self.planners.delete(planner)? {
            removed += 1;
        }
        Ok(removed)
    }

    /// Check if storage has been initialized (settings file written)
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Planner, ScenarioFilter};
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_purge_planner_only_touches_that_planner() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(PlannerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();

        let doomed = Planner::new("Doomed");
        let kept = Planner::new("Kept");
        storage
            .income
            .upsert(Income::new(doomed.id, "Salary", Money::from_cents(100)))
            .unwrap();
        storage
            .income
            .upsert(Income::new(kept.id, "Salary", Money::from_cents(100)))
            .unwrap();
        let doomed_id = doomed.id;
        let kept_id = kept.id;
        storage.planners.upsert(doomed).unwrap();
        storage.planners.upsert(kept).unwrap();

        assert_eq!(storage.purge_planner(doomed_id).unwrap(), 2);
        assert!(storage.planners.get(doomed_id).unwrap().is_none());
        assert_eq!(
            storage
                .fetch_income(kept_id, &ScenarioFilter::everything())
                .unwrap()
                .len(),
            1
        );
    }
}
