//! Line-item repository for JSON storage
//!
//! One repository per item kind, each backed by its own file
//! (`assets.json`, `liabilities.json`, ...).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::models::{EntityId, LineItem, PlannerId, ScenarioFilter};

use super::file_io::{read_json, write_json_atomic};

/// Serializable item file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemData<T> {
    items: Vec<T>,
}

impl<T> Default for ItemData<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

/// Repository for one kind of line item
pub struct ItemRepository<T: LineItem> {
    path: PathBuf,
    data: RwLock<HashMap<T::Id, T>>,
}

impl<T: LineItem> ItemRepository<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> PlannerResult<RwLockReadGuard<'_, HashMap<T::Id, T>>> {
        self.data
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> PlannerResult<RwLockWriteGuard<'_, HashMap<T::Id, T>>> {
        self.data
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load items from disk, replacing whatever is in memory
    pub fn load(&self) -> PlannerResult<()> {
        let file_data: ItemData<T> = read_json(&self.path)?;
        let mut data = self.write()?;

        data.clear();
        for item in file_data.items {
            data.insert(item.id(), item);
        }

        let kind = T::KIND;
        tracing::debug!(kind = %kind, count = data.len(), "loaded items");
        Ok(())
    }

    /// Save items to disk
    pub fn save(&self) -> PlannerResult<()> {
        let file_data = ItemData {
            items: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: T::Id) -> PlannerResult<Option<T>> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// All items, ordered by planner, creation time, then id
    pub fn get_all(&self) -> PlannerResult<Vec<T>> {
        let mut items: Vec<_> = self.read()?.values().cloned().collect();
        sort_items(&mut items);
        Ok(items)
    }

    /// Items of `planner` that `filter` admits
    pub fn list_for_planner(
        &self,
        planner: PlannerId,
        filter: &ScenarioFilter,
    ) -> PlannerResult<Vec<T>> {
        let mut items: Vec<_> = self
            .read()?
            .values()
            .filter(|item| item.planner_id() == planner && filter.admits(item.scenario()))
            .cloned()
            .collect();
        sort_items(&mut items);
        Ok(items)
    }

    /// Find an item of `planner` by id, short id, or case-insensitive name
    pub fn find(&self, planner: PlannerId, identifier: &str) -> PlannerResult<Option<T>> {
        let data = self.read()?;
        let mut candidates = data.values().filter(|item| item.planner_id() == planner);

        if let Some(item) = candidates.clone().find(|item| item.id().matches(identifier)) {
            return Ok(Some(item.clone()));
        }

        let name_lower = identifier.trim().to_lowercase();
        Ok(candidates
            .find(|item| item.name().to_lowercase() == name_lower)
            .cloned())
    }

    /// Insert or update an item
    pub fn upsert(&self, item: T) -> PlannerResult<()> {
        self.write()?.insert(item.id(), item);
        Ok(())
    }

    pub fn delete(&self, id: T::Id) -> PlannerResult<bool> {
        Ok(self.write()?.remove(&id).is_some())
    }

    /// Insert or update an item and write the file; memory is restored if the write fails
    pub fn upsert_and_save(&self, item: T) -> PlannerResult<()> {
        let id = item.id();
        let previous = self.write()?.insert(id, item);
        self.save_or_restore(id, previous)
    }

    /// Delete an item and write the file; memory is restored if the write fails
    pub fn delete_and_save(&self, id: T::Id) -> PlannerResult<bool> {
        let previous = self.write()?.remove(&id);
        let removed = previous.is_some();
        self.save_or_restore(id, previous)?;
        Ok(removed)
    }

    fn save_or_restore(&self, id: T::Id, previous: Option<T>) -> PlannerResult<()> {
        let Err(err) = self.save() else {
            return Ok(());
        };

        let mut data = self.write()?;
        match previous {
            Some(item) => data.insert(id, item),
            None => data.remove(&id),
        };
        let kind = T::KIND;
        tracing::warn!(kind = %kind, item = %id, error = %err, "save failed, change rolled back");
        Err(err)
    }

    /// Delete every item of `planner`, returning how many were removed
    pub fn delete_for_planner(&self, planner: PlannerId) -> PlannerResult<usize> {
        let mut data = self.write()?;
        let before = data.len();
        data.retain(|_, item| item.planner_id() != planner);
        Ok(before - data.len())
    }

    pub fn exists(&self, id: T::Id) -> PlannerResult<bool> {
        Ok(self.read()?.contains_key(&id))
    }

    pub fn count(&self) -> PlannerResult<usize> {
        Ok(self.read()?.len())
    }
}

fn sort_items<T: LineItem>(items: &mut [T]) {
    items.sort_by(|a, b| {
        a.planner_id()
            .cmp(&b.planner_id())
            .then(a.created_at().cmp(&b.created_at()))
            .then(a.id().cmp(&b.id()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Income, IncomeId, IncludeToggle, Liability, Money, Scenario};
    use tempfile::TempDir;

    fn create_test_repo<T: LineItem>(file: &str) -> (TempDir, ItemRepository<T>) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ItemRepository::new(temp_dir.path().join(file));
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo::<Income>("income.json");
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo::<Liability>("liabilities.json");
        let planner = PlannerId::new();
        let mut loan = Liability::new(planner, "Car loan", Money::from_cents(30_000));
        loan.principal = Some(Money::from_cents(800_000));
        loan.include_toggle = IncludeToggle::Off;
        let id = loan.id;
        repo.upsert(loan).unwrap();
        repo.save().unwrap();

        let reloaded = ItemRepository::<Liability>::new(temp_dir.path().join("liabilities.json"));
        reloaded.load().unwrap();
        let loan = reloaded.get(id).unwrap().unwrap();
        assert_eq!(loan.name, "Car loan");
        assert_eq!(loan.principal, Some(Money::from_cents(800_000)));
        assert!(loan.include_toggle.is_off());
    }

    #[test]
    fn test_list_for_planner_applies_filter() {
        let (_temp_dir, repo) = create_test_repo::<Income>("income.json");
        let planner = PlannerId::new();
        let other = PlannerId::new();

        for (name, tag) in [("Salary", "ALL"), ("Rental", "A"), ("Bonus", "B")] {
            let mut income = Income::new(planner, name, Money::from_cents(10_000));
            income.scenario = Scenario::parse(tag).unwrap();
            repo.upsert(income).unwrap();
        }
        repo.upsert(Income::new(other, "Elsewhere", Money::from_cents(1)))
            .unwrap();

        let a = ScenarioFilter::new(Scenario::named("A").unwrap());
        let mut names: Vec<_> = repo
            .list_for_planner(planner, &a)
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Rental", "Salary"]);

        let everything = repo
            .list_for_planner(planner, &ScenarioFilter::everything())
            .unwrap();
        assert_eq!(everything.len(), 3);
    }

    #[test]
    fn test_find_by_name_or_id() {
        let (_temp_dir, repo) = create_test_repo::<Income>("income.json");
        let planner = PlannerId::new();
        let salary = Income::new(planner, "Salary", Money::from_cents(400_000));
        let id = salary.id;
        repo.upsert(salary).unwrap();

        assert_eq!(repo.find(planner, "salary").unwrap().unwrap().id, id);
        assert_eq!(repo.find(planner, &id.to_string()).unwrap().unwrap().id, id);
        assert!(repo.find(PlannerId::new(), "Salary").unwrap().is_none());
    }

    /// A repository whose file sits under a regular file, so every save fails
    fn unwritable_repo<T: LineItem>() -> (TempDir, ItemRepository<T>) {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let repo = ItemRepository::new(blocker.join("income.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_failed_save_rolls_back_insert_and_update() {
        let (_temp_dir, repo) = unwritable_repo::<Income>();
        let planner = PlannerId::new();
        let salary = Income::new(planner, "Salary", Money::from_cents(400_000));
        let id = salary.id;

        assert!(repo.upsert_and_save(salary.clone()).is_err());
        assert!(!repo.exists(id).unwrap());

        repo.upsert(salary.clone()).unwrap();
        let mut raised = salary;
        raised.monthly_amount = Money::from_cents(500_000);
        assert!(repo.upsert_and_save(raised).is_err());
        assert_eq!(
            repo.get(id).unwrap().unwrap().monthly_amount,
            Money::from_cents(400_000)
        );
    }

    #[test]
    fn test_failed_save_rolls_back_delete() {
        let (_temp_dir, repo) = unwritable_repo::<Income>();
        let salary = Income::new(PlannerId::new(), "Salary", Money::from_cents(400_000));
        let id = salary.id;
        repo.upsert(salary).unwrap();

        assert!(repo.delete_and_save(id).is_err());
        assert!(repo.exists(id).unwrap());
    }

    #[test]
    fn test_upsert_and_save_persists() {
        let (temp_dir, repo) = create_test_repo::<Income>("income.json");
        let salary = Income::new(PlannerId::new(), "Salary", Money::from_cents(400_000));
        let id = salary.id;
        repo.upsert_and_save(salary).unwrap();
        assert!(!repo.delete_and_save(IncomeId::new()).unwrap());

        let reloaded = ItemRepository::<Income>::new(temp_dir.path().join("income.json"));
        reloaded.load().unwrap();
        assert!(reloaded.exists(id).unwrap());
    }

    #[test]
    fn test_delete_for_planner() {
        let (_temp_dir, repo) = create_test_repo::<Income>("income.json");
        let planner = PlannerId::new();
        repo.upsert(Income::new(planner, "Salary", Money::zero())).unwrap();
        repo.upsert(Income::new(planner, "Rental", Money::zero())).unwrap();
        repo.upsert(Income::new(PlannerId::new(), "Kept", Money::zero()))
            .unwrap();

        assert_eq!(repo.delete_for_planner(planner).unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 1);
    }
}
