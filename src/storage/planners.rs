//! Planner repository for JSON storage
//!
//! Manages loading and saving planners (with their scenario definitions) to
//! planners.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockWriteGuard};

use crate::error::{PlannerError, PlannerResult};
use crate::models::{EntityId, Planner, PlannerId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PlannerData {
    planners: Vec<Planner>,
}

/// Repository for planner persistence
pub struct PlannerRepository {
    path: PathBuf,
    data: RwLock<HashMap<PlannerId, Planner>>,
}

impl PlannerRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load planners from disk
    pub fn load(&self) -> PlannerResult<()> {
        let file_data: PlannerData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for planner in file_data.planners {
            data.insert(planner.id, planner);
        }

        tracing::debug!(count = data.len(), "loaded planners");
        Ok(())
    }

    /// Save planners to disk
    pub fn save(&self) -> PlannerResult<()> {
        let file_data = PlannerData {
            planners: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: PlannerId) -> PlannerResult<Option<Planner>> {
        let data = self
            .data
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// All planners, sorted by name
    pub fn get_all(&self) -> PlannerResult<Vec<Planner>> {
        let data = self
            .data
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut planners: Vec<_> = data.values().cloned().collect();
        planners.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(planners)
    }

    /// Find a planner by id, short id, or case-insensitive name
    pub fn find(&self, identifier: &str) -> PlannerResult<Option<Planner>> {
        let data = self
            .data
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        if let Some(planner) = data.values().find(|p| p.id.matches(identifier)) {
            return Ok(Some(planner.clone()));
        }

        let name_lower = identifier.trim().to_lowercase();
        Ok(data
            .values()
            .find(|p| p.name.to_lowercase() == name_lower)
            .cloned())
    }

    /// Check if a planner name is already taken
    pub fn name_exists(&self, name: &str, exclude_id: Option<PlannerId>) -> PlannerResult<bool> {
        let data = self
            .data
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name_lower = name.trim().to_lowercase();
        Ok(data
            .values()
            .any(|p| p.name.to_lowercase() == name_lower && Some(p.id) != exclude_id))
    }

    pub fn upsert(&self, planner: Planner) -> PlannerResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(planner.id, planner);
        Ok(())
    }

    /// Insert or update a planner and write the file, undoing the change if the write fails
    pub fn upsert_and_save(&self, planner: Planner) -> PlannerResult<()> {
        let id = planner.id;
        let previous = self.data_mut()?.insert(id, planner);
        self.save_or_restore(id, previous)
    }

    fn save_or_restore(&self, id: PlannerId, previous: Option<Planner>) -> PlannerResult<()> {
        let Err(err) = self.save() else {
            return Ok(());
        };

        let mut data = self.data_mut()?;
        match previous {
            Some(planner) => data.insert(id, planner),
            None => data.remove(&id),
        };
        tracing::warn!(planner = %id, error = %err, "save failed, change rolled back");
        Err(err)
    }

    fn data_mut(&self) -> PlannerResult<RwLockWriteGuard<'_, HashMap<PlannerId, Planner>>> {
        self.data
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    pub fn delete(&self, id: PlannerId) -> PlannerResult<bool> {
        let mut data = self
            .data
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> PlannerResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Scenario, ScenarioDefinition};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, PlannerRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = PlannerRepository::new(temp_dir.path().join("planners.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_save_and_reload_keeps_scenarios() {
        let (temp_dir, repo) = create_test_repo();

        let mut planner = Planner::with_starting_cash("Household", Money::from_cents(1_000_000));
        planner
            .add_scenario(ScenarioDefinition::new(
                Scenario::named("B").unwrap(),
                "Sell house",
                3,
            ))
            .unwrap();
        let id = planner.id;
        repo.upsert(planner).unwrap();
        repo.save().unwrap();

        let reloaded = PlannerRepository::new(temp_dir.path().join("planners.json"));
        reloaded.load().unwrap();
        let planner = reloaded.get(id).unwrap().unwrap();
        assert_eq!(planner.starting_cash, Money::from_cents(1_000_000));
        assert_eq!(planner.scenarios.len(), 1);
        assert_eq!(planner.scenarios[0].sale_month, 3);
    }

    #[test]
    fn test_find_and_name_exists() {
        let (_temp_dir, repo) = create_test_repo();
        let planner = Planner::new("Main Budget Plan");
        let id = planner.id;
        repo.upsert(planner).unwrap();

        assert_eq!(repo.find("main budget plan").unwrap().unwrap().id, id);
        assert_eq!(repo.find(&id.to_string()).unwrap().unwrap().id, id);
        assert!(repo.find("Other").unwrap().is_none());

        assert!(repo.name_exists("MAIN BUDGET PLAN", None).unwrap());
        assert!(!repo.name_exists("Main Budget Plan", Some(id)).unwrap());
    }

    #[test]
    fn test_failed_save_keeps_previous_planner() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let repo = PlannerRepository::new(blocker.join("planners.json"));

        let planner = Planner::new("Household");
        let id = planner.id;
        repo.upsert(planner.clone()).unwrap();

        let mut renamed = planner;
        renamed.name = "Renamed".into();
        assert!(repo.upsert_and_save(renamed).is_err());
        assert_eq!(repo.get(id).unwrap().unwrap().name, "Household");

        let fresh = Planner::new("Fresh");
        let fresh_id = fresh.id;
        assert!(repo.upsert_and_save(fresh).is_err());
        assert!(repo.get(fresh_id).unwrap().is_none());
    }
}
