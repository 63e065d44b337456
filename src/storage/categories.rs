//! Category repository for JSON storage
//!
//! Manages loading and saving expense and bill categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockWriteGuard};

use crate::error::{PlannerError, PlannerResult};
use crate::models::{Category, CategoryId, CategoryKind, EntityId, PlannerId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> PlannerResult<()> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut categories = self
            .categories
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.clear();
        for category in file_data.categories {
            categories.insert(category.id, category);
        }

        tracing::debug!(count = categories.len(), "loaded categories");
        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> PlannerResult<()> {
        let categories = self
            .categories
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut category_list: Vec<_> = categories.values().cloned().collect();
        category_list.sort_by(|a, b| {
            a.planner_id
                .cmp(&b.planner_id)
                .then(a.name.cmp(&b.name))
                .then(a.id.cmp(&b.id))
        });

        let file_data = CategoryData {
            categories: category_list,
        };

        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: CategoryId) -> PlannerResult<Option<Category>> {
        let categories = self
            .categories
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.get(&id).cloned())
    }

    /// Categories of a planner, optionally restricted to one kind, sorted by kind then name
    pub fn list_for_planner(
        &self,
        planner: PlannerId,
        kind: Option<CategoryKind>,
    ) -> PlannerResult<Vec<Category>> {
        let categories = self
            .categories
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = categories
            .values()
            .filter(|c| c.planner_id == planner && kind.map_or(true, |k| c.kind == k))
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            (a.kind as u8)
                .cmp(&(b.kind as u8))
                .then(a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(list)
    }

    /// Find a category of a planner by id, short id, or case-insensitive name
    pub fn find(
        &self,
        planner: PlannerId,
        kind: CategoryKind,
        identifier: &str,
    ) -> PlannerResult<Option<Category>> {
        let categories = self.list_for_planner(planner, Some(kind))?;

        if let Some(category) = categories.iter().find(|c| c.id.matches(identifier)) {
            return Ok(Some(category.clone()));
        }

        let name_lower = identifier.trim().to_lowercase();
        Ok(categories
            .into_iter()
            .find(|c| c.name.to_lowercase() == name_lower))
    }

    /// Names are unique per (planner, kind)
    pub fn name_exists(
        &self,
        planner: PlannerId,
        kind: CategoryKind,
        name: &str,
    ) -> PlannerResult<bool> {
        let name_lower = name.trim().to_lowercase();
        Ok(self
            .list_for_planner(planner, Some(kind))?
            .iter()
            .any(|c| c.name.to_lowercase() == name_lower))
    }

    pub fn upsert(&self, category: Category) -> PlannerResult<()> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.insert(category.id, category);
        Ok(())
    }

    /// Insert or update a category and write the file, undoing the change if the write fails
    pub fn upsert_and_save(&self, category: Category) -> PlannerResult<()> {
        let id = category.id;
        let previous = self.categories_mut()?.insert(id, category);
        self.save_or_restore(id, previous)
    }

    /// Delete a category and write the file, undoing the delete if the write fails
    pub fn delete_and_save(&self, id: CategoryId) -> PlannerResult<bool> {
        let previous = self.categories_mut()?.remove(&id);
        let removed = previous.is_some();
        self.save_or_restore(id, previous)?;
        Ok(removed)
    }

    fn save_or_restore(&self, id: CategoryId, previous: Option<Category>) -> PlannerResult<()> {
        let Err(err) = self.save() else {
            return Ok(());
        };

        let mut categories = self.categories_mut()?;
        match previous {
            Some(category) => categories.insert(id, category),
            None => categories.remove(&id),
        };
        tracing::warn!(category = %id, error = %err, "save failed, change rolled back");
        Err(err)
    }

    fn categories_mut(&self) -> PlannerResult<RwLockWriteGuard<'_, HashMap<CategoryId, Category>>> {
        self.categories
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    pub fn delete(&self, id: CategoryId) -> PlannerResult<bool> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(categories.remove(&id).is_some())
    }

    /// Delete every category of `planner`, returning how many were removed
    pub fn delete_for_planner(&self, planner: PlannerId) -> PlannerResult<usize> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let before = categories.len();
        categories.retain(|_, c| c.planner_id != planner);
        Ok(before - categories.len())
    }
}
