//! Storage initialization
//!
//! Handles first-run setup: directories plus an empty file for every data set

use crate::config::paths::PlannerPaths;
use crate::error::PlannerError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing data files are left untouched. Returns the number of files created.
pub fn initialize_storage(paths: &PlannerPaths) -> Result<usize, PlannerError> {
    paths.ensure_directories()?;

    let mut created = 0;
    for file in paths.data_files() {
        if file.exists() {
            continue;
        }
        let mut empty = serde_json::Map::new();
        empty.insert(empty_key(&file).to_string(), serde_json::Value::Array(Vec::new()));
        write_json_atomic(&file, &empty)?;
        created += 1;
    }

    tracing::debug!(created, base = %paths.base_dir().display(), "initialized storage");
    Ok(created)
}

/// Top-level array key each repository expects in its file
fn empty_key(file: &std::path::Path) -> &'static str {
    match file.file_name().and_then(|n| n.to_str()) {
        Some("planners.json") => "planners",
        Some("categories.json") => "categories",
        _ => "items",
    }
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &PlannerPaths) -> bool {
    paths.data_files().iter().any(|file| !file.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Planner};
    use crate::storage::Storage;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        assert_eq!(initialize_storage(&paths).unwrap(), 7);
        assert!(!needs_initialization(&paths));
        assert!(paths.planners_file().exists());

        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        assert_eq!(storage.planners.count().unwrap(), 0);
        assert_eq!(storage.bills.count().unwrap(), 0);
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let storage = Storage::new(paths.clone()).unwrap();
        storage
            .planners
            .upsert(Planner::with_starting_cash("Household", Money::from_cents(100)))
            .unwrap();
        storage.save_all().unwrap();

        assert_eq!(initialize_storage(&paths).unwrap(), 0);

        let reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();
        assert_eq!(reloaded.planners.count().unwrap(), 1);
    }
}
