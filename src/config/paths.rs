//! Path management for the budget planner
//!
//! ## Path Resolution Order
//!
//! 1. `BUDGET_PLANNER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/budget-planner` or `~/.config/budget-planner`
//! 3. Windows: `%APPDATA%\budget-planner`

use std::path::PathBuf;

use crate::error::PlannerError;
use crate::models::ItemKind;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "BUDGET_PLANNER_DATA_DIR";

/// Manages all paths used by the planner
#[derive(Debug, Clone)]
pub struct PlannerPaths {
    base_dir: PathBuf,
}

impl PlannerPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or application-data directory can be found.
    pub fn new() -> Result<Self, PlannerError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create PlannerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/budget-planner/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn planners_file(&self) -> PathBuf {
        self.data_dir().join("planners.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    /// Data file holding every item of `kind`
    pub fn items_file(&self, kind: ItemKind) -> PathBuf {
        let name = match kind {
            ItemKind::Asset => "assets.json",
            ItemKind::Liability => "liabilities.json",
            ItemKind::Income => "income.json",
            ItemKind::Expense => "expenses.json",
            ItemKind::Bill => "bills.json",
        };
        self.data_dir().join(name)
    }

    /// Every data file, in a stable order
    pub fn data_files(&self) -> Vec<PathBuf> {
        let mut files = vec![self.planners_file(), self.categories_file()];
        files.extend(ItemKind::ALL.iter().map(|kind| self.items_file(*kind)));
        files
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), PlannerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PlannerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| PlannerError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the planner has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, PlannerError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.trim().is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                PlannerError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("budget-planner"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, PlannerError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| PlannerError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("budget-planner"))
}
