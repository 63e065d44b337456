//! User settings for the budget planner
//!
//! Stored as `config.json` in the base directory. Missing keys fall back to
//! their defaults, so older files keep loading as fields are added.

use serde::{Deserialize, Serialize};

use super::paths::PlannerPaths;
use crate::error::PlannerError;
use crate::models::Scenario;

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Planner (name or id) used when a command omits one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_planner: Option<String>,

    /// Scenario selector used when a command omits `--scenario`
    #[serde(default)]
    pub default_scenario: Scenario,

    /// Log filter used when `BUDGET_PLANNER_LOG` is unset (e.g. "warn", "debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            default_planner: None,
            default_scenario: Scenario::All,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &PlannerPaths) -> Result<Self, PlannerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // not persisted until the caller saves
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| PlannerError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| PlannerError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PlannerPaths) -> Result<(), PlannerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PlannerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PlannerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
