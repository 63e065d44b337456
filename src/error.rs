//! Custom error types for the budget planner
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::{ItemKind, PlannerId};

/// The main error type for planner operations
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// The storage collaborator could not produce a snapshot of one item kind
    #[error("Failed to fetch {kind} for planner {planner}: {reason}")]
    Fetch {
        kind: ItemKind,
        planner: PlannerId,
        reason: String,
    },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PlannerError {
    /// Create a "not found" error for planners
    pub fn planner_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Planner",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for scenarios
    pub fn scenario_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Scenario",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for a line item of the given kind
    pub fn item_not_found(kind: ItemKind, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: kind.entity_name(),
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a collaborator fetch failure
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

impl From<std::io::Error> for PlannerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for PlannerError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlannerError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = PlannerError::planner_not_found("Household");
        assert_eq!(err.to_string(), "Planner not found: Household");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_item_not_found_uses_kind_name() {
        let err = PlannerError::item_not_found(ItemKind::Liability, "Mortgage");
        assert_eq!(err.to_string(), "Liability not found: Mortgage");
    }

    #[test]
    fn test_fetch_error_names_kind_and_planner() {
        let planner = PlannerId::new();
        let err = PlannerError::Fetch {
            kind: ItemKind::Bill,
            planner,
            reason: "disk unavailable".into(),
        };
        let message = err.to_string();
        assert!(message.contains("bills"));
        assert!(message.contains(&planner.to_string()));
        assert!(err.is_fetch());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let planner_err: PlannerError = io_err.into();
        assert!(matches!(planner_err, PlannerError::Io(_)));
    }
}
