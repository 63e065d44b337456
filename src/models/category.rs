//! Category model
//!
//! Expenses and bills can be grouped under planner-scoped categories. A
//! category belongs to exactly one of those two kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, PlannerId};
use super::item::{validate_name, ItemValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Bill,
}

impl CategoryKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "expenses" => Some(Self::Expense),
            "bill" | "bills" => Some(Self::Bill),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => f.pad("expense"),
            Self::Bill => f.pad("bill"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub planner_id: PlannerId,
    pub kind: CategoryKind,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(planner_id: PlannerId, kind: CategoryKind, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            planner_id,
            kind,
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_name(&self.name)
    }
}
