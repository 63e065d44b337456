//! Core data models for the budget planner
//!
//! Planners, the five line-item kinds (assets, liabilities, income, expenses,
//! bills), categories, and the value types they are built from.

pub mod asset;
pub mod bill;
pub mod category;
pub mod expense;
pub mod ids;
pub mod income;
pub mod item;
pub mod liability;
pub mod money;
pub mod planner;
pub mod scenario;
pub mod toggle;

pub use asset::Asset;
pub use bill::Bill;
pub use category::{Category, CategoryKind};
pub use expense::Expense;
pub use ids::{AssetId, BillId, CategoryId, EntityId, ExpenseId, IncomeId, LiabilityId, PlannerId};
pub use income::Income;
pub use item::{ItemKind, ItemValidationError, LineItem, Links};
pub use liability::Liability;
pub use money::Money;
pub use planner::{Planner, PlannerValidationError, ScenarioDefinition};
pub use scenario::{Scenario, ScenarioFilter};
pub use toggle::IncludeToggle;
