//! Service layer for the budget planner
//!
//! The write side (planners, categories, items) validates and persists
//! through storage. The read side (`status`, `totals`) resolves effective
//! status and aggregates monthly totals over any [`PlannerSource`].
//!
//! [`PlannerSource`]: crate::storage::PlannerSource

pub mod category;
pub mod items;
pub mod planner;
pub mod status;
pub mod totals;

pub use category::CategoryService;
pub use items::{ItemService, StoredItem};
pub use planner::PlannerService;
pub use status::{resolve_effective_status, resolve_status, Effective, EffectiveStatus, StatusResolver};
pub use totals::{MonthlyTotals, PlannerSnapshot, TotalsService};
