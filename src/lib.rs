//! budget-planner - multi-scenario household budget planner
//!
//! A planner holds assets, liabilities, income, expenses and bills. Each item
//! carries a manual on/off toggle and may be tagged with a what-if scenario.
//! Items can depend on each other: switching off a house also switches off
//! the mortgage secured on it and every bill linked to either. The monthly
//! totals only count items whose *effective* status is on.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `logging`: Tracing subscriber setup
//! - `models`: Planners, line items, money and scenario tags
//! - `storage`: JSON file storage layer
//! - `services`: Status resolution, monthly totals and write-side management
//! - `reports`: Cash-flow report (terminal, CSV, JSON)
//! - `display`: Terminal tables
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_planner::config::paths::PlannerPaths;
//! use budget_planner::models::Scenario;
//! use budget_planner::services::TotalsService;
//! use budget_planner::storage::Storage;
//!
//! let storage = Storage::new(PlannerPaths::new()?)?;
//! storage.load_all()?;
//! let totals = TotalsService::new(&storage).compute_monthly_totals(planner_id, &Scenario::All)?;
//! println!("{}", totals.net_cash_flow);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{PlannerError, PlannerResult};
