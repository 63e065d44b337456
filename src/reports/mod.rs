//! Reports for the budget planner
//!
//! The cash-flow report renders monthly totals and the per-item effective
//! status behind them.

pub mod cash_flow;

pub use cash_flow::{CashFlowReport, CashFlowRow};
