//! Display formatting for terminal output
//!
//! Tables and detail views for planners, scenarios, categories and line
//! items.

pub mod items;
pub mod planner;

pub use items::{format_item_details, format_item_list, ItemColumns, LinkNames};
pub use planner::{
    format_category_list, format_planner_details, format_planner_list, format_scenario_list,
};
