//! Planner, scenario and category display formatting

use crate::models::{Category, Planner, ScenarioDefinition};
use crate::services::MonthlyTotals;

/// Format a list of planners as a table
pub fn format_planner_list(planners: &[Planner], currency_symbol: &str) -> String {
    if planners.is_empty() {
        return "No planners found.".to_string();
    }

    let name_width = planners
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>14}  {:>9}  {}\n",
        "Name",
        "Starting Cash",
        "Scenarios",
        "ID",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->14}  {:->9}  {:-<8}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for planner in planners {
        output.push_str(&format!(
            "{:<name_width$}  {:>14}  {:>9}  {}\n",
            planner.name,
            planner.starting_cash.format_with_symbol(currency_symbol),
            planner.scenarios.len(),
            planner.id.short(),
            name_width = name_width,
        ));
    }

    output
}

/// Format a planner with its scenarios and current totals
pub fn format_planner_details(
    planner: &Planner,
    totals: &MonthlyTotals,
    currency_symbol: &str,
) -> String {
    let money = |m: crate::models::Money| m.format_with_symbol(currency_symbol);
    let mut output = String::new();

    output.push_str(&format!("Planner: {}\n", planner.name));
    output.push_str(&format!("  ID:             {}\n", planner.id));
    output.push_str(&format!("  Starting Cash:  {}\n", money(planner.starting_cash)));
    output.push_str(&format!(
        "  Created:        {}\n",
        planner.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!("  Income:         {}\n", money(totals.monthly_income)));
    output.push_str(&format!("  Outgoings:      {}\n", money(totals.total_monthly_outgoings)));
    output.push_str(&format!("  Net Cash Flow:  {}\n", money(totals.net_cash_flow)));

    output.push('\n');
    output.push_str(&format_scenario_list(&planner.scenarios));
    output
}

/// Format the scenario definitions of a planner
pub fn format_scenario_list(scenarios: &[ScenarioDefinition]) -> String {
    if scenarios.is_empty() {
        return "No scenarios defined; every item is in ALL.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("{:<10}  {:<30}  {}\n", "Scenario", "Name", "Sale Month"));
    output.push_str(&format!("{:-<10}  {:-<30}  {:-<10}\n", "", "", ""));

    for definition in scenarios {
        let sale = if definition.sale_month == 0 {
            "none".to_string()
        } else {
            definition.sale_month.to_string()
        };
        output.push_str(&format!(
            "{:<10}  {:<30}  {}\n",
            definition.scenario, definition.display_name, sale
        ));
    }

    output
}

/// Format categories grouped by kind
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("{:<8}  {}\n", "Kind", "Name"));
    output.push_str(&format!("{:-<8}  {:-<20}\n", "", ""));
    for category in categories {
        output.push_str(&format!("{:<8}  {}\n", category.kind, category.name));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryKind, Money, Scenario};

    #[test]
    fn test_format_planner_list() {
        let planner = Planner::with_starting_cash("Household", Money::from_cents(1_000_000));
        let output = format_planner_list(&[planner], "€");
        assert!(output.contains("Household"));
        assert!(output.contains("€10000.00"));
        assert_eq!(format_planner_list(&[], "€"), "No planners found.");
    }

    #[test]
    fn test_format_scenarios() {
        let scenarios = vec![
            ScenarioDefinition::new(Scenario::named("A").unwrap(), "Keep everything", 0),
            ScenarioDefinition::new(Scenario::named("B").unwrap(), "Sell in month 3", 3),
        ];
        let output = format_scenario_list(&scenarios);
        assert!(output.contains("Keep everything"));
        assert!(output.contains("none"));
        assert!(output.contains("Sell in month 3"));
    }

    #[test]
    fn test_format_planner_details() {
        let planner = Planner::new("Household");
        let totals = MonthlyTotals::from_sums(
            Money::from_cents(400_000),
            Money::from_cents(60_000),
            Money::zero(),
            Money::zero(),
            Money::zero(),
        );
        let output = format_planner_details(&planner, &totals, "$");
        assert!(output.contains("Planner: Household"));
        assert!(output.contains("Net Cash Flow:  $3400.00"));
        assert!(output.contains("No scenarios defined"));
    }

    #[test]
    fn test_format_categories() {
        let planner = crate::models::PlannerId::new();
        let categories = vec![Category::new(planner, CategoryKind::Bill, "Utilities")];
        let output = format_category_list(&categories);
        assert!(output.contains("bill"));
        assert!(output.contains("Utilities"));
    }
}
