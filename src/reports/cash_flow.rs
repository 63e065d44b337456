//! Cash Flow Report
//!
//! Monthly totals for one planner under one scenario selector, followed by
//! every visible item with the status the totals were computed from.

use crate::error::PlannerResult;
use crate::models::{IncludeToggle, ItemKind, LineItem, Money, Planner, Scenario};
use crate::services::{Effective, EffectiveStatus, MonthlyTotals, PlannerSnapshot, TotalsService};
use crate::storage::Storage;
use serde::Serialize;
use std::io::Write;

/// One line item as it appears in the report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowRow {
    pub kind: ItemKind,
    pub name: String,
    pub scenario: Scenario,
    pub include_toggle: IncludeToggle,
    pub effective_status: EffectiveStatus,
    /// Monthly figure the item contributes when it is on
    pub monthly_amount: Money,
}

impl CashFlowRow {
    fn from_effective<T: LineItem>(effective: &Effective<T>) -> Self {
        Self {
            kind: T::KIND,
            name: effective.item.name().to_string(),
            scenario: effective.item.scenario().clone(),
            include_toggle: effective.item.include_toggle(),
            effective_status: effective.effective_status,
            monthly_amount: effective.counted_amount,
        }
    }
}

/// Cash Flow Report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowReport {
    pub planner: String,
    pub scenario: Scenario,
    pub starting_cash: Money,
    pub totals: MonthlyTotals,
    pub rows: Vec<CashFlowRow>,
}

impl CashFlowReport {
    /// Generate the report from a single snapshot of the planner
    pub fn generate(storage: &Storage, planner: &Planner, scenario: &Scenario) -> PlannerResult<Self> {
        let snapshot = TotalsService::new(storage).snapshot(planner.id, scenario)?;
        Ok(Self::from_snapshot(planner, scenario, &snapshot))
    }

    fn from_snapshot(planner: &Planner, scenario: &Scenario, snapshot: &PlannerSnapshot) -> Self {
        let mut rows = Vec::new();
        rows.extend(snapshot.income.iter().map(CashFlowRow::from_effective));
        rows.extend(snapshot.expenses.iter().map(CashFlowRow::from_effective));
        rows.extend(snapshot.bills.iter().map(CashFlowRow::from_effective));
        rows.extend(snapshot.liabilities.iter().map(CashFlowRow::from_effective));
        rows.extend(snapshot.assets.iter().map(CashFlowRow::from_effective));

        Self {
            planner: planner.name.clone(),
            scenario: scenario.clone(),
            starting_cash: planner.starting_cash,
            totals: snapshot.totals(),
            rows,
        }
    }

    /// Rows of one kind, in snapshot order
    pub fn rows_of(&self, kind: ItemKind) -> impl Iterator<Item = &CashFlowRow> {
        self.rows.iter().filter(move |row| row.kind == kind)
    }

    /// Number of rows that count towards the totals
    pub fn active_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.effective_status.is_on())
            .count()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let money = |m: Money| m.format_with_symbol(currency_symbol);
        let totals = &self.totals;
        let mut output = String::new();

        output.push_str(&format!(
            "Cash Flow: {} (scenario {})\n",
            self.planner, self.scenario
        ));
        output.push_str(&"=".repeat(70));
        output.push('\n');

        output.push_str(&format!("Monthly Income:     {:>15}\n", money(totals.monthly_income)));
        output.push_str(&format!("Monthly Expenses:   {:>15}\n", money(totals.monthly_expenses)));
        output.push_str(&format!("Monthly Bills:      {:>15}\n", money(totals.monthly_bills)));
        output.push_str(&format!(
            "Monthly Liabilities:{:>15}\n",
            money(totals.monthly_liabilities)
        ));
        output.push_str(&"-".repeat(35));
        output.push('\n');
        output.push_str(&format!(
            "Total Outgoings:    {:>15}\n",
            money(totals.total_monthly_outgoings)
        ));
        output.push_str(&format!("Net Cash Flow:      {:>15}\n", money(totals.net_cash_flow)));
        output.push('\n');
        output.push_str(&format!("Asset Sales:        {:>15}\n", money(totals.asset_sales)));
        output.push_str(&format!("Starting Cash:      {:>15}\n", money(self.starting_cash)));
        output.push('\n');

        output.push_str(&format!(
            "{:<32} {:>9} {:>6} {:>6} {:>14}\n",
            "Item", "Scenario", "Toggle", "Status", "Monthly"
        ));
        output.push_str(&"-".repeat(70));
        output.push('\n');

        for kind in [
            ItemKind::Income,
            ItemKind::Expense,
            ItemKind::Bill,
            ItemKind::Liability,
            ItemKind::Asset,
        ] {
            let mut rows = self.rows_of(kind).peekable();
            if rows.peek().is_none() {
                continue;
            }
            output.push_str(&format!("\n{}\n", kind.entity_name().to_uppercase()));
            for row in rows {
                let marker = if row.effective_status.is_on() { " " } else { "x" };
                output.push_str(&format!(
                    "{} {:<30} {:>9} {:>6} {:>6} {:>14}\n",
                    marker,
                    truncate(&row.name, 30),
                    row.scenario,
                    row.include_toggle,
                    row.effective_status,
                    money(row.monthly_amount)
                ));
            }
        }

        output.push_str(&"-".repeat(70));
        output.push('\n');
        output.push_str("x = not counted (off, or switched off through a link)\n");

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> PlannerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);

        csv.write_record([
            "Kind",
            "Name",
            "Scenario",
            "Include Toggle",
            "Effective Status",
            "Monthly Amount",
        ])?;

        for row in &self.rows {
            csv.write_record([
                row.kind.to_string(),
                row.name.clone(),
                row.scenario.to_string(),
                row.include_toggle.to_string(),
                row.effective_status.to_string(),
                row.monthly_amount.to_string(),
            ])?;
        }

        let totals = &self.totals;
        for (label, amount) in [
            ("Monthly Income", totals.monthly_income),
            ("Monthly Expenses", totals.monthly_expenses),
            ("Monthly Bills", totals.monthly_bills),
            ("Monthly Liabilities", totals.monthly_liabilities),
            ("Total Monthly Outgoings", totals.total_monthly_outgoings),
            ("Net Cash Flow", totals.net_cash_flow),
            ("Asset Sales", totals.asset_sales),
        ] {
            csv.write_record([
                "SUMMARY".to_string(),
                label.to_string(),
                self.scenario.to_string(),
                String::new(),
                String::new(),
                amount.to_string(),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }

    /// Render the report as pretty-printed JSON
    pub fn to_json(&self) -> PlannerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
