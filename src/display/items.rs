//! Line item display formatting
//!
//! Tables of items with their stored toggle next to the effective status the
//! totals use, and a detail view for a single item.

use std::collections::HashMap;

use crate::models::{
    Asset, AssetId, Bill, Category, CategoryId, Expense, Income, Liability, LiabilityId, LineItem,
};
use crate::services::Effective;

/// Names for the entities an item can point at
#[derive(Debug, Default)]
pub struct LinkNames {
    assets: HashMap<AssetId, String>,
    liabilities: HashMap<LiabilityId, String>,
    categories: HashMap<CategoryId, String>,
}

impl LinkNames {
    pub fn new(assets: &[Asset], liabilities: &[Liability], categories: &[Category]) -> Self {
        Self {
            assets: assets.iter().map(|a| (a.id, a.name.clone())).collect(),
            liabilities: liabilities.iter().map(|l| (l.id, l.name.clone())).collect(),
            categories: categories.iter().map(|c| (c.id, c.name.clone())).collect(),
        }
    }

    fn asset(&self, id: AssetId) -> String {
        self.assets
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("{} (missing)", id.short()))
    }

    fn liability(&self, id: LiabilityId) -> String {
        self.liabilities
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("{} (missing)", id.short()))
    }

    fn category(&self, id: Option<CategoryId>) -> String {
        id.map(|id| self.categories.get(&id).cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

/// Per-kind columns of the item table
pub trait ItemColumns: LineItem {
    /// Header of the amount column
    const AMOUNT_HEADER: &'static str = "Monthly";

    /// Free-form extra column: category, interval, notes
    fn detail(&self, names: &LinkNames) -> String;
}

impl ItemColumns for Asset {
    const AMOUNT_HEADER: &'static str = "Sale Value";

    fn detail(&self, _names: &LinkNames) -> String {
        self.notes.clone().unwrap_or_default()
    }
}

impl ItemColumns for Liability {
    fn detail(&self, _names: &LinkNames) -> String {
        self.principal
            .map(|p| format!("principal {}", p))
            .unwrap_or_default()
    }
}

impl ItemColumns for Income {
    fn detail(&self, _names: &LinkNames) -> String {
        self.notes.clone().unwrap_or_default()
    }
}

impl ItemColumns for Expense {
    fn detail(&self, names: &LinkNames) -> String {
        names.category(self.category_id)
    }
}

impl ItemColumns for Bill {
    fn detail(&self, names: &LinkNames) -> String {
        let cadence = if self.interval_months == 1 {
            format!("{} monthly", self.bill_amount)
        } else {
            format!("{} every {} months", self.bill_amount, self.interval_months)
        };
        match self.category_id {
            Some(_) => format!("{}, {}", names.category(self.category_id), cadence),
            None => cadence,
        }
    }
}

fn link_label<T: LineItem>(item: &T, names: &LinkNames) -> String {
    let links = item.links();
    let mut parts = Vec::new();
    if let Some(asset) = links.asset {
        parts.push(names.asset(asset));
    }
    if let Some(liability) = links.liability {
        parts.push(names.liability(liability));
    }
    parts.join(", ")
}

/// Format effective items of one kind as a table
pub fn format_item_list<T: ItemColumns>(
    items: &[Effective<T>],
    names: &LinkNames,
    currency_symbol: &str,
) -> String {
    if items.is_empty() {
        return format!("No {} found.", T::KIND);
    }

    let name_width = items
        .iter()
        .map(|e| e.item.name().len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<8}  {:<6}  {:<6}  {:>14}  {:<24}  {}\n",
        "Name",
        "Scenario",
        "Toggle",
        "Status",
        T::AMOUNT_HEADER,
        "Linked To",
        "Details",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<8}  {:-<6}  {:-<6}  {:->14}  {:-<24}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for effective in items {
        let item = &effective.item;
        output.push_str(&format!(
            "{:<name_width$}  {:<8}  {:<6}  {:<6}  {:>14}  {:<24}  {}\n",
            item.name(),
            item.scenario(),
            item.include_toggle(),
            effective.effective_status,
            effective.counted_amount.format_with_symbol(currency_symbol),
            link_label(item, names),
            item.detail(names),
            name_width = name_width,
        ));
    }

    let counted: crate::models::Money = items
        .iter()
        .filter(|e| e.is_on())
        .map(|e| e.counted_amount)
        .sum();
    output.push_str(&format!(
        "{:<name_width$}  {:<8}  {:<6}  {:<6}  {:>14}\n",
        "TOTAL (on)",
        "",
        "",
        "",
        counted.format_with_symbol(currency_symbol),
        name_width = name_width,
    ));

    output
}

/// Format a single item's details
pub fn format_item_details<T: ItemColumns>(
    effective: &Effective<T>,
    names: &LinkNames,
    currency_symbol: &str,
) -> String {
    let item = &effective.item;
    let mut output = String::new();

    output.push_str(&format!("{}: {}\n", T::KIND.entity_name(), item.name()));
    output.push_str(&format!("  ID:             {}\n", item.id()));
    output.push_str(&format!("  Scenario:       {}\n", item.scenario()));
    output.push_str(&format!("  Toggle:         {}\n", item.include_toggle()));
    output.push_str(&format!("  Effective:      {}\n", effective.effective_status));
    output.push_str(&format!(
        "  {:<15} {}\n",
        format!("{}:", T::AMOUNT_HEADER),
        effective.counted_amount.format_with_symbol(currency_symbol)
    ));

    let links = link_label(item, names);
    if !links.is_empty() {
        output.push_str(&format!("  Linked To:      {}\n", links));
    }
    let detail = item.detail(names);
    if !detail.is_empty() {
        output.push_str(&format!("  Details:        {}\n", detail));
    }

    output
}
