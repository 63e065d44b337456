//! Expense model
//!
//! A regular monthly spend. An expense may hang off an asset (car insurance
//! on the car) and/or a liability (fees on a loan), and drops out of the plan
//! when either of those is off.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AssetId, CategoryId, ExpenseId, LiabilityId, PlannerId};
use super::item::{
    impl_line_item_common, validate_name, validate_amount, ItemKind, ItemValidationError,
    LineItem, Links,
};
use super::money::Money;
use super::scenario::Scenario;
use super::toggle::IncludeToggle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub planner_id: PlannerId,
    pub name: String,
    pub include_toggle: IncludeToggle,
    #[serde(default)]
    pub scenario: Scenario,
    pub monthly_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_asset_id: Option<AssetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_liability_id: Option<LiabilityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(planner_id: PlannerId, name: impl Into<String>, monthly_amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            planner_id,
            name: name.into(),
            include_toggle: IncludeToggle::On,
            scenario: Scenario::All,
            monthly_amount,
            category_id: None,
            linked_asset_id: None,
            linked_liability_id: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_monthly_amount(&mut self, amount: Money) {
        self.monthly_amount = amount;
        self.updated_at = Utc::now();
    }

    pub fn set_links(&mut self, links: Links) {
        self.linked_asset_id = links.asset;
        self.linked_liability_id = links.liability;
        self.updated_at = Utc::now();
    }

    pub fn set_category(&mut self, category_id: Option<CategoryId>) {
        self.category_id = category_id;
        self.updated_at = Utc::now();
    }
}

impl LineItem for Expense {
    type Id = ExpenseId;

    const KIND: ItemKind = ItemKind::Expense;

    impl_line_item_common!();

    fn links(&self) -> Links {
        Links {
            asset: self.linked_asset_id,
            liability: self.linked_liability_id,
        }
    }

    fn counted_amount(&self) -> Money {
        self.monthly_amount
    }

    fn validate(&self) -> Result<(), ItemValidationError> {
        validate_name(&self.name)?;
        validate_amount(self.monthly_amount, "Monthly amount")
    }
}
