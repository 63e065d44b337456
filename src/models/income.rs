//! Income model
//!
//! A monthly income source. Income has no links, so its effective status is
//! always its own toggle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{IncomeId, PlannerId};
use super::item::{
    impl_line_item_common, validate_name, validate_amount, ItemKind, ItemValidationError,
    LineItem,
};
use super::money::Money;
use super::scenario::Scenario;
use super::toggle::IncludeToggle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: IncomeId,
    pub planner_id: PlannerId,
    pub name: String,
    pub include_toggle: IncludeToggle,
    #[serde(default)]
    pub scenario: Scenario,
    pub monthly_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Income {
    pub fn new(planner_id: PlannerId, name: impl Into<String>, monthly_amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: IncomeId::new(),
            planner_id,
            name: name.into(),
            include_toggle: IncludeToggle::On,
            scenario: Scenario::All,
            monthly_amount,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_monthly_amount(&mut self, amount: Money) {
        self.monthly_amount = amount;
        self.updated_at = Utc::now();
    }
}

impl LineItem for Income {
    type Id = IncomeId;

    const KIND: ItemKind = ItemKind::Income;

    impl_line_item_common!();

    fn counted_amount(&self) -> Money {
        self.monthly_amount
    }

    fn validate(&self) -> Result<(), ItemValidationError> {
        validate_name(&self.name)?;
        validate_amount(self.monthly_amount, "Monthly amount")
    }
}
