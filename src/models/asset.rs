//! Asset model
//!
//! Something the household owns and might sell (a house, a car). Liabilities,
//! expenses and bills can link to an asset; switching the asset off switches
//! them off too.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AssetId, PlannerId};
use super::item::{
    impl_line_item_common, validate_name, validate_amount, ItemKind, ItemValidationError,
    LineItem,
};
use super::money::Money;
use super::scenario::Scenario;
use super::toggle::IncludeToggle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: AssetId,
    pub planner_id: PlannerId,
    pub name: String,
    pub include_toggle: IncludeToggle,
    #[serde(default)]
    pub scenario: Scenario,
    /// Proceeds if the asset is sold
    pub sale_value: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Create a new asset; assets start switched off, as in a fresh plan
    /// nothing is being sold yet
    pub fn new(planner_id: PlannerId, name: impl Into<String>, sale_value: Money) -> Self {
        let now = Utc::now();
        Self {
            id: AssetId::new(),
            planner_id,
            name: name.into(),
            include_toggle: IncludeToggle::Off,
            scenario: Scenario::All,
            sale_value,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_sale_value(&mut self, sale_value: Money) {
        self.sale_value = sale_value;
        self.updated_at = Utc::now();
    }
}

impl LineItem for Asset {
    type Id = AssetId;

    const KIND: ItemKind = ItemKind::Asset;

    impl_line_item_common!();

    fn counted_amount(&self) -> Money {
        self.sale_value
    }

    fn validate(&self) -> Result<(), ItemValidationError> {
        validate_name(&self.name)?;
        validate_amount(self.sale_value, "Sale value")
    }
}
