//! Liability model
//!
//! A recurring debt cost such as a mortgage or car loan. A liability may be
//! secured on an asset: when the asset is switched off (sold, or not bought
//! in this scenario) the liability stops counting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AssetId, LiabilityId, PlannerId};
use super::item::{
    impl_line_item_common, validate_name, validate_amount, ItemKind, ItemValidationError,
    LineItem, Links,
};
use super::money::Money;
use super::scenario::Scenario;
use super::toggle::IncludeToggle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liability {
    pub id: LiabilityId,
    pub planner_id: PlannerId,
    pub name: String,
    pub include_toggle: IncludeToggle,
    #[serde(default)]
    pub scenario: Scenario,
    pub monthly_cost: Money,
    /// Outstanding principal; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_asset_id: Option<AssetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Liability {
    pub fn new(planner_id: PlannerId, name: impl Into<String>, monthly_cost: Money) -> Self {
        let now = Utc::now();
        Self {
            id: LiabilityId::new(),
            planner_id,
            name: name.into(),
            include_toggle: IncludeToggle::On,
            scenario: Scenario::All,
            monthly_cost,
            principal: None,
            linked_asset_id: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style helper to secure the liability on an asset
    pub fn linked_to(mut self, asset_id: AssetId) -> Self {
        self.linked_asset_id = Some(asset_id);
        self
    }

    pub fn set_monthly_cost(&mut self, monthly_cost: Money) {
        self.monthly_cost = monthly_cost;
        self.updated_at = Utc::now();
    }

    pub fn set_linked_asset(&mut self, asset_id: Option<AssetId>) {
        self.linked_asset_id = asset_id;
        self.updated_at = Utc::now();
    }
}

impl LineItem for Liability {
    type Id = LiabilityId;

    const KIND: ItemKind = ItemKind::Liability;

    impl_line_item_common!();

    // A liability never links to another liability
    fn links(&self) -> Links {
        Links {
            asset: self.linked_asset_id,
            liability: None,
        }
    }

    fn counted_amount(&self) -> Money {
        self.monthly_cost
    }

    fn validate(&self) -> Result<(), ItemValidationError> {
        validate_name(&self.name)?;
        validate_amount(self.monthly_cost, "Monthly cost")?;
        if let Some(principal) = self.principal {
            validate_amount(principal, "Principal")?;
        }
        Ok(())
    }
}
