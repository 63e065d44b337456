//! Bill model
//!
//! A bill is paid every `interval_months` months. Totals count its per-month
//! equivalent, `bill_amount / interval_months`, which is derived on every read
//! and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AssetId, BillId, CategoryId, LiabilityId, PlannerId};
use super::item::{
    impl_line_item_common, validate_name, validate_amount, ItemKind, ItemValidationError,
    LineItem, Links,
};
use super::money::Money;
use super::scenario::Scenario;
use super::toggle::IncludeToggle;

pub const MIN_INTERVAL_MONTHS: u8 = 1;
pub const MAX_INTERVAL_MONTHS: u8 = 12;

fn default_interval() -> u8 {
    MIN_INTERVAL_MONTHS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: BillId,
    pub planner_id: PlannerId,
    pub name: String,
    pub include_toggle: IncludeToggle,
    #[serde(default)]
    pub scenario: Scenario,
    /// Amount paid each time the bill falls due
    pub bill_amount: Money,
    #[serde(default = "default_interval")]
    pub interval_months: u8,
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

impl Bill {
    pub fn new(
        planner_id: PlannerId,
        name: impl Into<String>,
        bill_amount: Money,
        interval_months: u8,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BillId::new(),
            planner_id,
            name: name.into(),
            include_toggle: IncludeToggle::On,
            scenario: Scenario::All,
            bill_amount,
            interval_months,
            category_id: None,
            linked_asset_id: None,
            linked_liability_id: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Per-month equivalent of the bill, rounded to the cent
    ///
    /// An out-of-range interval of zero is treated as monthly so that a
    /// malformed record can never divide by zero.
    pub fn monthly_average(&self) -> Money {
        self.bill_amount
            .divide_rounded(u32::from(self.interval_months))
            .unwrap_or(self.bill_amount)
    }

    pub fn set_bill_amount(&mut self, amount: Money) {
        self.bill_amount = amount;
        self.updated_at = Utc::now();
    }

    pub fn set_interval_months(&mut self, months: u8) {
        self.interval_months = months;
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

impl LineItem for Bill {
    type Id = BillId;

    const KIND: ItemKind = ItemKind::Bill;

    impl_line_item_common!();

    fn links(&self) -> Links {
        Links {
            asset: self.linked_asset_id,
            liability: self.linked_liability_id,
        }
    }

    fn counted_amount(&self) -> Money {
        self.monthly_average()
    }

    fn periodic_average(&self) -> Option<Money> {
        Some(self.monthly_average())
    }

    fn validate(&self) -> Result<(), ItemValidationError> {
        validate_name(&self.name)?;
        validate_amount(self.bill_amount, "Bill amount")?;
        if !(MIN_INTERVAL_MONTHS..=MAX_INTERVAL_MONTHS).contains(&self.interval_months) {
            return Err(ItemValidationError::IntervalOutOfRange(self.interval_months));
        }
        Ok(())
    }
}
