//! Behaviour shared by the five line-item kinds
//!
//! Assets, liabilities, income, expenses and bills all carry a toggle, a
//! scenario tag and one monetary field that feeds the monthly totals. The
//! `LineItem` trait exposes exactly what the resolver, the aggregator and the
//! generic repository need.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{AssetId, EntityId, LiabilityId, PlannerId};
use super::money::Money;
use super::scenario::Scenario;
use super::toggle::IncludeToggle;

/// Maximum item name length
pub const MAX_NAME_LEN: usize = 255;

/// The five kinds of line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Asset,
    Liability,
    Income,
    Expense,
    Bill,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Income,
        Self::Expense,
        Self::Bill,
    ];

    /// Singular entity name used in messages ("Asset not found")
    pub fn entity_name(&self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::Bill => "Bill",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Asset => "assets",
            Self::Liability => "liabilities",
            Self::Income => "income",
            Self::Expense => "expenses",
            Self::Bill => "bills",
        };
        f.pad(s)
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" | "assets" => Ok(Self::Asset),
            "liability" | "liabilities" => Ok(Self::Liability),
            "income" | "incomes" => Ok(Self::Income),
            "expense" | "expenses" => Ok(Self::Expense),
            "bill" | "bills" => Ok(Self::Bill),
            other => Err(format!(
                "Unknown item kind '{}'. Valid kinds: asset, liability, income, expense, bill",
                other
            )),
        }
    }
}

/// Outgoing links from an item to the entities that can disable it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Links {
    pub asset: Option<AssetId>,
    pub liability: Option<LiabilityId>,
}

impl Links {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.asset.is_none() && self.liability.is_none()
    }
}

/// A planner line item
pub trait LineItem: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync {
    type Id: EntityId;

    const KIND: ItemKind;

    fn id(&self) -> Self::Id;
    fn planner_id(&self) -> PlannerId;
    fn name(&self) -> &str;
    fn scenario(&self) -> &Scenario;
    fn include_toggle(&self) -> IncludeToggle;
    fn created_at(&self) -> DateTime<Utc>;

    /// Entities this item depends on; items without links return `Links::none()`
    fn links(&self) -> Links {
        Links::none()
    }

    /// The figure the monthly aggregator sums for this kind when the item is on
    fn counted_amount(&self) -> Money;

    /// Per-month average of a periodic amount, for kinds that bill periodically
    fn periodic_average(&self) -> Option<Money> {
        None
    }

    fn set_include_toggle(&mut self, toggle: IncludeToggle);
    fn set_scenario(&mut self, scenario: Scenario);
    fn set_name(&mut self, name: String);

    fn validate(&self) -> Result<(), ItemValidationError>;
}

/// Validation errors shared by all line items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativeAmount(&'static str),
    AmountTooLarge(&'static str),
    IntervalOutOfRange(u8),
}

impl fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
            Self::NegativeAmount(field) => write!(f, "{} cannot be negative", field),
            Self::AmountTooLarge(field) => {
                write!(f, "{} cannot exceed {}", field, Money::MAX)
            }
            Self::IntervalOutOfRange(months) => write!(
                f,
                "Billing interval must be between 1 and 12 months (got {})",
                months
            ),
        }
    }
}

impl std::error::Error for ItemValidationError {}

/// Check the constraints every item name must satisfy
pub fn validate_name(name: &str) -> Result<(), ItemValidationError> {
    if name.trim().is_empty() {
        return Err(ItemValidationError::EmptyName);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ItemValidationError::NameTooLong(len));
    }
    Ok(())
}

/// Amounts must lie between zero and `Money::MAX`
pub(crate) fn validate_amount(
    amount: Money,
    field: &'static str,
) -> Result<(), ItemValidationError> {
    if amount.is_negative() {
        return Err(ItemValidationError::NegativeAmount(field));
    }
    if amount.exceeds_max() {
        return Err(ItemValidationError::AmountTooLarge(field));
    }
    Ok(())
}

/// Implements the `LineItem` accessors common to every item struct
macro_rules! impl_line_item_common {
    () => {
        fn id(&self) -> Self::Id {
            self.id
        }

        fn planner_id(&self) -> PlannerId {
            self.planner_id
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn scenario(&self) -> &Scenario {
            &self.scenario
        }

        fn include_toggle(&self) -> IncludeToggle {
            self.include_toggle
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn set_include_toggle(&mut self, toggle: IncludeToggle) {
            self.include_toggle = toggle;
            self.updated_at = Utc::now();
        }

        fn set_scenario(&mut self, scenario: Scenario) {
            self.scenario = scenario;
            self.updated_at = Utc::now();
        }

        fn set_name(&mut self, name: String) {
            self.name = name;
            self.updated_at = Utc::now();
        }
    };
}

pub(crate) use impl_line_item_common;
