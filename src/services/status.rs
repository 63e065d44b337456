//! Effective-status resolution
//!
//! An item counts toward the plan only if its own toggle is on and nothing it
//! links to is off. Disablement travels one hop along a link. For expenses and
//! bills linked to a liability, the liability's *effective* status is used, so
//! an expense on a loan secured by a switched-off asset drops out as well.
//!
//! Resolution is a single ordered pass: asset toggles first, then liability
//! statuses (which read asset toggles), then any expense or bill (which read
//! both). The link graph is at most two deep, so no recursion or cycle
//! detection is needed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Asset, AssetId, IncludeToggle, Liability, LiabilityId, LineItem, Money};

/// Computed inclusion of an item, after following its links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveStatus {
    On,
    Off,
}

impl EffectiveStatus {
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }
}

impl From<IncludeToggle> for EffectiveStatus {
    fn from(toggle: IncludeToggle) -> Self {
        match toggle {
            IncludeToggle::On => Self::On,
            IncludeToggle::Off => Self::Off,
        }
    }
}

impl fmt::Display for EffectiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.pad("on"),
            Self::Off => f.pad("off"),
        }
    }
}

/// Resolve one item from its own toggle and the state of what it links to
///
/// `linked_asset` is the stored toggle of the linked asset, `linked_liability`
/// the already-resolved status of the linked liability. Pass `None` for a
/// missing or dangling link.
pub fn resolve_status(
    own: IncludeToggle,
    linked_asset: Option<IncludeToggle>,
    linked_liability: Option<EffectiveStatus>,
) -> EffectiveStatus {
    if own.is_off() {
        return EffectiveStatus::Off;
    }
    if linked_asset.is_some_and(|toggle| toggle.is_off()) {
        return EffectiveStatus::Off;
    }
    if linked_liability.is_some_and(|status| status.is_off()) {
        return EffectiveStatus::Off;
    }
    EffectiveStatus::On
}

/// Resolve `item` given the records it may link to
///
/// Records that are not actually the item's links are ignored, as is a
/// liability's own asset link unless that asset is `linked_asset`.
pub fn resolve_effective_status<T: LineItem>(
    item: &T,
    linked_asset: Option<&Asset>,
    linked_liability: Option<&Liability>,
) -> EffectiveStatus {
    let resolver = StatusResolver::new(linked_asset.into_iter(), linked_liability.into_iter());
    resolver.status_of(item)
}

/// Lookup tables for one planner snapshot, built in dependency order
#[derive(Debug, Default)]
pub struct StatusResolver {
    asset_toggles: HashMap<AssetId, IncludeToggle>,
    liability_statuses: HashMap<LiabilityId, EffectiveStatus>,
}

impl StatusResolver {
    /// Build the tables from every asset and liability an item could link to
    pub fn new<'a, A, L>(assets: A, liabilities: L) -> Self
    where
        A: IntoIterator<Item = &'a Asset>,
        L: IntoIterator<Item = &'a Liability>,
    {
        let mut resolver = Self {
            asset_toggles: assets
                .into_iter()
                .map(|asset| (asset.id, asset.include_toggle))
                .collect(),
            liability_statuses: HashMap::new(),
        };

        // liabilities only link to assets, so the asset table is complete here
        let liability_statuses = liabilities
            .into_iter()
            .map(|liability| (liability.id, resolver.status_of(liability)))
            .collect();
        resolver.liability_statuses = liability_statuses;

        resolver
    }

    /// Resolver with only asset toggles, enough for assets and liabilities
    pub fn for_assets<'a, A>(assets: A) -> Self
    where
        A: IntoIterator<Item = &'a Asset>,
    {
        Self::new(assets, std::iter::empty())
    }

    /// Effective status of `item`; dangling links count as no link
    pub fn status_of<T: LineItem>(&self, item: &T) -> EffectiveStatus {
        let links = item.links();
        let kind = T::KIND;

        let asset = links.asset.and_then(|id| {
            let toggle = self.asset_toggles.get(&id).copied();
            if toggle.is_none() {
                tracing::warn!(
                    kind = %kind,
                    item = %item.id(),
                    asset = %id,
                    "linked asset not found; treating as unlinked"
                );
            }
            toggle
        });

        let liability = links.liability.and_then(|id| {
            let status = self.liability_statuses.get(&id).copied();
            if status.is_none() {
                tracing::warn!(
                    kind = %kind,
                    item = %item.id(),
                    liability = %id,
                    "linked liability not found; treating as unlinked"
                );
            }
            status
        });

        resolve_status(item.include_toggle(), asset, liability)
    }

    pub fn liability_status(&self, id: LiabilityId) -> Option<EffectiveStatus> {
        self.liability_statuses.get(&id).copied()
    }

    /// Annotate `item` with its effective status
    pub fn annotate<T: LineItem>(&self, item: T) -> Effective<T> {
        let effective_status = self.status_of(&item);
        Effective::new(item, effective_status)
    }
}

/// A stored record plus its computed status, for browse views
///
/// Serializes as the record's own fields followed by `effectiveStatus` and
/// `countedAmount` (the figure totals use). Bills also carry `monthlyAverage`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Effective<T> {
    #[serde(flatten)]
    pub item: T,
    pub effective_status: EffectiveStatus,
    pub counted_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_average: Option<Money>,
}

impl<T: LineItem> Effective<T> {
    pub fn new(item: T, effective_status: EffectiveStatus) -> Self {
        let counted_amount = item.counted_amount();
        let monthly_average = item.periodic_average();
        Self {
            item,
            effective_status,
            counted_amount,
            monthly_average,
        }
    }

    pub fn is_on(&self) -> bool {
        self.effective_status.is_on()
    }
}
