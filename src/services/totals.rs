//! Monthly aggregation
//!
//! Pulls one planner snapshot per kind from a [`PlannerSource`], resolves the
//! effective status of every item, and sums the ones that are on. Nothing is
//! cached; each call reads a fresh snapshot, so two calls with no writes in
//! between return identical totals.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{PlannerError, PlannerResult};
use crate::models::{
    Asset, Bill, Expense, Income, ItemKind, Liability, LineItem, Money, PlannerId, Scenario,
    ScenarioFilter,
};
use crate::storage::PlannerSource;

use super::status::{Effective, StatusResolver};

/// Derived monthly figures for one planner under one scenario selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotals {
    pub monthly_income: Money,
    pub monthly_expenses: Money,
    pub monthly_bills: Money,
    pub monthly_liabilities: Money,
    pub total_monthly_outgoings: Money,
    pub net_cash_flow: Money,
    pub asset_sales: Money,
}

impl MonthlyTotals {
    /// Build totals from the per-kind sums, deriving outgoings and net cash flow
    pub fn from_sums(
        income: Money,
        expenses: Money,
        bills: Money,
        liabilities: Money,
        asset_sales: Money,
    ) -> Self {
        let total_monthly_outgoings = expenses + bills + liabilities;
        Self {
            monthly_income: income,
            monthly_expenses: expenses,
            monthly_bills: bills,
            monthly_liabilities: liabilities,
            total_monthly_outgoings,
            net_cash_flow: income - total_monthly_outgoings,
            asset_sales,
        }
    }
}

/// Every item visible under one selector, annotated with its effective status
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerSnapshot {
    pub assets: Vec<Effective<Asset>>,
    pub liabilities: Vec<Effective<Liability>>,
    pub income: Vec<Effective<Income>>,
    pub expenses: Vec<Effective<Expense>>,
    pub bills: Vec<Effective<Bill>>,
}

impl PlannerSnapshot {
    /// Sum the counted amount of every item that is on
    pub fn totals(&self) -> MonthlyTotals {
        MonthlyTotals::from_sums(
            active_sum(&self.income),
            active_sum(&self.expenses),
            active_sum(&self.bills),
            active_sum(&self.liabilities),
            active_sum(&self.assets),
        )
    }
}

fn active_sum<T: LineItem>(items: &[Effective<T>]) -> Money {
    items
        .iter()
        .filter(|item| item.is_on())
        .map(|item| item.counted_amount)
        .sum()
}

/// Read-only aggregation over a planner source
pub struct TotalsService<'a, S: PlannerSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: PlannerSource + ?Sized> TotalsService<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Monthly totals for `planner` under `scenario`
    ///
    /// An unknown planner yields all-zero totals. Any failed fetch aborts the
    /// whole computation.
    pub fn compute_monthly_totals(
        &self,
        planner: PlannerId,
        scenario: &Scenario,
    ) -> PlannerResult<MonthlyTotals> {
        let snapshot = self.snapshot(planner, scenario)?;
        let totals = snapshot.totals();

        debug!(
            planner = %planner,
            scenario = %scenario,
            income = %totals.monthly_income,
            outgoings = %totals.total_monthly_outgoings,
            net = %totals.net_cash_flow,
            "computed monthly totals"
        );

        Ok(totals)
    }

    /// All five kinds, filtered and annotated, from a single read of each kind
    pub fn snapshot(&self, planner: PlannerId, scenario: &Scenario) -> PlannerResult<PlannerSnapshot> {
        let filter = ScenarioFilter::new(scenario.clone());
        let links = self.link_targets(planner)?;
        let resolver = StatusResolver::new(&links.assets, &links.liabilities);

        let income = self.fetch(ItemKind::Income, planner, || {
            self.source.fetch_income(planner, &filter)
        })?;
        let expenses = self.fetch(ItemKind::Expense, planner, || {
            self.source.fetch_expenses(planner, &filter)
        })?;
        let bills = self.fetch(ItemKind::Bill, planner, || {
            self.source.fetch_bills(planner, &filter)
        })?;

        Ok(PlannerSnapshot {
            assets: annotate(&resolver, visible(links.assets, &filter)),
            liabilities: annotate(&resolver, visible(links.liabilities, &filter)),
            income: annotate(&resolver, income),
            expenses: annotate(&resolver, expenses),
            bills: annotate(&resolver, bills),
        })
    }

    pub fn list_effective_assets(
        &self,
        planner: PlannerId,
        scenario: &Scenario,
    ) -> PlannerResult<Vec<Effective<Asset>>> {
        let filter = ScenarioFilter::new(scenario.clone());
        let assets = self.fetch(ItemKind::Asset, planner, || {
            self.source.fetch_assets(planner, &filter)
        })?;
        Ok(annotate(&StatusResolver::default(), assets))
    }

    pub fn list_effective_liabilities(
        &self,
        planner: PlannerId,
        scenario: &Scenario,
    ) -> PlannerResult<Vec<Effective<Liability>>> {
        let filter = ScenarioFilter::new(scenario.clone());
        let assets = self.fetch(ItemKind::Asset, planner, || {
            self.source.fetch_assets(planner, &ScenarioFilter::everything())
        })?;
        let liabilities = self.fetch(ItemKind::Liability, planner, || {
            self.source.fetch_liabilities(planner, &filter)
        })?;
        Ok(annotate(&StatusResolver::for_assets(&assets), liabilities))
    }

    pub fn list_effective_income(
        &self,
        planner: PlannerId,
        scenario: &Scenario,
    ) -> PlannerResult<Vec<Effective<Income>>> {
        let filter = ScenarioFilter::new(scenario.clone());
        let income = self.fetch(ItemKind::Income, planner, || {
            self.source.fetch_income(planner, &filter)
        })?;
        Ok(annotate(&StatusResolver::default(), income))
    }

    pub fn list_effective_expenses(
        &self,
        planner: PlannerId,
        scenario: &Scenario,
    ) -> PlannerResult<Vec<Effective<Expense>>> {
        let filter = ScenarioFilter::new(scenario.clone());
        let links = self.link_targets(planner)?;
        let expenses = self.fetch(ItemKind::Expense, planner, || {
            self.source.fetch_expenses(planner, &filter)
        })?;
        let resolver = StatusResolver::new(&links.assets, &links.liabilities);
        Ok(annotate(&resolver, expenses))
    }

    pub fn list_effective_bills(
        &self,
        planner: PlannerId,
        scenario: &Scenario,
    ) -> PlannerResult<Vec<Effective<Bill>>> {
        let filter = ScenarioFilter::new(scenario.clone());
        let links = self.link_targets(planner)?;
        let bills = self.fetch(ItemKind::Bill, planner, || {
            self.source.fetch_bills(planner, &filter)
        })?;
        let resolver = StatusResolver::new(&links.assets, &links.liabilities);
        Ok(annotate(&resolver, bills))
    }

    /// Every asset and liability of the planner, whatever their scenario tag
    ///
    /// A link is followed regardless of the selector, so the lookup tables are
    /// built from the unfiltered set.
    fn link_targets(&self, planner: PlannerId) -> PlannerResult<LinkTargets> {
        let everything = ScenarioFilter::everything();
        let assets = self.fetch(ItemKind::Asset, planner, || {
            self.source.fetch_assets(planner, &everything)
        })?;
        let liabilities = self.fetch(ItemKind::Liability, planner, || {
            self.source.fetch_liabilities(planner, &everything)
        })?;
        Ok(LinkTargets {
            assets,
            liabilities,
        })
    }

    fn fetch<T, F>(&self, kind: ItemKind, planner: PlannerId, read: F) -> PlannerResult<Vec<T>>
    where
        F: FnOnce() -> PlannerResult<Vec<T>>,
    {
        match read() {
            Ok(items) => {
                debug!(kind = %kind, planner = %planner, fetched = items.len(), "fetched items");
                Ok(items)
            }
            Err(err) => {
                error!(kind = %kind, planner = %planner, error = %err, "fetch failed");
                Err(match err {
                    fetch @ PlannerError::Fetch { .. } => fetch,
                    other => PlannerError::Fetch {
                        kind,
                        planner,
                        reason: other.to_string(),
                    },
                })
            }
        }
    }
}

struct LinkTargets {
    assets: Vec<Asset>,
    liabilities: Vec<Liability>,
}

fn visible<T: LineItem>(items: Vec<T>, filter: &ScenarioFilter) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| filter.admits(item.scenario()))
        .collect()
}

fn annotate<T: LineItem>(resolver: &StatusResolver, items: Vec<T>) -> Vec<Effective<T>> {
    let kind = T::KIND;
    let annotated: Vec<_> = items.into_iter().map(|item| resolver.annotate(item)).collect();
    debug!(
        kind = %kind,
        visible = annotated.len(),
        active = annotated.iter().filter(|item| item.is_on()).count(),
        "resolved items"
    );
    annotated
}
