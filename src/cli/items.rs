//! Line item CLI commands
//!
//! Every kind shares the same list/show/toggle/amount/rename/retag/remove
//! commands; `add` and the link and category commands are per kind.

use clap::{Args, Subcommand};

use super::{parse_money, parse_scenario, resolve_scenario};
use crate::config::settings::Settings;
use crate::display::{format_item_details, format_item_list, ItemColumns, LinkNames};
use crate::error::{PlannerError, PlannerResult};
use crate::models::{
    Asset, Bill, CategoryKind, Expense, IncludeToggle, Income, ItemKind, Liability,
    Planner, PlannerId, Scenario, ScenarioFilter,
};
use crate::services::{Effective, ItemService, StoredItem, TotalsService};
use crate::storage::Storage;

/// Options accepted by every `add` command
#[derive(Args)]
pub struct AddOptions {
    /// Scenario tag (defaults to ALL)
    #[arg(short, long)]
    scenario: Option<String>,
    /// Add the item switched off
    #[arg(long)]
    off: bool,
    /// Free-form notes
    #[arg(long)]
    notes: Option<String>,
}

/// Commands shared by all item kinds
#[derive(Subcommand)]
pub enum ItemCommands {
    /// List items with their effective status
    List {
        /// Scenario selector
        #[arg(short, long)]
        scenario: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one item
    Show {
        /// Item name or ID
        item: String,
    },
    /// Switch an item on or off; without a state the toggle flips
    Toggle {
        /// Item name or ID
        item: String,
        /// "on" or "off"
        state: Option<String>,
    },
    /// Change the amount an item contributes
    Amount {
        /// Item name or ID
        item: String,
        /// New amount (e.g., "1200.00")
        amount: String,
    },
    /// Rename an item
    Rename {
        /// Item name or ID
        item: String,
        /// New name
        name: String,
    },
    /// Change the scenario an item is tagged with
    Retag {
        /// Item name or ID
        item: String,
        /// Scenario identifier, or ALL
        scenario: String,
    },
    /// Delete an item
    Remove {
        /// Item name or ID
        item: String,
    },
}

/// Link commands for kinds that can depend on other items
#[derive(Subcommand)]
pub enum LinkCommands {
    /// Replace an item's links
    Link {
        /// Item name or ID
        item: String,
        /// Asset name or ID
        #[arg(short, long)]
        asset: Option<String>,
        /// Liability name or ID
        #[arg(short, long)]
        liability: Option<String>,
    },
    /// Remove all links from an item
    Unlink {
        /// Item name or ID
        item: String,
    },
}

/// Category command for expenses and bills
#[derive(Subcommand)]
pub enum CategorizeCommands {
    /// Set or clear an item's category
    Categorize {
        /// Item name or ID
        item: String,
        /// Category name or ID; omit to clear
        category: Option<String>,
    },
}

/// Asset subcommands
#[derive(Subcommand)]
pub enum AssetCommands {
    /// Add an asset
    Add {
        /// Asset name
        name: String,
        /// Sale value (e.g., "250000")
        value: String,
        #[command(flatten)]
        options: AddOptions,
    },
    #[command(flatten)]
    Common(ItemCommands),
}

/// Liability subcommands
#[derive(Subcommand)]
pub enum LiabilityCommands {
    /// Add a liability
    Add {
        /// Liability name
        name: String,
        /// Monthly cost (e.g., "1200")
        monthly_cost: String,
        /// Outstanding principal
        #[arg(long)]
        principal: Option<String>,
        /// Asset the liability is secured on
        #[arg(short, long)]
        asset: Option<String>,
        #[command(flatten)]
        options: AddOptions,
    },
    #[command(flatten)]
    Links(LinkCommands),
    #[command(flatten)]
    Common(ItemCommands),
}

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Add an income source
    Add {
        /// Income name
        name: String,
        /// Monthly amount (e.g., "4000")
        amount: String,
        #[command(flatten)]
        options: AddOptions,
    },
    #[command(flatten)]
    Common(ItemCommands),
}

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Add an expense
    Add {
        /// Expense name
        name: String,
        /// Monthly amount (e.g., "600")
        amount: String,
        /// Expense category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Asset the expense depends on
        #[arg(short, long)]
        asset: Option<String>,
        /// Liability the expense depends on
        #[arg(short, long)]
        liability: Option<String>,
        #[command(flatten)]
        options: AddOptions,
    },
    #[command(flatten)]
    Categorize(CategorizeCommands),
    #[command(flatten)]
    Links(LinkCommands),
    #[command(flatten)]
    Common(ItemCommands),
}

/// Bill subcommands
#[derive(Subcommand)]
pub enum BillCommands {
    /// Add a bill
    Add {
        /// Bill name
        name: String,
        /// Amount paid each time the bill falls due
        amount: String,
        /// Months between payments (1-12)
        #[arg(short, long, default_value = "1")]
        interval: u8,
        /// Bill category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Asset the bill depends on
        #[arg(short, long)]
        asset: Option<String>,
        /// Liability the bill depends on
        #[arg(short, long)]
        liability: Option<String>,
        #[command(flatten)]
        options: AddOptions,
    },
    /// Change how often a bill falls due
    Interval {
        /// Bill name or ID
        item: String,
        /// Months between payments (1-12)
        months: u8,
    },
    #[command(flatten)]
    Categorize(CategorizeCommands),
    #[command(flatten)]
    Links(LinkCommands),
    #[command(flatten)]
    Common(ItemCommands),
}

/// Kind-specific glue between the shared commands and the services
trait CliItem: StoredItem + ItemColumns {
    fn list_effective(
        totals: &TotalsService<'_, Storage>,
        planner: PlannerId,
        scenario: &Scenario,
    ) -> PlannerResult<Vec<Effective<Self>>>;

    fn set_notes(&mut self, notes: Option<String>);
}

impl CliItem for Asset {
    fn list_effective(
        totals: &TotalsService<'_, Storage>,
        planner: PlannerId,
        scenario: &Scenario,
    ) -> PlannerResult<Vec<Effective<Self>>> {
        totals.list_effective_assets(planner, scenario)
    }

    fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }
}

impl CliItem for Liability {
    fn list_effective(
        totals: &TotalsService<'_, Storage>,
        planner: PlannerId,
        scenario: &Scenario,
    ) -> PlannerResult<Vec<Effective<Self>>> {
        totals.list_effective_liabilities(planner, scenario)
    }

    fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }
}

impl CliItem for Income {
    fn list_effective(
        totals: &TotalsService<'_, Storage>,
        planner: PlannerId,
        scenario: &Scenario,
    ) -> PlannerResult<Vec<Effective<Self>>> {
        totals.list_effective_income(planner, scenario)
    }

    fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }
}

impl CliItem for Expense {
    fn list_effective(
        totals: &TotalsService<'_, Storage>,
        planner: PlannerId,
        scenario: &Scenario,
    ) -> PlannerResult<Vec<Effective<Self>>> {
        totals.list_effective_expenses(planner, scenario)
    }

    fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }
}

impl CliItem for Bill {
    fn list_effective(
        totals: &TotalsService<'_, Storage>,
        planner: PlannerId,
        scenario: &Scenario,
    ) -> PlannerResult<Vec<Effective<Self>>> {
        totals.list_effective_bills(planner, scenario)
    }

    fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }
}

fn link_names(storage: &Storage, planner: PlannerId) -> PlannerResult<LinkNames> {
    let everything = ScenarioFilter::everything();
    let assets = storage.assets.list_for_planner(planner, &everything)?;
    let liabilities = storage.liabilities.list_for_planner(planner, &everything)?;
    let categories = storage.categories.list_for_planner(planner, None)?;
    Ok(LinkNames::new(&assets, &liabilities, &categories))
}

fn with_options<T: CliItem>(mut item: T, options: AddOptions) -> PlannerResult<T> {
    if let Some(scenario) = options.scenario {
        item.set_scenario(parse_scenario(&scenario)?);
    }
    if options.off {
        item.set_include_toggle(IncludeToggle::Off);
    }
    item.set_notes(options.notes);
    Ok(item)
}

fn add_item<T: CliItem>(storage: &Storage, item: T) -> PlannerResult<()> {
    let item = ItemService::new(storage).add(item)?;
    println!("Added {}: {}", T::KIND.entity_name().to_lowercase(), item.name());
    println!("  Scenario: {}", item.scenario());
    println!("  Toggle: {}", item.include_toggle());
    println!("  ID: {}", item.id());
    Ok(())
}

/// Print a kind's items under a selector, as a table or as JSON
pub(crate) fn print_effective_list(
    storage: &Storage,
    settings: &Settings,
    planner: &Planner,
    kind: ItemKind,
    scenario: &Scenario,
    json: bool,
) -> PlannerResult<()> {
    match kind {
        ItemKind::Asset => print_list::<Asset>(storage, settings, planner, scenario, json),
        ItemKind::Liability => print_list::<Liability>(storage, settings, planner, scenario, json),
        ItemKind::Income => print_list::<Income>(storage, settings, planner, scenario, json),
        ItemKind::Expense => print_list::<Expense>(storage, settings, planner, scenario, json),
        ItemKind::Bill => print_list::<Bill>(storage, settings, planner, scenario, json),
    }
}

fn print_list<T: CliItem>(
    storage: &Storage,
    settings: &Settings,
    planner: &Planner,
    scenario: &Scenario,
    json: bool,
) -> PlannerResult<()> {
    let items = T::list_effective(&TotalsService::new(storage), planner.id, scenario)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        let names = link_names(storage, planner.id)?;
        print!(
            "{}",
            format_item_list(&items, &names, &settings.currency_symbol)
        );
    }
    Ok(())
}

fn handle_common<T: CliItem>(
    storage: &Storage,
    settings: &Settings,
    planner: &Planner,
    cmd: ItemCommands,
) -> PlannerResult<()> {
    let service = ItemService::new(storage);
    let noun = T::KIND.entity_name();

    match cmd {
        ItemCommands::List { scenario, json } => {
            let scenario = resolve_scenario(settings, scenario.as_deref())?;
            print_list::<T>(storage, settings, planner, &scenario, json)?;
        }

        ItemCommands::Show { item } => {
            let found: T = service.require(planner.id, &item)?;
            let listed = T::list_effective(&TotalsService::new(storage), planner.id, found.scenario())?;
            let effective = listed
                .into_iter()
                .find(|e| e.item.id() == found.id())
                .ok_or_else(|| PlannerError::item_not_found(T::KIND, &item))?;
            let names = link_names(storage, planner.id)?;
            print!(
                "{}",
                format_item_details(&effective, &names, &settings.currency_symbol)
            );
        }

        ItemCommands::Toggle { item, state } => {
            let state = state
                .as_deref()
                .map(str::parse::<IncludeToggle>)
                .transpose()
                .map_err(PlannerError::Validation)?;
            let updated: T = service.set_toggle(planner.id, &item, state)?;
            println!("{} '{}' is now {}", noun, updated.name(), updated.include_toggle());
        }

        ItemCommands::Amount { item, amount } => {
            let updated: T = service.set_amount(planner.id, &item, parse_money(&amount)?)?;
            println!(
                "{} '{}' now counts {}",
                noun,
                updated.name(),
                updated.counted_amount().format_with_symbol(&settings.currency_symbol)
            );
        }

        ItemCommands::Rename { item, name } => {
            let updated: T = service.rename(planner.id, &item, &name)?;
            println!("Renamed {} to '{}'", noun.to_lowercase(), updated.name());
        }

        ItemCommands::Retag { item, scenario } => {
            let updated: T = service.set_scenario(planner.id, &item, parse_scenario(&scenario)?)?;
            println!("{} '{}' is now in scenario {}", noun, updated.name(), updated.scenario());
        }

        ItemCommands::Remove { item } => {
            let removed: T = service.remove(planner.id, &item)?;
            println!("Removed {}: {}", noun.to_lowercase(), removed.name());
        }
    }

    Ok(())
}

fn handle_links<T: CliItem>(storage: &Storage, planner: &Planner, cmd: LinkCommands) -> PlannerResult<()> {
    let service = ItemService::new(storage);
    let noun = T::KIND.entity_name();

    match cmd {
        LinkCommands::Link {
            item,
            asset,
            liability,
        } => {
            if asset.is_none() && liability.is_none() {
                println!("No links specified. Use --asset or --liability, or 'unlink' to clear.");
                return Ok(());
            }
            let updated: T =
                service.set_links(planner.id, &item, asset.as_deref(), liability.as_deref())?;
            println!("Linked {} '{}'", noun.to_lowercase(), updated.name());
        }

        LinkCommands::Unlink { item } => {
            let updated: T = service.set_links(planner.id, &item, None, None)?;
            println!("Cleared links of {} '{}'", noun.to_lowercase(), updated.name());
        }
    }

    Ok(())
}

fn handle_categorize<T: CliItem>(
    storage: &Storage,
    planner: &Planner,
    cmd: CategorizeCommands,
) -> PlannerResult<()> {
    let CategorizeCommands::Categorize { item, category } = cmd;
    let updated: T = ItemService::new(storage).set_category(planner.id, &item, category.as_deref())?;
    match category {
        Some(category) => println!("{} '{}' filed under {}", T::KIND.entity_name(), updated.name(), category),
        None => println!("Cleared category of '{}'", updated.name()),
    }
    Ok(())
}

/// Handle an asset command
pub fn handle_asset_command(
    storage: &Storage,
    settings: &Settings,
    planner: &Planner,
    cmd: AssetCommands,
) -> PlannerResult<()> {
    match cmd {
        AssetCommands::Add {
            name,
            value,
            options,
        } => {
            let asset = Asset::new(planner.id, name.trim(), parse_money(&value)?);
            add_item(storage, with_options(asset, options)?)
        }
        AssetCommands::Common(cmd) => handle_common::<Asset>(storage, settings, planner, cmd),
    }
}

/// Handle a liability command
pub fn handle_liability_command(
    storage: &Storage,
    settings: &Settings,
    planner: &Planner,
    cmd: LiabilityCommands,
) -> PlannerResult<()> {
    match cmd {
        LiabilityCommands::Add {
            name,
            monthly_cost,
            principal,
            asset,
            options,
        } => {
            let links = ItemService::new(storage).resolve_links(planner.id, asset.as_deref(), None)?;
            let mut liability = Liability::new(planner.id, name.trim(), parse_money(&monthly_cost)?);
            liability.principal = principal.as_deref().map(parse_money).transpose()?;
            liability.set_linked_asset(links.asset);
            add_item(storage, with_options(liability, options)?)
        }
        LiabilityCommands::Links(cmd) => handle_links::<Liability>(storage, planner, cmd),
        LiabilityCommands::Common(cmd) => {
            handle_common::<Liability>(storage, settings, planner, cmd)
        }
    }
}

/// Handle an income command
pub fn handle_income_command(
    storage: &Storage,
    settings: &Settings,
    planner: &Planner,
    cmd: IncomeCommands,
) -> PlannerResult<()> {
    match cmd {
        IncomeCommands::Add {
            name,
            amount,
            options,
        } => {
            let income = Income::new(planner.id, name.trim(), parse_money(&amount)?);
            add_item(storage, with_options(income, options)?)
        }
        IncomeCommands::Common(cmd) => handle_common::<Income>(storage, settings, planner, cmd),
    }
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    planner: &Planner,
    cmd: ExpenseCommands,
) -> PlannerResult<()> {
    match cmd {
        ExpenseCommands::Add {
            name,
            amount,
            category,
            asset,
            liability,
            options,
        } => {
            let service = ItemService::new(storage);
            let mut expense = Expense::new(planner.id, name.trim(), parse_money(&amount)?);
            expense.set_links(service.resolve_links(planner.id, asset.as_deref(), liability.as_deref())?);
            if let Some(category) = category {
                expense.set_category(Some(service.resolve_category(
                    planner.id,
                    CategoryKind::Expense,
                    &category,
                )?));
            }
            add_item(storage, with_options(expense, options)?)
        }
        ExpenseCommands::Categorize(cmd) => handle_categorize::<Expense>(storage, planner, cmd),
        ExpenseCommands::Links(cmd) => handle_links::<Expense>(storage, planner, cmd),
        ExpenseCommands::Common(cmd) => handle_common::<Expense>(storage, settings, planner, cmd),
    }
}

/// Handle a bill command
pub fn handle_bill_command(
    storage: &Storage,
    settings: &Settings,
    planner: &Planner,
    cmd: BillCommands,
) -> PlannerResult<()> {
    match cmd {
        BillCommands::Add {
            name,
            amount,
            interval,
            category,
            asset,
            liability,
            options,
        } => {
            let service = ItemService::new(storage);
            let mut bill = Bill::new(planner.id, name.trim(), parse_money(&amount)?, interval);
            bill.set_links(service.resolve_links(planner.id, asset.as_deref(), liability.as_deref())?);
            if let Some(category) = category {
                bill.set_category(Some(service.resolve_category(
                    planner.id,
                    CategoryKind::Bill,
                    &category,
                )?));
            }
            add_item(storage, with_options(bill, options)?)
        }
        BillCommands::Interval { item, months } => {
            let updated = ItemService::new(storage).update(planner.id, &item, |bill: &mut Bill| {
                bill.set_interval_months(months);
                Ok(())
            })?;
            println!(
                "Bill '{}' now falls due every {} month(s), {} per month",
                updated.name,
                updated.interval_months,
                updated.monthly_average().format_with_symbol(&settings.currency_symbol)
            );
            Ok(())
        }
        BillCommands::Categorize(cmd) => handle_categorize::<Bill>(storage, planner, cmd),
        BillCommands::Links(cmd) => handle_links::<Bill>(storage, planner, cmd),
        BillCommands::Common(cmd) => handle_common::<Bill>(storage, settings, planner, cmd),
    }
}
