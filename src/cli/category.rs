//! Category CLI commands

use clap::Subcommand;

use crate::display::format_category_list;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{CategoryKind, Planner};
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a category
    Add {
        /// Category kind (expense or bill)
        kind: String,
        /// Category name
        name: String,
    },
    /// List categories
    List {
        /// Only show one kind (expense or bill)
        #[arg(short, long)]
        kind: Option<String>,
    },
    /// Delete a category, clearing it from items that use it
    Remove {
        /// Category kind (expense or bill)
        kind: String,
        /// Category name or ID
        category: String,
    },
}

fn parse_kind(kind: &str) -> PlannerResult<CategoryKind> {
    CategoryKind::parse(kind).ok_or_else(|| {
        PlannerError::Validation(format!(
            "Invalid category kind: '{}'. Valid kinds: expense, bill",
            kind
        ))
    })
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    planner: &Planner,
    cmd: CategoryCommands,
) -> PlannerResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::Add { kind, name } => {
            let category = service.create(planner.id, parse_kind(&kind)?, &name)?;
            println!("Created {} category: {}", category.kind, category.name);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::List { kind } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            let categories = service.list(planner.id, kind)?;
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Remove { kind, category } => {
            let removed = service.remove(planner.id, parse_kind(&kind)?, &category)?;
            println!("Removed {} category: {}", removed.kind, removed.name);
        }
    }

    Ok(())
}
