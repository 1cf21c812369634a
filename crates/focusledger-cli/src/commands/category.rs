use clap::Subcommand;

use super::{open_tracker, print_json, CommandResult};

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Add a category
    Add {
        /// Category name
        name: String,
    },
    /// List categories
    List,
    /// Remove a category; logged history is kept
    Remove {
        /// Category name
        name: String,
    },
}

pub fn run(action: CategoryAction) -> CommandResult {
    let mut tracker = open_tracker()?;

    match action {
        CategoryAction::Add { name } => {
            if tracker.add_category(&name)? {
                println!("category added: {}", name.trim());
            } else {
                println!("category already exists: {}", name.trim());
            }
        }
        CategoryAction::List => {
            print_json(&tracker.ledger().categories())?;
        }
        CategoryAction::Remove { name } => {
            if tracker.remove_category(&name)? {
                println!("category removed: {name}");
            } else {
                return Err(format!("unknown category: {name}").into());
            }
        }
    }
    Ok(())
}
