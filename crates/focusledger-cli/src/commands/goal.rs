use chrono::NaiveDate;
use clap::Subcommand;
use focusledger_core::stats::goal_progress;

use super::{open_tracker, parse_date, print_json, today, CommandResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Show goal progress for a day
    Get {
        /// Day as YYYY-MM-DD (defaults to today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Set the daily goal
    Set {
        /// Goal in minutes, at least 1
        minutes: u32,
    },
}

pub fn run(action: GoalAction) -> CommandResult {
    let mut tracker = open_tracker()?;

    match action {
        GoalAction::Get { date } => {
            let date = date.unwrap_or_else(today);
            print_json(&goal_progress(tracker.ledger(), date))?;
        }
        GoalAction::Set { minutes } => {
            tracker.set_goal(minutes)?;
            println!("daily goal set to {minutes} minutes");
        }
    }
    Ok(())
}
