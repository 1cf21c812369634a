use chrono::NaiveDateTime;
use clap::Subcommand;

use super::{now, open_tracker, parse_datetime, print_json, CommandResult};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Log a finished session without running the timer
    Log {
        /// Category the session is logged under
        #[arg(long)]
        category: String,
        /// Session length in minutes
        #[arg(long)]
        minutes: u64,
        /// Completion time as "YYYY-MM-DD HH:MM" (defaults to now)
        #[arg(long, value_parser = parse_datetime)]
        at: Option<NaiveDateTime>,
    },
}

pub fn run(action: SessionAction) -> CommandResult {
    let mut tracker = open_tracker()?;

    match action {
        SessionAction::Log {
            category,
            minutes,
            at,
        } => {
            let completed_at = at.unwrap_or_else(now);
            let logged =
                tracker.log_manual_session(completed_at, minutes.saturating_mul(60), &category)?;
            print_json(&logged)?;
        }
    }
    Ok(())
}
