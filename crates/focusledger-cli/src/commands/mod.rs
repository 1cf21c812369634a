pub mod category;
pub mod config;
pub mod goal;
pub mod session;
pub mod stats;
pub mod timer;

use chrono::{Local, NaiveDate, NaiveDateTime};
use focusledger_core::{Config, Tracker};
use serde::Serialize;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open the ledger named by the user's config.
pub fn open_tracker() -> Result<Tracker, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    Ok(Tracker::from_config(&config)?)
}

pub fn print_json<T: Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Local wall-clock time, which is what the ledger is keyed by.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn today() -> NaiveDate {
    now().date()
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("'{value}' is not a YYYY-MM-DD date"))
}

pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .map_err(|_| format!("'{value}' is not a 'YYYY-MM-DD HH:MM' time"))
}
