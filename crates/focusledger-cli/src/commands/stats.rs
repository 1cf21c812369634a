use chrono::NaiveDate;
use clap::{Args, Subcommand};
use focusledger_core::stats::{
    bar_series, category_breakdown, current_streak, heatmap, hour_histogram, longest_streak,
    PeriodNavigator,
};
use focusledger_core::{Period, Tracker};
use serde_json::json;

use super::{open_tracker, parse_date, print_json, today, CommandResult};

#[derive(Args)]
pub struct ViewArgs {
    /// Only count this category
    #[arg(long)]
    category: Option<String>,
    /// Any day inside the period to show (defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Periods to step from that day; negative goes back
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    offset: i32,
}

#[derive(Subcommand)]
pub enum StatsAction {
    /// Minutes per hour of one day
    Day(ViewArgs),
    /// Minutes per day of one week
    Week(ViewArgs),
    /// Minutes per day of one month
    Month(ViewArgs),
    /// Minutes per month of one year
    Year(ViewArgs),
    /// Every day of one year with goal and intensity
    Heatmap(ViewArgs),
    /// All-time minutes per hour of day
    Hours {
        /// Only count this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Current and longest goal streaks
    Streak,
    /// Minutes per category within a period
    Breakdown {
        /// day, week, month or year
        #[arg(long, default_value = "week", value_parser = parse_period)]
        period: Period,
        #[command(flatten)]
        view: ViewArgs,
    },
}

pub fn run(action: StatsAction) -> CommandResult {
    let tracker = open_tracker()?;

    match action {
        StatsAction::Day(view) => print_series(&tracker, Period::Day, &view),
        StatsAction::Week(view) => print_series(&tracker, Period::Week, &view),
        StatsAction::Month(view) => print_series(&tracker, Period::Month, &view),
        StatsAction::Year(view) => print_series(&tracker, Period::Year, &view),
        StatsAction::Heatmap(view) => {
            let nav = navigate(&tracker, Period::Year, &view)?;
            print_json(&heatmap(
                tracker.ledger(),
                tracker.calendar(),
                nav.anchor(),
                view.category.as_deref(),
            ))
        }
        StatsAction::Hours { category } => {
            let histogram = hour_histogram(tracker.ledger(), category.as_deref());
            let peak_hour = histogram.peak_hour();
            print_json(&json!({
                "histogram": histogram,
                "peak_hour": peak_hour,
            }))
        }
        StatsAction::Streak => {
            let ledger = tracker.ledger();
            print_json(&json!({
                "current": current_streak(ledger, today()),
                "longest": longest_streak(ledger),
                "goal_minutes": ledger.daily_goal_minutes(),
            }))
        }
        StatsAction::Breakdown { period, view } => {
            let nav = navigate(&tracker, period, &view)?;
            print_json(&json!({
                "interval": nav.interval(),
                "categories": category_breakdown(tracker.ledger(), nav.interval()),
            }))
        }
    }
}

fn print_series(tracker: &Tracker, period: Period, view: &ViewArgs) -> CommandResult {
    let nav = navigate(tracker, period, view)?;
    print_json(&bar_series(
        tracker.ledger(),
        tracker.calendar(),
        period,
        nav.anchor(),
        view.category.as_deref(),
    ))
}

fn navigate(
    tracker: &Tracker,
    period: Period,
    view: &ViewArgs,
) -> Result<PeriodNavigator, Box<dyn std::error::Error>> {
    let today = today();
    let mut nav = PeriodNavigator::new(*tracker.calendar(), period, today);
    if let Some(date) = view.date {
        nav.jump_to(date, today)?;
    }
    nav.step(view.offset, today)?;
    Ok(nav)
}

fn parse_period(value: &str) -> Result<Period, String> {
    match value.to_ascii_lowercase().as_str() {
        "day" => Ok(Period::Day),
        "week" => Ok(Period::Week),
        "month" => Ok(Period::Month),
        "year" => Ok(Period::Year),
        _ => Err(format!("'{value}' is not one of day, week, month, year")),
    }
}
