//! Aggregated views over the ledger.
//!
//! Every view starts from [`daily_totals`], optionally restricted to one
//! category, and reads the period boundaries from a [`Calendar`].

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{Calendar, DateInterval, Period};
use crate::ledger::{Ledger, HOURS_PER_DAY};

/// Display ceiling for heatmap intensity: twelve hours.
pub const HEATMAP_CEILING_MINUTES: u32 = 12 * 60;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Minutes per day, across all categories or only `filter`.
pub fn daily_totals(ledger: &Ledger, filter: Option<&str>) -> BTreeMap<NaiveDate, u32> {
    ledger
        .days()
        .map(|(date, day)| (date, day.total_minutes(filter)))
        .filter(|(_, minutes)| *minutes > 0)
        .collect()
}

/// One bar of a period chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    /// First day the bar covers.
    pub start: NaiveDate,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSeries {
    pub period: Period,
    pub interval: DateInterval,
    pub category: Option<String>,
    pub points: Vec<SeriesPoint>,
    pub total_minutes: u32,
    /// `total_minutes` as `Xh Ym`.
    pub total_label: String,
}

/// Bars for the period containing `reference`.
///
/// Week and month views have one bar per day, the year view one bar per
/// month, and the day view one bar per hour.
pub fn bar_series(
    ledger: &Ledger,
    calendar: &Calendar,
    period: Period,
    reference: NaiveDate,
    filter: Option<&str>,
) -> BarSeries {
    let interval = calendar.interval(reference, period);
    let points = match period {
        Period::Day => hour_points(ledger, interval.start, filter),
        Period::Week | Period::Month => {
            let totals = daily_totals(ledger, filter);
            interval
                .days()
                .map(|day| SeriesPoint {
                    label: day_label(day, period),
                    start: day,
                    minutes: totals.get(&day).copied().unwrap_or(0),
                })
                .collect()
        }
        Period::Year => month_points(ledger, calendar, interval, filter),
    };
    let total_minutes = points.iter().map(|point| point.minutes).sum();

    BarSeries {
        period,
        interval,
        category: filter.map(str::to_string),
        points,
        total_minutes,
        total_label: format_minutes(total_minutes),
    }
}

fn hour_points(ledger: &Ledger, day: NaiveDate, filter: Option<&str>) -> Vec<SeriesPoint> {
    (0..HOURS_PER_DAY)
        .map(|hour| SeriesPoint {
            label: format!("{hour:02}:00"),
            start: day,
            minutes: ledger
                .day(day)
                .and_then(|d| d.hour(hour))
                .map_or(0, |bucket| bucket.total_minutes(filter)),
        })
        .collect()
}

fn month_points(
    ledger: &Ledger,
    calendar: &Calendar,
    year: DateInterval,
    filter: Option<&str>,
) -> Vec<SeriesPoint> {
    let totals = daily_totals(ledger, filter);
    (0..12)
        .map(|offset| {
            let start = calendar.add_period(year.start, Period::Month, offset);
            let month = calendar.interval(start, Period::Month);
            SeriesPoint {
                label: MONTH_LABELS[start.month0() as usize].to_string(),
                start,
                minutes: totals.range(month.start..month.end).map(|(_, m)| *m).sum(),
            }
        })
        .collect()
}

fn day_label(day: NaiveDate, period: Period) -> String {
    match period {
        Period::Week => day.format("%a").to_string(),
        _ => day.day().to_string(),
    }
}

/// One heatmap cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub minutes: u32,
    pub goal_met: bool,
    /// `minutes / ceiling`, capped at 1.0 for display only.
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub year: i32,
    pub category: Option<String>,
    pub ceiling_minutes: u32,
    pub days: Vec<HeatmapDay>,
    pub total_minutes: u32,
    pub total_label: String,
}

/// One cell per day of the year containing `reference`.
pub fn heatmap(
    ledger: &Ledger,
    calendar: &Calendar,
    reference: NaiveDate,
    filter: Option<&str>,
) -> Heatmap {
    let totals = daily_totals(ledger, filter);
    let goal = ledger.daily_goal_minutes();
    let days: Vec<HeatmapDay> = calendar
        .interval(reference, Period::Year)
        .days()
        .map(|date| {
            let minutes = totals.get(&date).copied().unwrap_or(0);
            HeatmapDay {
                date,
                minutes,
                goal_met: minutes >= goal,
                intensity: (f64::from(minutes) / f64::from(HEATMAP_CEILING_MINUTES)).min(1.0),
            }
        })
        .collect();
    let total_minutes = days.iter().map(|day| day.minutes).sum();

    Heatmap {
        year: reference.year(),
        category: filter.map(str::to_string),
        ceiling_minutes: HEATMAP_CEILING_MINUTES,
        days,
        total_minutes,
        total_label: format_minutes(total_minutes),
    }
}

/// All-time minutes per hour of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourHistogram {
    pub category: Option<String>,
    pub minutes: Vec<u32>,
    pub total_minutes: u32,
    pub total_label: String,
}

impl HourHistogram {
    /// Hour with the most minutes, earliest on ties; `None` when empty.
    pub fn peak_hour(&self) -> Option<u32> {
        let max = *self.minutes.iter().max()?;
        if max == 0 {
            return None;
        }
        self.minutes
            .iter()
            .position(|minutes| *minutes == max)
            .map(|hour| hour as u32)
    }
}

pub fn hour_histogram(ledger: &Ledger, filter: Option<&str>) -> HourHistogram {
    let mut minutes = vec![0u32; HOURS_PER_DAY as usize];
    for (_, day) in ledger.days() {
        for bucket in day.hours() {
            if let Some(slot) = minutes.get_mut(bucket.hour as usize) {
                *slot += bucket.total_minutes(filter);
            }
        }
    }
    let total_minutes = minutes.iter().sum();

    HourHistogram {
        category: filter.map(str::to_string),
        minutes,
        total_minutes,
        total_label: format_minutes(total_minutes),
    }
}

/// Minutes spent on one category within an interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub minutes: u32,
}

/// Per-category totals within `interval`, largest first, then by name.
pub fn category_breakdown(ledger: &Ledger, interval: DateInterval) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, u32> = HashMap::new();
    for (date, day) in ledger.days() {
        if !interval.contains(date) {
            continue;
        }
        for (_, segment) in day.segments() {
            *totals.entry(segment.category()).or_insert(0) += segment.duration_minutes();
        }
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, minutes)| CategoryTotal {
            category: category.to_string(),
            minutes,
        })
        .collect();
    breakdown.sort_by(|a, b| b.minutes.cmp(&a.minutes).then_with(|| a.category.cmp(&b.category)));
    breakdown
}

/// How far a day is toward the daily goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub date: NaiveDate,
    pub minutes: u32,
    pub goal_minutes: u32,
    pub met: bool,
    /// Share of the goal reached, may exceed 100.
    pub percent: f64,
}

pub fn goal_progress(ledger: &Ledger, date: NaiveDate) -> GoalProgress {
    let minutes = ledger.day_total(date, None);
    let goal_minutes = ledger.daily_goal_minutes();
    GoalProgress {
        date,
        minutes,
        goal_minutes,
        met: minutes >= goal_minutes,
        percent: f64::from(minutes) * 100.0 / f64::from(goal_minutes.max(1)),
    }
}

/// Render minutes as `Xh Ym`.
pub fn format_minutes(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}
