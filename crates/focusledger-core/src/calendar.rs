//! Calendar arithmetic for day keys and aggregation periods.
//!
//! All dates are local wall-clock dates. Nothing in this module converts
//! between timezones; callers hand in dates already expressed in local time.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Granularity of an aggregation period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

/// Half-open `[start, end)` range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days().max(0)
    }

    /// Every day in the interval, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day < end)
    }
}

/// Calendar with a configurable first day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    first_weekday: Weekday,
}

impl Default for Calendar {
    /// Saturday-start weeks, matching the weekly and heatmap views.
    fn default() -> Self {
        Self {
            first_weekday: Weekday::Sat,
        }
    }
}

impl Calendar {
    pub fn new(first_weekday: Weekday) -> Self {
        Self { first_weekday }
    }

    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    /// The period of the given granularity that contains `date`.
    pub fn interval(&self, date: NaiveDate, period: Period) -> DateInterval {
        let start = self.period_start(date, period);
        let end = match period {
            Period::Day => start.checked_add_days(Days::new(1)),
            Period::Week => start.checked_add_days(Days::new(7)),
            Period::Month => start.checked_add_months(Months::new(1)),
            Period::Year => start.checked_add_months(Months::new(12)),
        }
        .unwrap_or(NaiveDate::MAX);
        DateInterval { start, end }
    }

    pub fn is_same_period(&self, a: NaiveDate, b: NaiveDate, period: Period) -> bool {
        self.period_start(a, period) == self.period_start(b, period)
    }

    /// Move `date` by `n` periods. Month and year steps clamp to the last
    /// valid day of the target month (Jan 31 + 1 month = Feb 28/29).
    pub fn add_period(&self, date: NaiveDate, period: Period, n: i32) -> NaiveDate {
        let magnitude = u64::from(n.unsigned_abs());
        let forward = n >= 0;
        let moved = match period {
            Period::Day => shift_days(date, magnitude, forward),
            Period::Week => shift_days(date, magnitude.saturating_mul(7), forward),
            Period::Month => shift_months(date, magnitude, forward),
            Period::Year => shift_months(date, magnitude.saturating_mul(12), forward),
        };
        moved.unwrap_or(if forward { NaiveDate::MAX } else { NaiveDate::MIN })
    }

    fn period_start(&self, date: NaiveDate, period: Period) -> NaiveDate {
        let back = match period {
            Period::Day => 0,
            Period::Week => {
                let offset = date.weekday().num_days_from_monday() + 7
                    - self.first_weekday.num_days_from_monday();
                offset % 7
            }
            Period::Month => date.day0(),
            Period::Year => date.ordinal0(),
        };
        date.checked_sub_days(Days::new(u64::from(back)))
            .unwrap_or(NaiveDate::MIN)
    }
}

fn shift_days(date: NaiveDate, days: u64, forward: bool) -> Option<NaiveDate> {
    if forward {
        date.checked_add_days(Days::new(days))
    } else {
        date.checked_sub_days(Days::new(days))
    }
}

fn shift_months(date: NaiveDate, months: u64, forward: bool) -> Option<NaiveDate> {
    let months = Months::new(u32::try_from(months).ok()?);
    if forward {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    }
}

/// Canonical `YYYY-MM-DD` key for a local date.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` key. Only the canonical zero-padded form is
/// accepted, so every date has exactly one key.
pub fn parse_day_key(key: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT)
        .ok()
        .filter(|date| day_key(*date) == key)
        .ok_or_else(|| LedgerError::InvalidDayKey(key.to_string()))
}

/// Parse a weekday name such as `sat` or `Saturday`.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    name.trim().parse::<Weekday>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_week_starts_on_saturday() {
        let cal = Calendar::default();
        // 2026-10-14 is a Wednesday
        let week = cal.interval(date(2026, 10, 14), Period::Week);
        assert_eq!(week.start, date(2026, 10, 10));
        assert_eq!(week.end, date(2026, 10, 17));
        assert_eq!(week.start.weekday(), Weekday::Sat);
    }

    #[test]
    fn week_start_on_the_first_weekday_itself() {
        let cal = Calendar::new(Weekday::Mon);
        let week = cal.interval(date(2026, 10, 12), Period::Week);
        assert_eq!(week.start, date(2026, 10, 12));
        assert_eq!(week.num_days(), 7);
    }

    #[test]
    fn month_and_year_intervals() {
        let cal = Calendar::default();
        let feb = cal.interval(date(2024, 2, 17), Period::Month);
        assert_eq!(feb.start, date(2024, 2, 1));
        assert_eq!(feb.end, date(2024, 3, 1));
        assert_eq!(feb.num_days(), 29);

        let year = cal.interval(date(2026, 7, 4), Period::Year);
        assert_eq!(year.start, date(2026, 1, 1));
        assert_eq!(year.end, date(2027, 1, 1));
        assert_eq!(year.days().count(), 365);
    }

    #[test]
    fn day_interval_is_one_day() {
        let cal = Calendar::default();
        let day = cal.interval(date(2026, 12, 31), Period::Day);
        assert_eq!(day.start, date(2026, 12, 31));
        assert_eq!(day.end, date(2027, 1, 1));
        assert!(day.contains(date(2026, 12, 31)));
        assert!(!day.contains(date(2027, 1, 1)));
    }

    #[test]
    fn add_period_clamps_month_end() {
        let cal = Calendar::default();
        assert_eq!(cal.add_period(date(2026, 1, 31), Period::Month, 1), date(2026, 2, 28));
        assert_eq!(cal.add_period(date(2024, 2, 29), Period::Year, 1), date(2025, 2, 28));
        assert_eq!(cal.add_period(date(2026, 3, 31), Period::Month, -1), date(2026, 2, 28));
        assert_eq!(cal.add_period(date(2026, 1, 1), Period::Week, -1), date(2025, 12, 25));
        assert_eq!(cal.add_period(date(2026, 1, 1), Period::Day, 0), date(2026, 1, 1));
    }

    #[test]
    fn same_period_comparison() {
        let cal = Calendar::default();
        // Fri 2026-10-16 and Sat 2026-10-17 fall in different Saturday-start weeks
        assert!(!cal.is_same_period(date(2026, 10, 16), date(2026, 10, 17), Period::Week));
        assert!(cal.is_same_period(date(2026, 10, 17), date(2026, 10, 23), Period::Week));
        assert!(cal.is_same_period(date(2026, 1, 1), date(2026, 12, 31), Period::Year));
        assert!(!cal.is_same_period(date(2026, 1, 31), date(2026, 2, 1), Period::Month));
    }

    #[test]
    fn day_keys_are_zero_padded() {
        assert_eq!(day_key(date(2026, 3, 7)), "2026-03-07");
        assert_eq!(parse_day_key("2026-03-07").unwrap(), date(2026, 3, 7));
        assert!(parse_day_key("2026-3-7x").is_err());
        assert!(parse_day_key("2026-02-30").is_err());
        assert!(parse_day_key("2026-10-7").is_err());
        assert!(parse_day_key("2026-3-07").is_err());
        assert!(parse_day_key(" 2026-03-07").is_err());
    }

    #[test]
    fn weekday_names() {
        assert_eq!(parse_weekday("sat"), Some(Weekday::Sat));
        assert_eq!(parse_weekday("Monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("someday"), None);
    }
}
