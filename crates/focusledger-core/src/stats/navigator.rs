use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::{Calendar, DateInterval, Period};
use crate::error::NavigationError;

/// Steps a period view backward and forward, never past the period
/// containing today.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodNavigator {
    #[serde(skip)]
    calendar: Calendar,
    period: Period,
    anchor: NaiveDate,
}

impl PeriodNavigator {
    pub fn new(calendar: Calendar, period: Period, today: NaiveDate) -> Self {
        Self {
            calendar,
            period,
            anchor: today,
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn interval(&self) -> DateInterval {
        self.calendar.interval(self.anchor, self.period)
    }

    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.calendar.is_same_period(self.anchor, today, self.period)
    }

    /// Switch granularity, keeping the anchor date.
    pub fn set_period(&mut self, period: Period) {
        self.period = period;
    }

    pub fn back(&mut self) {
        self.anchor = self.calendar.add_period(self.anchor, self.period, -1);
    }

    /// Step to the next period. Refused, leaving the view unchanged, when
    /// the next period starts after the one containing `today`.
    pub fn forward(&mut self, today: NaiveDate) -> Result<(), NavigationError> {
        let next = self.calendar.add_period(self.anchor, self.period, 1);
        if self.is_future(next, today) {
            return Err(NavigationError::FuturePeriod);
        }
        self.anchor = next;
        Ok(())
    }

    /// Step `offset` periods; negative goes back. Stops at the first refusal.
    pub fn step(&mut self, offset: i32, today: NaiveDate) -> Result<(), NavigationError> {
        for _ in 0..offset.unsigned_abs() {
            if offset < 0 {
                self.back();
            } else {
                self.forward(today)?;
            }
        }
        Ok(())
    }

    pub fn jump_to_today(&mut self, today: NaiveDate) {
        self.anchor = today;
    }

    /// Show the period containing `date`. Refused, leaving the view
    /// unchanged, when that period starts after the one containing `today`.
    pub fn jump_to(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), NavigationError> {
        if self.is_future(date, today) {
            return Err(NavigationError::FuturePeriod);
        }
        self.anchor = date;
        Ok(())
    }

    fn is_future(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.calendar.interval(date, self.period).start
            > self.calendar.interval(today, self.period).start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn forward_from_current_week_is_rejected() {
        let today = date(2026, 10, 18);
        let mut nav = PeriodNavigator::new(Calendar::default(), Period::Week, today);
        let before = nav.interval();
        assert_eq!(nav.forward(today), Err(NavigationError::FuturePeriod));
        assert_eq!(nav.interval(), before);
        assert!(nav.is_current(today));
    }

    #[test]
    fn back_then_forward_returns_to_current() {
        let today = date(2026, 10, 18);
        let mut nav = PeriodNavigator::new(Calendar::default(), Period::Month, today);
        nav.back();
        assert_eq!(nav.interval().start, date(2026, 9, 1));
        assert!(!nav.is_current(today));
        nav.forward(today).unwrap();
        assert!(nav.is_current(today));
        assert!(nav.forward(today).is_err());
    }

    #[test]
    fn step_applies_offsets() {
        let today = date(2026, 10, 18);
        let mut nav = PeriodNavigator::new(Calendar::default(), Period::Year, today);
        nav.step(-2, today).unwrap();
        assert_eq!(nav.interval().start, date(2024, 1, 1));
        nav.step(1, today).unwrap();
        assert_eq!(nav.interval().start, date(2025, 1, 1));
        assert!(nav.step(3, today).is_err());
        assert!(nav.is_current(today));
    }

    #[test]
    fn jump_into_a_future_period_is_rejected() {
        let today = date(2026, 10, 18);
        let mut nav = PeriodNavigator::new(Calendar::default(), Period::Week, today);
        assert_eq!(nav.jump_to(date(2030, 1, 1), today), Err(NavigationError::FuturePeriod));
        assert_eq!(nav.anchor(), today);

        // Later in the current week is still the current period.
        nav.jump_to(date(2026, 10, 23), today).unwrap();
        assert!(nav.is_current(today));
        nav.jump_to(date(2025, 3, 2), today).unwrap();
        assert_eq!(nav.interval().start, date(2025, 3, 1));
        assert_eq!(nav.jump_to(date(2026, 10, 24), today), Err(NavigationError::FuturePeriod));
    }

    #[test]
    fn month_steps_clamp_day() {
        let today = date(2026, 10, 31);
        let mut nav = PeriodNavigator::new(Calendar::default(), Period::Month, today);
        nav.back();
        assert_eq!(nav.anchor(), date(2026, 9, 30));
        nav.set_period(Period::Day);
        nav.forward(today).unwrap();
        assert_eq!(nav.anchor(), date(2026, 10, 1));
        nav.jump_to_today(today);
        assert!(nav.is_current(today));
    }
}
