//! The productivity ledger.
//!
//! A ledger maps local calendar days to 24 hour buckets, each holding the
//! segments of focused time logged in that hour. It also carries the
//! persisted settings that travel with the history: the daily goal, the
//! work-session counter used for long-break spacing, and the category list.

mod logger;

pub use logger::{log_session, LoggedSegment, MAX_SESSION_SECS};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::LedgerError;

pub const HOURS_PER_DAY: u32 = 24;
pub const MINUTES_PER_HOUR: u32 = 60;
pub const DEFAULT_DAILY_GOAL_MINUTES: u32 = 120;
/// Category assigned to sessions migrated from the untagged schema.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A contiguous slice of focused time that never crosses an hour boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    start_minute: u32,
    duration_minutes: u32,
    category: String,
}

impl Segment {
    /// Returns `None` unless `duration > 0`, `start + duration <= 60`
    /// and the category is non-empty.
    pub fn new(start_minute: u32, duration_minutes: u32, category: impl Into<String>) -> Option<Self> {
        let category = category.into();
        let fits = duration_minutes > 0
            && start_minute < MINUTES_PER_HOUR
            && start_minute + duration_minutes <= MINUTES_PER_HOUR;
        if !fits || category.trim().is_empty() {
            return None;
        }
        Some(Self {
            start_minute,
            duration_minutes,
            category,
        })
    }

    pub fn start_minute(&self) -> u32 {
        self.start_minute
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn matches(&self, filter: Option<&str>) -> bool {
        filter.map_or(true, |category| self.category == category)
    }

    fn is_valid(&self) -> bool {
        Segment::new(self.start_minute, self.duration_minutes, self.category.as_str()).is_some()
    }
}

/// All segments logged within one hour of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBucket {
    pub hour: u32,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl HourBucket {
    pub fn empty(hour: u32) -> Self {
        Self {
            hour,
            segments: Vec::new(),
        }
    }

    pub fn total_minutes(&self, filter: Option<&str>) -> u32 {
        self.segments
            .iter()
            .filter(|segment| segment.matches(filter))
            .map(Segment::duration_minutes)
            .sum()
    }
}

/// Exactly 24 hour buckets, indexed by hour of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayLedger {
    hours: Vec<HourBucket>,
}

impl Default for DayLedger {
    fn default() -> Self {
        Self {
            hours: (0..HOURS_PER_DAY).map(HourBucket::empty).collect(),
        }
    }
}

impl DayLedger {
    /// Rebuild a day from decoded buckets.
    ///
    /// Buckets with an out-of-range hour and segments that break the
    /// hour invariant are dropped; missing hours are filled with empty
    /// buckets.
    pub fn from_buckets(buckets: Vec<HourBucket>) -> Self {
        let mut day = Self::default();
        for bucket in buckets {
            let Some(slot) = day.hours.get_mut(bucket.hour as usize) else {
                warn!(hour = bucket.hour, "dropping hour bucket outside 0-23");
                continue;
            };
            for segment in bucket.segments {
                if segment.is_valid() {
                    slot.segments.push(segment);
                } else {
                    warn!(hour = bucket.hour, ?segment, "dropping invalid segment");
                }
            }
        }
        day
    }

    pub fn hours(&self) -> &[HourBucket] {
        &self.hours
    }

    pub fn hour(&self, hour: u32) -> Option<&HourBucket> {
        self.hours.get(hour as usize)
    }

    fn hour_mut(&mut self, hour: u32) -> Option<&mut HourBucket> {
        self.hours.get_mut(hour as usize)
    }

    pub fn total_minutes(&self, filter: Option<&str>) -> u32 {
        self.hours.iter().map(|bucket| bucket.total_minutes(filter)).sum()
    }

    pub fn segments(&self) -> impl Iterator<Item = (u32, &Segment)> {
        self.hours
            .iter()
            .flat_map(|bucket| bucket.segments.iter().map(move |segment| (bucket.hour, segment)))
    }

    pub fn is_empty(&self) -> bool {
        self.hours.iter().all(|bucket| bucket.segments.is_empty())
    }
}

/// The full ledger plus the settings persisted alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    days: BTreeMap<NaiveDate, DayLedger>,
    sessions_since_long_break: u32,
    daily_goal_minutes: u32,
    categories: Vec<String>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            days: BTreeMap::new(),
            sessions_since_long_break: 0,
            daily_goal_minutes: DEFAULT_DAILY_GOAL_MINUTES,
            categories: Vec::new(),
        }
    }

    /// Assemble a ledger from decoded parts. A zero goal falls back to the
    /// default and duplicate or blank categories are skipped.
    pub fn from_parts(
        days: BTreeMap<NaiveDate, DayLedger>,
        sessions_since_long_break: u32,
        daily_goal_minutes: u32,
        categories: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut ledger = Self {
            days,
            sessions_since_long_break,
            daily_goal_minutes: if daily_goal_minutes == 0 {
                DEFAULT_DAILY_GOAL_MINUTES
            } else {
                daily_goal_minutes
            },
            categories: Vec::new(),
        };
        for category in categories {
            ledger.add_category(&category);
        }
        ledger
    }

    // ── Days ─────────────────────────────────────────────────────────

    /// Create the 24 empty buckets for `date` if the day is absent.
    pub fn ensure_day(&mut self, date: NaiveDate) -> &mut DayLedger {
        self.days.entry(date).or_default()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayLedger> {
        self.days.get(&date)
    }

    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &DayLedger)> {
        self.days.iter().map(|(date, day)| (*date, day))
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn day_total(&self, date: NaiveDate, filter: Option<&str>) -> u32 {
        self.days
            .get(&date)
            .map_or(0, |day| day.total_minutes(filter))
    }

    /// Whether the day's total across all categories reaches the goal.
    pub fn goal_met(&self, date: NaiveDate) -> bool {
        self.day_total(date, None) >= self.daily_goal_minutes
    }

    pub(crate) fn push_segment(&mut self, date: NaiveDate, hour: u32, segment: Segment) -> bool {
        match self.ensure_day(date).hour_mut(hour) {
            Some(bucket) => {
                bucket.segments.push(segment);
                true
            }
            None => false,
        }
    }

    // ── Goal ─────────────────────────────────────────────────────────

    pub fn daily_goal_minutes(&self) -> u32 {
        self.daily_goal_minutes
    }

    pub fn set_goal(&mut self, minutes: u32) -> Result<(), LedgerError> {
        if minutes == 0 {
            return Err(LedgerError::InvalidGoal);
        }
        self.daily_goal_minutes = minutes;
        Ok(())
    }

    // ── Session counter ──────────────────────────────────────────────

    pub fn sessions_since_long_break(&self) -> u32 {
        self.sessions_since_long_break
    }

    /// Count a finished work session. Returns `true` and resets the
    /// counter when it reaches `long_break_every`.
    pub fn record_work_session(&mut self, long_break_every: u32) -> bool {
        self.sessions_since_long_break += 1;
        if self.sessions_since_long_break >= long_break_every.max(1) {
            self.sessions_since_long_break = 0;
            true
        } else {
            false
        }
    }

    // ── Categories ───────────────────────────────────────────────────

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|category| category == name)
    }

    /// Append a category. Blank names and exact duplicates are ignored.
    /// Returns whether the list changed.
    pub fn add_category(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.has_category(name) {
            return false;
        }
        self.categories.push(name.to_string());
        true
    }

    /// Remove a category from the list. Logged segments keep their name.
    pub fn remove_category(&mut self, name: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|category| category != name);
        self.categories.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn segment_rejects_hour_overflow() {
        assert!(Segment::new(45, 15, "Work").is_some());
        assert!(Segment::new(45, 16, "Work").is_none());
        assert!(Segment::new(0, 0, "Work").is_none());
        assert!(Segment::new(60, 1, "Work").is_none());
        assert!(Segment::new(0, 10, "  ").is_none());
    }

    #[test]
    fn ensure_day_is_idempotent() {
        let mut ledger = Ledger::new();
        let day = date(2026, 10, 18);
        ledger.ensure_day(day);
        ledger.push_segment(day, 9, Segment::new(0, 30, "Work").unwrap());
        ledger.ensure_day(day);

        assert_eq!(ledger.day_count(), 1);
        let stored = ledger.day(day).unwrap();
        assert_eq!(stored.hours().len(), 24);
        assert_eq!(stored.total_minutes(None), 30);
        for (hour, bucket) in stored.hours().iter().enumerate() {
            assert_eq!(bucket.hour as usize, hour);
        }
    }

    #[test]
    fn add_category_trims_and_deduplicates() {
        let mut ledger = Ledger::new();
        assert!(ledger.add_category("Work"));
        assert!(ledger.add_category("  Study "));
        assert!(!ledger.add_category("Work"));
        assert!(!ledger.add_category("   "));
        assert!(ledger.add_category("work"));
        assert_eq!(ledger.categories(), ["Work", "Study", "work"]);
    }

    #[test]
    fn remove_category_keeps_history() {
        let mut ledger = Ledger::new();
        let day = date(2026, 10, 18);
        ledger.add_category("Work");
        ledger.push_segment(day, 9, Segment::new(0, 30, "Work").unwrap());

        assert!(ledger.remove_category("Work"));
        assert!(!ledger.remove_category("Work"));
        assert_eq!(ledger.day_total(day, Some("Work")), 30);
    }

    #[test]
    fn goal_is_inclusive() {
        let mut ledger = Ledger::new();
        let day = date(2026, 10, 18);
        for hour in [9, 10] {
            ledger.push_segment(day, hour, Segment::new(0, 60, "Work").unwrap());
        }
        assert_eq!(ledger.daily_goal_minutes(), 120);
        assert!(ledger.goal_met(day));
        ledger.set_goal(121).unwrap();
        assert!(!ledger.goal_met(day));
        assert_eq!(ledger.set_goal(0), Err(LedgerError::InvalidGoal));
        assert_eq!(ledger.daily_goal_minutes(), 121);
    }

    #[test]
    fn work_session_counter_wraps_at_threshold() {
        let mut ledger = Ledger::new();
        assert!(!ledger.record_work_session(4));
        assert!(!ledger.record_work_session(4));
        assert!(!ledger.record_work_session(4));
        assert!(ledger.record_work_session(4));
        assert_eq!(ledger.sessions_since_long_break(), 0);
    }

    #[test]
    fn from_buckets_drops_bad_data() {
        let buckets = vec![
            HourBucket {
                hour: 3,
                segments: vec![Segment {
                    start_minute: 50,
                    duration_minutes: 20,
                    category: "Work".into(),
                }],
            },
            HourBucket {
                hour: 30,
                segments: vec![Segment::new(0, 5, "Work").unwrap()],
            },
            HourBucket {
                hour: 4,
                segments: vec![Segment::new(10, 5, "Work").unwrap()],
            },
        ];
        let day = DayLedger::from_buckets(buckets);
        assert_eq!(day.hours().len(), 24);
        assert_eq!(day.total_minutes(None), 5);
        assert_eq!(day.hour(4).unwrap().segments.len(), 1);
    }

    #[test]
    fn filters_by_category() {
        let mut ledger = Ledger::new();
        let day = date(2026, 10, 18);
        ledger.push_segment(day, 9, Segment::new(0, 20, "Work").unwrap());
        ledger.push_segment(day, 9, Segment::new(20, 15, "Study").unwrap());
        assert_eq!(ledger.day_total(day, None), 35);
        assert_eq!(ledger.day_total(day, Some("Study")), 15);
        assert_eq!(ledger.day_total(day, Some("Other")), 0);
        assert_eq!(ledger.day_total(date(2026, 1, 1), None), 0);
    }
}
