//! Turns a finished work session into hour-bounded segments.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Ledger, Segment, MINUTES_PER_HOUR};

/// Sessions longer than a day are treated as corrupt input and dropped.
pub const MAX_SESSION_SECS: u64 = 24 * 60 * 60;

/// Where one slice of a logged session landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedSegment {
    pub date: NaiveDate,
    pub hour: u32,
    pub segment: Segment,
}

/// Append a finished session to the ledger.
///
/// The session runs from `completed_at - duration_secs` to `completed_at`
/// in local wall-clock time. Its whole minutes are laid out from the start
/// minute onward and cut at every hour boundary: the first hour receives
/// `60 - start_minute`, fully covered hours receive 60, and the last hour
/// receives whatever remains. Each slice is filed under the day owning its
/// hour, so a session crossing midnight contributes to both days.
///
/// Sub-minute remainders are dropped; sessions shorter than a minute, with
/// a blank category, or longer than [`MAX_SESSION_SECS`] log nothing.
pub fn log_session(
    ledger: &mut Ledger,
    completed_at: NaiveDateTime,
    duration_secs: u64,
    category: &str,
) -> Vec<LoggedSegment> {
    let total_minutes = duration_secs / 60;
    if total_minutes == 0 {
        debug!(duration_secs, "session shorter than a minute, nothing logged");
        return Vec::new();
    }
    if category.trim().is_empty() {
        warn!("session without a category, nothing logged");
        return Vec::new();
    }
    if duration_secs > MAX_SESSION_SECS {
        warn!(duration_secs, "session longer than a day, nothing logged");
        return Vec::new();
    }

    let Some(mut cursor) = completed_at
        .checked_sub_signed(Duration::seconds(duration_secs as i64))
        .and_then(truncate_to_minute)
    else {
        warn!(%completed_at, duration_secs, "session start out of range");
        return Vec::new();
    };

    ledger.ensure_day(cursor.date());
    ledger.ensure_day(completed_at.date());

    let mut remaining = total_minutes as u32;
    let mut logged = Vec::new();
    while remaining > 0 {
        let start_minute = cursor.minute();
        let take = remaining.min(MINUTES_PER_HOUR - start_minute);
        let date = cursor.date();
        let hour = cursor.hour();

        if let Some(segment) = Segment::new(start_minute, take, category) {
            if ledger.push_segment(date, hour, segment.clone()) {
                debug!(%date, hour, start_minute, minutes = take, category, "segment logged");
                logged.push(LoggedSegment { date, hour, segment });
            }
        }

        remaining -= take;
        cursor += Duration::minutes(i64::from(take));
    }
    logged
}

fn truncate_to_minute(instant: NaiveDateTime) -> Option<NaiveDateTime> {
    instant.with_second(0)?.with_nanosecond(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn minutes_in(ledger: &Ledger, date: NaiveDate, hour: u32) -> Vec<(u32, u32)> {
        ledger
            .day(date)
            .and_then(|day| day.hour(hour))
            .map(|bucket| {
                bucket
                    .segments
                    .iter()
                    .map(|s| (s.start_minute(), s.duration_minutes()))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn session_within_one_hour_is_one_segment() {
        let mut ledger = Ledger::new();
        let end = at(2026, 10, 18, 14, 40, 0);
        let logged = log_session(&mut ledger, end, 25 * 60, "Work");

        assert_eq!(logged.len(), 1);
        let day = end.date();
        assert_eq!(minutes_in(&ledger, day, 14), vec![(15, 25)]);
        assert_eq!(logged[0].segment.category(), "Work");
    }

    #[test]
    fn session_crossing_an_hour_splits_in_two() {
        let mut ledger = Ledger::new();
        let end = at(2026, 10, 18, 14, 10, 0);
        let logged = log_session(&mut ledger, end, 25 * 60, "Work");

        assert_eq!(logged.len(), 2);
        let day = end.date();
        assert_eq!(minutes_in(&ledger, day, 13), vec![(45, 15)]);
        assert_eq!(minutes_in(&ledger, day, 14), vec![(0, 10)]);
        assert_eq!(ledger.day_total(day, None), 25);
    }

    #[test]
    fn session_ending_on_the_hour_leaves_end_bucket_empty() {
        let mut ledger = Ledger::new();
        let end = at(2026, 10, 18, 14, 0, 0);
        let logged = log_session(&mut ledger, end, 25 * 60, "Work");

        assert_eq!(logged.len(), 1);
        assert_eq!(minutes_in(&ledger, end.date(), 13), vec![(35, 25)]);
        assert!(minutes_in(&ledger, end.date(), 14).is_empty());
    }

    #[test]
    fn session_ending_at_midnight_ensures_both_days() {
        let mut ledger = Ledger::new();
        let end = at(2026, 10, 19, 0, 0, 0);
        log_session(&mut ledger, end, 30 * 60, "Work");

        let before = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(ledger.day_count(), 2);
        assert_eq!(ledger.day_total(before, None), 30);
        assert_eq!(ledger.day_total(end.date(), None), 0);
    }

    #[test]
    fn long_session_fills_middle_hours() {
        let mut ledger = Ledger::new();
        let end = at(2026, 10, 18, 12, 20, 0);
        log_session(&mut ledger, end, 150 * 60, "Deep");

        let day = end.date();
        assert_eq!(minutes_in(&ledger, day, 9), vec![(50, 10)]);
        assert_eq!(minutes_in(&ledger, day, 10), vec![(0, 60)]);
        assert_eq!(minutes_in(&ledger, day, 11), vec![(0, 60)]);
        assert_eq!(minutes_in(&ledger, day, 12), vec![(0, 20)]);
        assert_eq!(ledger.day_total(day, None), 150);
    }

    #[test]
    fn session_crossing_midnight_is_split_between_days() {
        let mut ledger = Ledger::new();
        let end = at(2026, 10, 19, 0, 15, 0);
        log_session(&mut ledger, end, 25 * 60, "Work");

        let before = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let after = end.date();
        assert_eq!(minutes_in(&ledger, before, 23), vec![(50, 10)]);
        assert_eq!(minutes_in(&ledger, after, 0), vec![(0, 15)]);
        assert_eq!(ledger.day_total(before, None), 10);
        assert_eq!(ledger.day_total(after, None), 15);
        assert_eq!(ledger.day(before).unwrap().hours().len(), 24);
    }

    #[test]
    fn sub_minute_remainder_is_dropped() {
        let mut ledger = Ledger::new();
        let end = at(2026, 10, 18, 14, 10, 10);
        // 24m20s: starts 13:45:50
        log_session(&mut ledger, end, 24 * 60 + 20, "Work");
        assert_eq!(ledger.day_total(end.date(), None), 24);
        assert_eq!(minutes_in(&ledger, end.date(), 13), vec![(45, 15)]);
        assert_eq!(minutes_in(&ledger, end.date(), 14), vec![(0, 9)]);
    }

    #[test]
    fn degenerate_sessions_log_nothing() {
        let mut ledger = Ledger::new();
        let end = at(2026, 10, 18, 14, 10, 0);
        assert!(log_session(&mut ledger, end, 59, "Work").is_empty());
        assert!(log_session(&mut ledger, end, 0, "Work").is_empty());
        assert!(log_session(&mut ledger, end, 600, " ").is_empty());
        assert!(log_session(&mut ledger, end, MAX_SESSION_SECS + 60, "Work").is_empty());
        assert_eq!(ledger.day_count(), 0);
    }
}
