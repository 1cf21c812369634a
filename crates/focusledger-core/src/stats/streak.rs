//! Goal streaks.

use chrono::NaiveDate;

use crate::ledger::Ledger;

/// Consecutive goal-meeting days ending today, or ending yesterday while
/// today is still short of the goal.
///
/// The walk never takes more steps than the ledger has days, so sparse or
/// empty ledgers terminate immediately.
pub fn current_streak(ledger: &Ledger, today: NaiveDate) -> u32 {
    let mut cursor = if ledger.goal_met(today) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut streak = 0;
    for _ in 0..ledger.day_count() {
        match cursor {
            Some(day) if ledger.goal_met(day) => {
                streak += 1;
                cursor = day.pred_opt();
            }
            _ => break,
        }
    }
    streak
}

/// Longest run of consecutive goal-meeting days anywhere in the ledger.
pub fn longest_streak(ledger: &Ledger) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for (date, _) in ledger.days() {
        if !ledger.goal_met(date) {
            run = 0;
            previous = None;
            continue;
        }
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(date) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(date);
    }
    best
}
