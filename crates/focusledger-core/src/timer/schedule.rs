use serde::{Deserialize, Serialize};

use crate::error::TimerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn is_break(self) -> bool {
        !matches!(self, TimerMode::Work)
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Work => "Work",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}

/// Durations the timer cycles through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Default work session length, in seconds.
    pub work_secs: u64,
    pub short_break_secs: u64,
    pub long_break_secs: u64,
    /// Work sessions per long break.
    pub long_break_every: u32,
    /// Whether a break starts running as soon as a work session completes.
    pub auto_start_breaks: bool,
}

impl Schedule {
    /// Build a schedule, rejecting zero durations.
    pub fn new(
        work_secs: u64,
        short_break_secs: u64,
        long_break_secs: u64,
        long_break_every: u32,
    ) -> Result<Self, TimerError> {
        if work_secs == 0 || short_break_secs == 0 || long_break_secs == 0 || long_break_every == 0 {
            return Err(TimerError::InvalidDuration);
        }
        Ok(Self {
            work_secs,
            short_break_secs,
            long_break_secs,
            long_break_every,
            auto_start_breaks: true,
        })
    }

    /// Break length for a break mode; `None` for work, whose length is chosen per session.
    pub fn break_secs(&self, mode: TimerMode) -> Option<u64> {
        match mode {
            TimerMode::Work => None,
            TimerMode::ShortBreak => Some(self.short_break_secs),
            TimerMode::LongBreak => Some(self.long_break_secs),
        }
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            long_break_every: 4,
            auto_start_breaks: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_is_classic_pomodoro() {
        let s = Schedule::default();
        assert_eq!(s.work_secs, 1500);
        assert_eq!(s.break_secs(TimerMode::ShortBreak), Some(300));
        assert_eq!(s.break_secs(TimerMode::LongBreak), Some(900));
        assert_eq!(s.break_secs(TimerMode::Work), None);
        assert_eq!(s.long_break_every, 4);
    }

    #[test]
    fn zero_durations_are_rejected() {
        assert_eq!(Schedule::new(0, 1, 1, 4), Err(TimerError::InvalidDuration));
        assert_eq!(Schedule::new(60, 60, 60, 0), Err(TimerError::InvalidDuration));
        assert!(Schedule::new(60, 60, 60, 2).is_ok());
    }
}
