//! Timer engine implementation.
//!
//! The engine is a countdown state machine driven by a one-second `tick()`
//! from the host's event loop. It owns no threads and no clock; the host
//! passes the local wall-clock time into `tick()` so completed work sessions
//! can be stamped.
//!
//! ## State Transitions
//!
//! ```text
//! Work --complete--> ShortBreak | LongBreak (auto-started)
//! ShortBreak | LongBreak --complete | skip_break--> Work (idle, no category)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(Schedule::default());
//! engine.bind_category("Work")?;
//! engine.start()?;
//! // Once per second:
//! let events = engine.tick(&mut ledger, Local::now().naive_local());
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::schedule::{Schedule, TimerMode};
use crate::error::TimerError;
use crate::events::Event;
use crate::ledger::{log_session, Ledger};

/// Core timer engine. Transient: rebuilt on every process start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    schedule: Schedule,
    mode: TimerMode,
    selected_work_secs: u64,
    remaining_secs: u64,
    running: bool,
    /// Only ever set while in work mode.
    bound_category: Option<String>,
}

impl TimerEngine {
    /// Create an idle engine in work mode with the schedule's work length.
    pub fn new(schedule: Schedule) -> Self {
        let work_secs = schedule.work_secs.max(1);
        Self {
            schedule,
            mode: TimerMode::Work,
            selected_work_secs: work_secs,
            remaining_secs: work_secs,
            running: false,
            bound_category: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn selected_work_secs(&self) -> u64 {
        self.selected_work_secs
    }

    pub fn bound_category(&self) -> Option<&str> {
        self.bound_category.as_deref()
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Full length of the current mode.
    pub fn total_secs(&self) -> u64 {
        self.schedule
            .break_secs(self.mode)
            .unwrap_or(self.selected_work_secs)
    }

    /// 0.0 .. 1.0 progress within the current mode.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs.min(total) as f64 / total as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            running: self.running,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            selected_work_secs: self.selected_work_secs,
            category: self.bound_category.clone(),
            progress: self.progress(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Result<Event, TimerError> {
        if self.running {
            return Err(TimerError::AlreadyRunning);
        }
        if self.mode == TimerMode::Work && self.bound_category.is_none() {
            return Err(TimerError::MissingCategory);
        }
        self.running = true;
        debug!(mode = ?self.mode, remaining = self.remaining_secs, "timer started");
        Ok(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            category: self.bound_category.clone(),
        })
    }

    pub fn pause(&mut self) -> Result<Event, TimerError> {
        if !self.running {
            return Err(TimerError::NotRunning);
        }
        self.running = false;
        Ok(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
        })
    }

    /// Stop and rewind the current mode. Work mode also drops its category.
    pub fn reset(&mut self) -> Event {
        self.running = false;
        self.remaining_secs = self.total_secs();
        if self.mode == TimerMode::Work {
            self.bound_category = None;
        }
        Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
        }
    }

    /// Abandon the current break without logging anything.
    pub fn skip_break(&mut self) -> Result<Event, TimerError> {
        if !self.mode.is_break() {
            return Err(TimerError::NotOnBreak);
        }
        let from = self.mode;
        self.enter_idle_work();
        Ok(Event::BreakSkipped { from })
    }

    pub fn select_work_duration(&mut self, secs: u64) -> Result<Event, TimerError> {
        if secs == 0 {
            return Err(TimerError::InvalidDuration);
        }
        self.ensure_idle_work()?;
        self.selected_work_secs = secs;
        self.remaining_secs = secs;
        Ok(Event::WorkDurationSelected { secs })
    }

    /// Bind the category the next work session is logged under. Registering
    /// a new category with the ledger is the caller's job.
    pub fn bind_category(&mut self, name: &str) -> Result<Event, TimerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TimerError::EmptyCategory);
        }
        self.ensure_idle_work()?;
        self.bound_category = Some(name.to_string());
        Ok(Event::CategoryBound {
            category: name.to_string(),
        })
    }

    /// Advance one second. Returns the events of any completion cascade.
    pub fn tick(&mut self, ledger: &mut Ledger, now: NaiveDateTime) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return Vec::new();
        }
        self.running = false;
        self.complete(ledger, now)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self, ledger: &mut Ledger, now: NaiveDateTime) -> Vec<Event> {
        let completed = self.mode;
        let mut events = Vec::new();

        if completed == TimerMode::Work {
            match self.bound_category.take() {
                Some(category) => {
                    let segments = log_session(ledger, now, self.selected_work_secs, &category);
                    events.push(Event::SessionLogged {
                        minutes: segments.iter().map(|s| s.segment.duration_minutes()).sum(),
                        category,
                        completed_at: now,
                        segments,
                    });
                }
                None => warn!("work session completed without a category, not logged"),
            }

            let long_break = ledger.record_work_session(self.schedule.long_break_every);
            self.mode = if long_break {
                TimerMode::LongBreak
            } else {
                TimerMode::ShortBreak
            };
            self.remaining_secs = self.total_secs();
            self.running = self.schedule.auto_start_breaks;
        } else {
            self.enter_idle_work();
        }

        debug!(?completed, next = ?self.mode, "timer completed");
        events.push(Event::TimerCompleted {
            completed,
            next: self.mode,
            auto_started: self.running,
        });
        events.push(self.snapshot());
        events
    }

    fn enter_idle_work(&mut self) {
        self.mode = TimerMode::Work;
        self.running = false;
        self.remaining_secs = self.selected_work_secs;
        self.bound_category = None;
    }

    fn ensure_idle_work(&self) -> Result<(), TimerError> {
        if self.mode != TimerMode::Work {
            return Err(TimerError::NotInWorkMode);
        }
        if self.running {
            return Err(TimerError::AlreadyRunning);
        }
        Ok(())
    }
}
