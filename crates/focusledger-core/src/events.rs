use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ledger::LoggedSegment;
use crate::timer::TimerMode;

/// Every state change in the engine produces an Event.
/// Hosts re-render from them; sound and window collaborators react to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        category: Option<String>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
    },
    BreakSkipped {
        from: TimerMode,
    },
    WorkDurationSelected {
        secs: u64,
    },
    CategoryBound {
        category: String,
    },
    /// A countdown reached zero.
    TimerCompleted {
        completed: TimerMode,
        next: TimerMode,
        auto_started: bool,
    },
    /// A finished work session was written to the ledger.
    SessionLogged {
        category: String,
        minutes: u32,
        completed_at: NaiveDateTime,
        segments: Vec<LoggedSegment>,
    },
    StateSnapshot {
        mode: TimerMode,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        selected_work_secs: u64,
        category: Option<String>,
        progress: f64,
    },
}

/// A collaborator that reacts to engine events, such as a sound player or
/// a window pinning hook. The engine never calls these directly; the
/// [`Tracker`](crate::Tracker) fans events out to subscribed sinks.
pub trait EventSink {
    fn handle(&mut self, event: &Event);
}

impl EventSink for Vec<Event> {
    fn handle(&mut self, event: &Event) {
        self.push(event.clone());
    }
}
