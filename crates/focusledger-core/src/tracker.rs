//! Host-facing facade tying the timer, the ledger and its store together.
//!
//! A host (CLI loop, GUI event loop) owns one `Tracker`, forwards user
//! actions to it, and calls [`Tracker::tick`] once per second. Each call
//! returns the events it produced followed by a state snapshot; the same
//! events are fanned out to every subscribed [`EventSink`].

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::calendar::Calendar;
use crate::error::{CoreError, LedgerError, StorageError, TimerError};
use crate::events::{Event, EventSink};
use crate::ledger::{log_session, Ledger, LoggedSegment};
use crate::stats;
use crate::storage::{Config, LedgerStore};
use crate::timer::{Schedule, TimerEngine};

pub struct Tracker {
    ledger: Ledger,
    engine: TimerEngine,
    store: LedgerStore,
    calendar: Calendar,
    sinks: Vec<Box<dyn EventSink>>,
}

impl Tracker {
    /// Load the ledger from `store` and build a fresh, idle timer.
    pub fn open(store: LedgerStore, schedule: Schedule, calendar: Calendar) -> Self {
        let ledger = store.load();
        Self {
            ledger,
            engine: TimerEngine::new(schedule),
            store,
            calendar,
            sinks: Vec::new(),
        }
    }

    /// Open with the schedule, calendar and ledger location from `config`.
    ///
    /// # Errors
    /// Returns an error if the calendar setting is invalid or the data
    /// directory cannot be created.
    pub fn from_config(config: &Config) -> Result<Self, CoreError> {
        let calendar = config.calendar()?;
        let store = LedgerStore::new(config.ledger_path()?);
        Ok(Self::open(store, config.schedule(), calendar))
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot()
    }

    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        stats::current_streak(&self.ledger, today)
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn start(&mut self) -> Result<Vec<Event>, TimerError> {
        let event = self.engine.start().inspect_err(|err| debug!(%err, "start rejected"))?;
        Ok(self.publish(vec![event]))
    }

    pub fn pause(&mut self) -> Result<Vec<Event>, TimerError> {
        let event = self.engine.pause()?;
        Ok(self.publish(vec![event]))
    }

    pub fn reset(&mut self) -> Vec<Event> {
        let event = self.engine.reset();
        self.publish(vec![event])
    }

    pub fn skip_break(&mut self) -> Result<Vec<Event>, TimerError> {
        let event = self.engine.skip_break()?;
        Ok(self.publish(vec![event]))
    }

    pub fn select_work_duration(&mut self, secs: u64) -> Result<Vec<Event>, TimerError> {
        let event = self.engine.select_work_duration(secs)?;
        Ok(self.publish(vec![event]))
    }

    /// Register the category with the ledger and bind it to the next work
    /// session.
    pub fn bind_category(&mut self, name: &str) -> Result<Vec<Event>, CoreError> {
        let event = self.engine.bind_category(name)?;
        if self.ledger.add_category(name) {
            self.store.save(&self.ledger)?;
        }
        Ok(self.publish(vec![event]))
    }

    /// Advance the timer one second. The ledger is saved whenever the tick
    /// logged a session.
    ///
    /// # Errors
    /// Returns an error if saving the ledger fails; the in-memory state has
    /// already advanced.
    pub fn tick(&mut self, now: NaiveDateTime) -> Result<Vec<Event>, StorageError> {
        let events = self.engine.tick(&mut self.ledger, now);
        if events.is_empty() {
            return Ok(events);
        }
        let logged = events
            .iter()
            .any(|event| matches!(event, Event::SessionLogged { .. }));
        let events = self.publish_raw(events);
        if logged {
            self.store.save(&self.ledger)?;
        }
        Ok(events)
    }

    // ── Ledger edits ─────────────────────────────────────────────────

    /// Returns whether the category was new. Blank names are refused.
    pub fn add_category(&mut self, name: &str) -> Result<bool, CoreError> {
        if name.trim().is_empty() {
            return Err(LedgerError::EmptyCategory.into());
        }
        let added = self.ledger.add_category(name);
        if added {
            self.store.save(&self.ledger)?;
        }
        Ok(added)
    }

    pub fn remove_category(&mut self, name: &str) -> Result<bool, StorageError> {
        let removed = self.ledger.remove_category(name);
        if removed {
            self.store.save(&self.ledger)?;
        }
        Ok(removed)
    }

    pub fn set_goal(&mut self, minutes: u32) -> Result<(), CoreError> {
        self.ledger.set_goal(minutes)?;
        self.store.save(&self.ledger)?;
        Ok(())
    }

    /// Log a session that did not run through the timer, such as one
    /// entered after the fact. Does not touch the long-break counter.
    pub fn log_manual_session(
        &mut self,
        completed_at: NaiveDateTime,
        duration_secs: u64,
        category: &str,
    ) -> Result<Vec<LoggedSegment>, CoreError> {
        if category.trim().is_empty() {
            return Err(TimerError::EmptyCategory.into());
        }
        if duration_secs < 60 {
            return Err(TimerError::InvalidDuration.into());
        }
        self.ledger.add_category(category);
        let logged = log_session(&mut self.ledger, completed_at, duration_secs, category.trim());
        self.store.save(&self.ledger)?;
        Ok(logged)
    }

    /// Persist the ledger, e.g. when the host goes to the background.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.store.save(&self.ledger)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn publish(&mut self, mut events: Vec<Event>) -> Vec<Event> {
        events.push(self.engine.snapshot());
        self.publish_raw(events)
    }

    fn publish_raw(&mut self, events: Vec<Event>) -> Vec<Event> {
        for sink in &mut self.sinks {
            for event in &events {
                sink.handle(event);
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LEDGER_FILE_NAME;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl EventSink for Recorder {
        fn handle(&mut self, event: &Event) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    fn tracker_in(dir: &tempfile::TempDir) -> Tracker {
        let store = LedgerStore::new(dir.path().join(LEDGER_FILE_NAME));
        let schedule = Schedule::new(60, 60, 120, 4).unwrap();
        Tracker::open(store, schedule, Calendar::default())
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn commands_end_with_snapshot_and_reach_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker_in(&dir);
        let seen = Rc::new(RefCell::new(Vec::new()));
        tracker.subscribe(Box::new(Recorder(Rc::clone(&seen))));

        let events = tracker.bind_category("Work").unwrap();
        assert!(matches!(events.last(), Some(Event::StateSnapshot { .. })));
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(tracker.ledger().categories(), ["Work"]);
    }

    #[test]
    fn rejected_start_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker_in(&dir);
        let before = tracker.snapshot();
        assert!(matches!(tracker.start(), Err(TimerError::MissingCategory)));
        assert_eq!(tracker.snapshot(), before);
    }

    #[test]
    fn completed_session_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker_in(&dir);
        tracker.bind_category("Work").unwrap();
        tracker.start().unwrap();

        let mut logged = false;
        for _ in 0..60 {
            let events = tracker.tick(noon()).unwrap();
            logged |= events.iter().any(|e| matches!(e, Event::SessionLogged { .. }));
        }
        assert!(logged);

        let reloaded = tracker.store().load();
        assert_eq!(reloaded.day_total(noon().date(), Some("Work")), 1);
        assert_eq!(reloaded.sessions_since_long_break(), 1);
    }

    #[test]
    fn goal_and_manual_sessions_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker_in(&dir);
        assert!(tracker.set_goal(0).is_err());
        tracker.set_goal(30).unwrap();
        tracker.log_manual_session(noon(), 30 * 60, "Reading").unwrap();
        assert!(tracker.log_manual_session(noon(), 30, "Reading").is_err());

        let reloaded = tracker.store().load();
        assert_eq!(reloaded.daily_goal_minutes(), 30);
        assert_eq!(reloaded.categories(), ["Reading"]);
        assert_eq!(tracker.current_streak(noon().date()), 1);
    }

    #[test]
    fn category_edits_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker_in(&dir);
        assert!(tracker.add_category("Work").unwrap());
        assert!(!tracker.add_category("Work").unwrap());
        assert!(tracker.add_category("Study").unwrap());
        assert!(matches!(
            tracker.add_category("   "),
            Err(CoreError::Ledger(LedgerError::EmptyCategory))
        ));
        assert!(tracker.remove_category("Work").unwrap());
        assert_eq!(tracker.store().load().categories(), ["Study"]);
    }
}
