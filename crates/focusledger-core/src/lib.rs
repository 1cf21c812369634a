//! # Focusledger Core Library
//!
//! Core logic for the focusledger focus timer: a countdown state machine,
//! the per-hour session ledger it writes into, and the statistics derived
//! from that ledger. Every host (the CLI binary, a desktop shell) is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a one-second tick state machine cycling through work,
//!   short break and long break. The host calls `tick()`; the engine never
//!   reads the clock itself.
//! - **Ledger**: completed work sessions split into per-hour segments, keyed
//!   by local calendar day.
//! - **Storage**: a single JSON ledger file with schema migration, and a
//!   TOML config file.
//! - **Stats**: streaks, period bar series, the yearly heatmap and the
//!   time-of-day histogram.
//!
//! ## Key Components
//!
//! - [`Tracker`]: host facade wiring timer, ledger and store together
//! - [`TimerEngine`]: core timer state machine
//! - [`Ledger`]: session history and user settings
//! - [`LedgerStore`]: ledger persistence
//! - [`Config`]: application configuration

pub mod calendar;
pub mod error;
pub mod events;
pub mod ledger;
pub mod stats;
pub mod storage;
pub mod timer;
mod tracker;

pub use calendar::{Calendar, DateInterval, Period};
pub use error::{ConfigError, CoreError, LedgerError, NavigationError, StorageError, TimerError};
pub use events::{Event, EventSink};
pub use ledger::{log_session, DayLedger, HourBucket, Ledger, LoggedSegment, Segment};
pub use storage::{Config, LedgerStore, LoadSource};
pub use timer::{Schedule, TimerEngine, TimerMode};
pub use tracker::Tracker;
