use std::thread;
use std::time::Duration;

use clap::Subcommand;
use focusledger_core::{Event, EventSink, Tracker};
use tracing::{info, warn};

use super::{now, open_tracker, CommandResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run one work session, then its break, printing events as JSON lines
    Run {
        /// Category the session is logged under
        #[arg(long)]
        category: String,
        /// Work length in minutes (defaults to timer.work_minutes)
        #[arg(long)]
        minutes: Option<u64>,
        /// Stop after the work session instead of running the break
        #[arg(long)]
        skip_break: bool,
        /// Milliseconds between ticks
        #[arg(long, default_value = "1000", hide = true)]
        tick_ms: u64,
    },
}

/// Prints each event as one line of JSON on stdout.
struct JsonLines;

impl EventSink for JsonLines {
    fn handle(&mut self, event: &Event) {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(err) => warn!(%err, "failed to encode event"),
        }
    }
}

pub fn run(action: TimerAction) -> CommandResult {
    let mut tracker = open_tracker()?;

    match action {
        TimerAction::Run {
            category,
            minutes,
            skip_break,
            tick_ms,
        } => {
            tracker.subscribe(Box::new(JsonLines));
            tracker.bind_category(&category)?;
            if let Some(minutes) = minutes {
                tracker.select_work_duration(minutes.saturating_mul(60))?;
            }
            tracker.start()?;
            let tick = Duration::from_millis(tick_ms);

            run_until_complete(&mut tracker, tick)?;
            if tracker.engine().mode().is_break() {
                if skip_break {
                    tracker.skip_break()?;
                } else {
                    if !tracker.engine().is_running() {
                        tracker.start()?;
                    }
                    run_until_complete(&mut tracker, tick)?;
                }
            }
            tracker.flush()?;
        }
    }
    Ok(())
}

/// Tick until the current countdown completes.
fn run_until_complete(tracker: &mut Tracker, tick: Duration) -> CommandResult {
    let mode = tracker.engine().mode();
    info!(mode = mode.label(), remaining = tracker.engine().remaining_secs(), "countdown running");
    loop {
        if !tick.is_zero() {
            thread::sleep(tick);
        }
        let events = tracker.tick(now())?;
        if events
            .iter()
            .any(|event| matches!(event, Event::TimerCompleted { .. }))
        {
            return Ok(());
        }
    }
}
