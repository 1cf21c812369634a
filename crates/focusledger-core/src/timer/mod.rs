mod engine;
mod schedule;

pub use engine::TimerEngine;
pub use schedule::{Schedule, TimerMode};
