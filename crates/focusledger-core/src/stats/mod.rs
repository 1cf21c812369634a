//! Statistics module for focusledger
//!
//! Derived views over the ledger: goal streaks, period bar charts, the
//! yearly heatmap, the time-of-day histogram, and period navigation.

mod aggregate;
mod navigator;
mod streak;

pub use aggregate::{
    bar_series, category_breakdown, daily_totals, format_minutes, goal_progress, heatmap,
    hour_histogram, BarSeries, CategoryTotal, GoalProgress, Heatmap, HeatmapDay, HourHistogram,
    SeriesPoint, HEATMAP_CEILING_MINUTES,
};
pub use navigator::PeriodNavigator;
pub use streak::{current_streak, longest_streak};
