//! Aggregation engine
//!
//! Stateless routines that derive summaries from the record stores. Every
//! call recomputes from the records it is given.

pub mod balance;
pub mod body_trend;
pub mod buckets;
pub mod goals;
pub mod streaks;
pub mod totals;

pub use balance::{
    daily_balance, daily_balances, period_summary, Balance, BalanceStatus, DailyBalance,
    PeriodSummary,
};
pub use body_trend::{
    cumulative_progress, history_window, latest_vs_previous, next_milestone, CumulativeProgress,
    MeasurementChange, MilestoneProgress, TrendDirection,
};
pub use buckets::{
    bucket, filter_period, newest_first, on_day, window_start, DateRange, DayBucket, Period,
    MAX_WINDOW_DAYS,
};
pub use goals::{active_goals, evaluate, GoalCard, GoalId, GoalInputs, GoalKind, GoalProgress};
pub use streaks::{
    activity_series, consistency_score, current_streak, evaluate_catalog, level_milestones,
    perfect_days, Achievement, AchievementStats, ActivityDay, LevelMilestone, LevelTier,
};
pub use totals::{
    aggregate, bucket_totals, daily_value_percentages, macro_calorie_split, meal_breakdown,
    period_average, DailyValue, DayTotals, MacroSplit, PeriodAverages,
};
