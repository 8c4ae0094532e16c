//! Dashboard tool
//!
//! Today's intake, burn and goal progress in one response.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::analytics::{active_goals, aggregate, daily_balance, meal_breakdown, on_day};
use crate::analytics::{BalanceStatus, GoalCard, GoalInputs};
use crate::db::Database;
use crate::models::{AchievementState, ExerciseEntry, FoodEntry, GoalConfig, MealType};

/// Response for dashboard
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub intake: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub meals: BTreeMap<MealType, f64>,
    pub calories_burned: f64,
    pub net_calories: f64,
    pub balance: BalanceStatus,
    /// Calorie target minus net calories; negative once exceeded
    pub adjusted_remaining: f64,
    /// Intake against the calorie target, capped at 100
    pub intake_progress: f64,
    pub goals: GoalConfig,
    pub goal_cards: Vec<GoalCard>,
    pub achievements: AchievementState,
    /// Newest first
    pub entries: Vec<FoodEntry>,
    pub exercises: Vec<ExerciseEntry>,
}

/// Build the dashboard for `today`
pub fn dashboard<Tz: TimeZone>(db: &Database, today: NaiveDate, tz: &Tz) -> Result<Dashboard, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entries = FoodEntry::list(&conn)
        .map_err(|e| format!("Failed to list food entries: {}", e))?;
    let exercises = ExerciseEntry::list(&conn)
        .map_err(|e| format!("Failed to list exercises: {}", e))?;
    let goals = GoalConfig::load(&conn)
        .map_err(|e| format!("Failed to load goals: {}", e))?;
    let achievements = AchievementState::load(&conn)
        .map_err(|e| format!("Failed to load achievements: {}", e))?;

    let mut todays_entries: Vec<FoodEntry> = on_day(&entries, today, tz).into_iter().cloned().collect();
    todays_entries.sort_by(|a, b| b.date.cmp(&a.date));
    let mut todays_exercises: Vec<ExerciseEntry> =
        on_day(&exercises, today, tz).into_iter().cloned().collect();
    todays_exercises.sort_by(|a, b| b.date.cmp(&a.date));

    let totals = aggregate(&todays_entries);
    let burned: f64 = todays_exercises.iter().map(|e| e.calories_burned).sum();
    let balance = daily_balance(totals.calories, burned);

    let intake_progress = if goals.calorie_target > 0.0 {
        (totals.calories / goals.calorie_target * 100.0).min(100.0)
    } else {
        0.0
    };

    let inputs = GoalInputs {
        intake: totals.calories,
        protein: totals.protein,
        net: balance.net,
    };

    Ok(Dashboard {
        date: today,
        intake: totals.calories,
        protein: totals.protein,
        carbs: totals.carbs,
        fat: totals.fat,
        meals: meal_breakdown(&todays_entries),
        calories_burned: burned,
        net_calories: balance.net,
        balance: balance.status,
        adjusted_remaining: goals.calorie_target - balance.net,
        intake_progress,
        goal_cards: active_goals(&goals, &inputs),
        goals,
        achievements,
        entries: todays_entries,
        exercises: todays_exercises,
    })
}
