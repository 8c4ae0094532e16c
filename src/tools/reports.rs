//! Report tools
//!
//! Calorie balance history, macro statistics and micronutrient coverage.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::analytics::{
    aggregate, bucket, bucket_totals, daily_balances, daily_value_percentages, filter_period,
    macro_calorie_split, meal_breakdown, newest_first, on_day, period_average, period_summary,
    DailyBalance, DailyValue, DayTotals, MacroSplit, Period, PeriodSummary,
};
use crate::db::Database;
use crate::models::{ExerciseEntry, FoodEntry, MealType, Nutrient, Nutrition};

/// Window of the meal and macro distributions: today and the seven days
/// before it
const DISTRIBUTION_DAYS: u32 = 8;

/// Response for calorie_history
#[derive(Debug, Serialize)]
pub struct CalorieHistory {
    pub days: u32,
    /// Newest first
    pub rows: Vec<DailyBalance>,
    /// Averages divide by every day of the window
    pub summary: PeriodSummary,
}

/// Per-day macro totals
#[derive(Debug, Serialize)]
pub struct MacroDay {
    pub date: NaiveDate,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Response for nutrition_statistics
#[derive(Debug, Serialize)]
pub struct NutritionStatistics {
    /// Chronological
    pub daily: Vec<MacroDay>,
    /// Averages over every day in `daily`, rounded
    pub average_calories: f64,
    pub average_protein: f64,
    pub average_carbs: f64,
    pub average_fat: f64,
    pub active_days: usize,
    /// Calories per primary meal slot over the last seven days
    pub meal_distribution: BTreeMap<MealType, f64>,
    /// Macro energy over the last seven days
    pub macro_distribution: MacroSplit,
}

/// One day of micronutrient totals
#[derive(Debug, Serialize)]
pub struct MicronutrientDay {
    pub date: NaiveDate,
    pub values: BTreeMap<&'static str, f64>,
}

/// Response for micronutrient_report
#[derive(Debug, Serialize)]
pub struct MicronutrientReport {
    pub today: Vec<DailyValue>,
    /// Chronological
    pub history: Vec<MicronutrientDay>,
    /// Average intake per calendar day against the daily values
    pub period_average: Vec<DailyValue>,
}

fn load_entries(db: &Database) -> Result<Vec<FoodEntry>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    FoodEntry::list(&conn).map_err(|e| format!("Failed to list food entries: {}", e))
}

/// Intake, burn and net per day over the last `days` days
pub fn calorie_history<Tz: TimeZone>(
    db: &Database,
    days: u32,
    today: NaiveDate,
    tz: &Tz,
) -> Result<CalorieHistory, String> {
    let (entries, exercises) = {
        let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
        let entries = FoodEntry::list(&conn)
            .map_err(|e| format!("Failed to list food entries: {}", e))?;
        let exercises = ExerciseEntry::list(&conn)
            .map_err(|e| format!("Failed to list exercises: {}", e))?;
        (entries, exercises)
    };

    let balances = daily_balances(&entries, &exercises, Period::Rolling(days), today, tz);
    let summary = period_summary(&balances);

    Ok(CalorieHistory {
        days,
        rows: newest_first(balances),
        summary,
    })
}

/// Macro totals per day over a period ending today, with the recent meal
/// and macro distributions
pub fn nutrition_statistics<Tz: TimeZone>(
    db: &Database,
    period: Period,
    today: NaiveDate,
    tz: &Tz,
) -> Result<NutritionStatistics, String> {
    let entries = load_entries(db)?;

    let buckets = bucket(&entries, period, today, tz);
    let averages = period_average(&buckets);
    let daily = bucket_totals(&buckets)
        .into_iter()
        .map(|DayTotals { date, totals, .. }| MacroDay {
            date,
            calories: totals.calories,
            protein: totals.protein,
            carbs: totals.carbs,
            fat: totals.fat,
        })
        .collect();

    let recent = filter_period(&entries, Period::Rolling(DISTRIBUTION_DAYS), today, tz);
    let mut meal_distribution = meal_breakdown(recent.iter().copied());
    meal_distribution.retain(|meal, _| meal.is_primary());

    let per_day = averages.average_per_calendar_day;
    Ok(NutritionStatistics {
        daily,
        average_calories: per_day.calories.round(),
        average_protein: per_day.protein.round(),
        average_carbs: per_day.carbs.round(),
        average_fat: per_day.fat.round(),
        active_days: averages.active_days,
        meal_distribution,
        macro_distribution: macro_calorie_split(&aggregate(recent.iter().copied())),
    })
}

fn micronutrients(totals: &Nutrition) -> BTreeMap<&'static str, f64> {
    Nutrient::MICROS
        .iter()
        .map(|&n| (n.as_str(), totals.get(n)))
        .collect()
}

/// Today's micronutrient coverage plus the per-day series for a period
pub fn micronutrient_report<Tz: TimeZone>(
    db: &Database,
    period: Period,
    today: NaiveDate,
    tz: &Tz,
) -> Result<MicronutrientReport, String> {
    let entries = load_entries(db)?;

    let todays = aggregate(on_day(&entries, today, tz));
    let buckets = bucket(&entries, period, today, tz);
    let averages = period_average(&buckets);

    let history = bucket_totals(&buckets)
        .iter()
        .map(|day| MicronutrientDay {
            date: day.date,
            values: micronutrients(&day.totals),
        })
        .collect();

    Ok(MicronutrientReport {
        today: daily_value_percentages(&todays),
        history,
        period_average: daily_value_percentages(&averages.average_per_calendar_day),
    })
}
