//! Exercise tools
//!
//! Logging workouts and summarizing burn over time.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::info;

use crate::analytics::{bucket, on_day, Period};
use crate::db::Database;
use crate::models::{ExerciseCreate, ExerciseEntry, ExerciseType};

/// Burn and minutes of one day
#[derive(Debug, Serialize)]
pub struct ExerciseDay {
    pub date: NaiveDate,
    pub calories_burned: f64,
    pub duration: f64,
    pub sessions: usize,
}

/// Response for exercise_overview
#[derive(Debug, Serialize)]
pub struct ExerciseOverview {
    pub today: Vec<ExerciseEntry>,
    pub today_calories_burned: f64,
    pub today_duration: f64,
    /// Chronological
    pub days: Vec<ExerciseDay>,
    pub total_calories_burned: f64,
    pub total_duration: f64,
}

/// Activity catalog entry
#[derive(Debug, Serialize)]
pub struct ExerciseTypeInfo {
    pub name: &'static str,
    pub calories_per_minute: f64,
}

/// The activities that can be logged, with their burn rates
pub fn list_exercise_types() -> Vec<ExerciseTypeInfo> {
    ExerciseType::ALL
        .iter()
        .map(|t| ExerciseTypeInfo {
            name: t.display_name(),
            calories_per_minute: t.calories_per_minute(),
        })
        .collect()
}

/// Log a workout; calories burned come from the activity's rate
pub fn log_exercise(
    db: &Database,
    exercise_type: &str,
    duration: f64,
    date: DateTime<Utc>,
    notes: Option<String>,
) -> Result<ExerciseEntry, String> {
    let exercise_type = ExerciseType::from_str(exercise_type)
        .ok_or_else(|| format!("Unknown exercise type: {}", exercise_type))?;

    if !duration.is_finite() || duration <= 0.0 {
        return Err("Duration must be greater than 0".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let data = ExerciseCreate {
        date,
        exercise_type,
        duration,
        notes,
    };
    let entry = ExerciseEntry::create(&conn, &data)
        .map_err(|e| format!("Failed to log exercise: {}", e))?;

    info!(
        id = entry.id,
        exercise = exercise_type.display_name(),
        calories = entry.calories_burned,
        "exercise logged"
    );
    Ok(entry)
}

/// Delete a workout
pub fn delete_exercise(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    ExerciseEntry::delete(&conn, id)
        .map_err(|e| format!("Failed to delete exercise: {}", e))
}

/// Today's sessions plus a per-day series over the period ending today
pub fn exercise_overview<Tz: TimeZone>(
    db: &Database,
    period: Period,
    today: NaiveDate,
    tz: &Tz,
) -> Result<ExerciseOverview, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let exercises = ExerciseEntry::list(&conn)
        .map_err(|e| format!("Failed to list exercises: {}", e))?;

    let mut todays: Vec<ExerciseEntry> = on_day(&exercises, today, tz).into_iter().cloned().collect();
    todays.sort_by(|a, b| b.date.cmp(&a.date));

    let days: Vec<ExerciseDay> = bucket(&exercises, period, today, tz)
        .into_iter()
        .map(|b| ExerciseDay {
            date: b.day,
            calories_burned: b.items.iter().map(|e| e.calories_burned).sum(),
            duration: b.items.iter().map(|e| e.duration).sum(),
            sessions: b.items.len(),
        })
        .collect();

    Ok(ExerciseOverview {
        today_calories_burned: todays.iter().map(|e| e.calories_burned).sum(),
        today_duration: todays.iter().map(|e| e.duration).sum(),
        today: todays,
        total_calories_burned: days.iter().map(|d| d.calories_burned).sum(),
        total_duration: days.iter().map(|d| d.duration).sum(),
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_log_exercise_computes_burn() {
        let db = Database::in_memory().unwrap();
        let entry = log_exercise(&db, "gym - strength", 45.0, at(10, 18), None).unwrap();
        assert_eq!(entry.exercise_type, ExerciseType::GymStrength);
        assert_eq!(entry.calories_burned, 270.0);

        assert!(log_exercise(&db, "Juggling", 30.0, at(10, 18), None).is_err());
        assert!(log_exercise(&db, "Running", 0.0, at(10, 18), None).is_err());
    }

    #[test]
    fn test_exercise_overview() {
        let db = Database::in_memory().unwrap();
        log_exercise(&db, "Running", 30.0, at(10, 7), None).unwrap();
        log_exercise(&db, "Yoga", 20.0, at(10, 19), Some("evening".to_string())).unwrap();
        let old = log_exercise(&db, "Walking", 60.0, at(8, 12), None).unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let overview = exercise_overview(&db, Period::Rolling(7), today, &Utc).unwrap();
        assert_eq!(overview.today.len(), 2);
        assert_eq!(overview.today[0].exercise_type, ExerciseType::Yoga);
        assert_eq!(overview.today_calories_burned, 360.0);
        assert_eq!(overview.today_duration, 50.0);
        assert_eq!(overview.days.len(), 7);
        assert_eq!(overview.days[4].calories_burned, 240.0);
        assert_eq!(overview.total_calories_burned, 600.0);

        assert!(delete_exercise(&db, old.id).unwrap());
        let overview = exercise_overview(&db, Period::All, today, &Utc).unwrap();
        assert_eq!(overview.days.len(), 1);
    }

    #[test]
    fn test_exercise_catalog() {
        let types = list_exercise_types();
        assert_eq!(types.len(), 10);
        assert_eq!(types[3].name, "Swimming");
        assert_eq!(types[3].calories_per_minute, 11.0);
    }
}
