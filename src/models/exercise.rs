//! Exercise model
//!
//! Represents logged workouts. Calories burned are fixed at creation from the
//! activity's per-minute rate.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::kv::{self, EXERCISE_HISTORY_KEY};
use crate::db::DbResult;
use super::record::{impl_record, next_id};

/// Activity catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseType {
    Running,
    Walking,
    Cycling,
    Swimming,
    #[serde(rename = "Gym - Strength")]
    GymStrength,
    #[serde(rename = "Gym - Cardio")]
    GymCardio,
    Yoga,
    Dancing,
    Sports,
    #[serde(other)]
    Other,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 10] = [
        ExerciseType::Running,
        ExerciseType::Walking,
        ExerciseType::Cycling,
        ExerciseType::Swimming,
        ExerciseType::GymStrength,
        ExerciseType::GymCardio,
        ExerciseType::Yoga,
        ExerciseType::Dancing,
        ExerciseType::Sports,
        ExerciseType::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseType::Running => "Running",
            ExerciseType::Walking => "Walking",
            ExerciseType::Cycling => "Cycling",
            ExerciseType::Swimming => "Swimming",
            ExerciseType::GymStrength => "Gym - Strength",
            ExerciseType::GymCardio => "Gym - Cardio",
            ExerciseType::Yoga => "Yoga",
            ExerciseType::Dancing => "Dancing",
            ExerciseType::Sports => "Sports",
            ExerciseType::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.display_name().to_lowercase() == needle)
    }

    /// Calories burned per minute of activity
    pub fn calories_per_minute(&self) -> f64 {
        match self {
            ExerciseType::Running => 10.0,
            ExerciseType::Walking => 4.0,
            ExerciseType::Cycling => 8.0,
            ExerciseType::Swimming => 11.0,
            ExerciseType::GymStrength => 6.0,
            ExerciseType::GymCardio => 9.0,
            ExerciseType::Yoga => 3.0,
            ExerciseType::Dancing => 7.0,
            ExerciseType::Sports => 8.0,
            ExerciseType::Other => 5.0,
        }
    }

    /// Calories burned for a session, rounded to whole kcal
    pub fn calories_for(&self, duration_minutes: f64) -> f64 {
        (self.calories_per_minute() * duration_minutes).round()
    }
}

/// A logged workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub id: i64,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    /// Minutes
    pub duration: f64,
    #[serde(default)]
    pub calories_burned: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl_record!(ExerciseEntry);

/// Data for creating a new exercise entry
#[derive(Debug, Clone)]
pub struct ExerciseCreate {
    pub date: DateTime<Utc>,
    pub exercise_type: ExerciseType,
    pub duration: f64,
    pub notes: Option<String>,
}

impl ExerciseEntry {
    /// Build an entry, computing calories burned from the activity rate
    pub fn new(id: i64, data: &ExerciseCreate) -> Self {
        Self {
            id,
            date: data.date,
            exercise_type: data.exercise_type,
            duration: data.duration,
            calories_burned: data.exercise_type.calories_for(data.duration),
            notes: data
                .notes
                .as_ref()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        }
    }

    /// Load all exercise entries
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        kv::load(conn, EXERCISE_HISTORY_KEY)
    }

    /// Replace all exercise entries
    pub fn save_all(conn: &Connection, exercises: &[Self]) -> DbResult<()> {
        kv::save(conn, EXERCISE_HISTORY_KEY, exercises)
    }

    /// Create a new exercise entry
    pub fn create(conn: &Connection, data: &ExerciseCreate) -> DbResult<Self> {
        let mut exercises = Self::list(conn)?;
        let entry = Self::new(next_id(&exercises, Utc::now()), data);
        exercises.push(entry.clone());
        Self::save_all(conn, &exercises)?;
        Ok(entry)
    }

    /// Delete an exercise entry
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let mut exercises = Self::list(conn)?;
        let before = exercises.len();
        exercises.retain(|e| e.id != id);
        if exercises.len() == before {
            return Ok(false);
        }
        Self::save_all(conn, &exercises)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_calories_rounded() {
        assert_eq!(ExerciseType::Running.calories_for(30.0), 300.0);
        assert_eq!(ExerciseType::Yoga.calories_for(12.5), 38.0);
    }

    #[test]
    fn test_type_names_round_trip_through_json() {
        let json = serde_json::to_string(&ExerciseType::GymStrength).unwrap();
        assert_eq!(json, "\"Gym - Strength\"");
        let parsed: ExerciseType = serde_json::from_str("\"Kayaking\"").unwrap();
        assert_eq!(parsed, ExerciseType::Other);
    }

    #[test]
    fn test_new_entry() {
        let data = ExerciseCreate {
            date: Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap(),
            exercise_type: ExerciseType::from_str("swimming").unwrap(),
            duration: 45.0,
            notes: Some("  ".to_string()),
        };
        let entry = ExerciseEntry::new(7, &data);
        assert_eq!(entry.calories_burned, 495.0);
        assert_eq!(entry.notes, None);
    }
}
