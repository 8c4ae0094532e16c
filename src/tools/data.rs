//! Data tools
//!
//! Full export of every store and the bulk clear.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::kv::{self, ALL_KEYS};
use crate::db::Database;
use crate::models::{
    AchievementState, BodyCompositionEntry, ExerciseEntry, FoodDefinition, FoodEntry, GoalConfig,
    Nutrition,
};

pub const EXPORT_VERSION: &str = "1.0.0";

/// The export document
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportDocument {
    pub meta: ExportMeta,
    pub user_profile: UserProfile,
    pub food_entries: Vec<ExportFoodEntry>,
    pub exercise_entries: Vec<ExportExercise>,
    pub body_composition_history: Vec<ExportMeasurement>,
    pub food_database: Vec<ExportFood>,
    pub summary_statistics: SummaryStatistics,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportMeta {
    pub export_date: DateTime<Utc>,
    pub version: String,
    pub description: String,
    pub data_types: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub goals: ExportGoals,
    pub achievements: ExportAchievements,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportGoals {
    pub focus: String,
    pub daily_calorie_target: f64,
    pub daily_protein_target: f64,
    pub net_calorie_target: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportAchievements {
    pub current_streak: u32,
    pub total_entries: u32,
    pub perfect_days: u32,
    pub current_level: u32,
}

/// Macros and the main optional nutrients; zero optionals are null
#[derive(Debug, Serialize, Deserialize)]
pub struct NutritionalInfo {
    pub calories: f64,
    pub protein_g: f64,
    pub carbohydrates_g: f64,
    pub fat_g: f64,
    pub fiber_g: Option<f64>,
    pub sugar_g: Option<f64>,
    pub sodium_mg: Option<f64>,
}

/// Vitamins and minerals; zero values are null
#[derive(Debug, Serialize, Deserialize)]
pub struct VitaminsMinerals {
    pub vitamin_a_mcg: Option<f64>,
    pub vitamin_c_mg: Option<f64>,
    pub vitamin_d_mcg: Option<f64>,
    pub vitamin_e_mg: Option<f64>,
    pub vitamin_k_mcg: Option<f64>,
    pub vitamin_b6_mg: Option<f64>,
    pub vitamin_b12_mcg: Option<f64>,
    pub calcium_mg: Option<f64>,
    pub iron_mg: Option<f64>,
    pub magnesium_mg: Option<f64>,
    pub potassium_mg: Option<f64>,
    pub zinc_mg: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PortionInfo {
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportFoodEntry {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub meal_type: String,
    pub food_name: String,
    pub is_supplement: bool,
    pub nutritional_info: NutritionalInfo,
    pub vitamins_minerals: VitaminsMinerals,
    pub portion_info: PortionInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportExercise {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub exercise_name: String,
    pub exercise_type: String,
    pub duration_minutes: f64,
    pub calories_burned: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportMeasurement {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub body_fat_percentage: f64,
    pub weight_kg: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportFood {
    pub id: i64,
    pub name: String,
    pub is_supplement: bool,
    pub usage_count: u32,
    pub nutritional_info_per_100g: NutritionalInfo,
    pub vitamins_minerals_per_100g: VitaminsMinerals,
    pub default_unit: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DateRangeMillis {
    pub first_entry: Option<i64>,
    pub last_entry: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_food_entries: usize,
    pub total_exercise_entries: usize,
    pub total_body_measurements: usize,
    pub foods_in_database: usize,
    pub date_range: DateRangeMillis,
}

/// Response for clear_all_data
#[derive(Debug, Serialize)]
pub struct ClearAllResponse {
    pub stores_cleared: usize,
}

fn optional(value: f64) -> Option<f64> {
    if value == 0.0 {
        None
    } else {
        Some(value)
    }
}

impl From<&Nutrition> for NutritionalInfo {
    fn from(n: &Nutrition) -> Self {
        Self {
            calories: n.calories,
            protein_g: n.protein,
            carbohydrates_g: n.carbs,
            fat_g: n.fat,
            fiber_g: optional(n.fiber),
            sugar_g: optional(n.sugar),
            sodium_mg: optional(n.sodium),
        }
    }
}

impl From<&Nutrition> for VitaminsMinerals {
    fn from(n: &Nutrition) -> Self {
        Self {
            vitamin_a_mcg: optional(n.vitamin_a),
            vitamin_c_mg: optional(n.vitamin_c),
            vitamin_d_mcg: optional(n.vitamin_d),
            vitamin_e_mg: optional(n.vitamin_e),
            vitamin_k_mcg: optional(n.vitamin_k),
            vitamin_b6_mg: optional(n.vitamin_b6),
            vitamin_b12_mcg: optional(n.vitamin_b12),
            calcium_mg: optional(n.calcium),
            iron_mg: optional(n.iron),
            magnesium_mg: optional(n.magnesium),
            potassium_mg: optional(n.potassium),
            zinc_mg: optional(n.zinc),
        }
    }
}

impl From<&FoodEntry> for ExportFoodEntry {
    fn from(entry: &FoodEntry) -> Self {
        Self {
            id: entry.id,
            date: entry.date,
            meal_type: entry.meal_type.as_str().to_string(),
            food_name: entry.food_name.clone(),
            is_supplement: entry.is_supplement,
            nutritional_info: NutritionalInfo::from(&entry.nutrition),
            vitamins_minerals: VitaminsMinerals::from(&entry.nutrition),
            portion_info: PortionInfo {
                amount: entry.amount,
                unit: entry.unit.as_str().to_string(),
            },
        }
    }
}

impl From<&ExerciseEntry> for ExportExercise {
    fn from(exercise: &ExerciseEntry) -> Self {
        Self {
            id: exercise.id,
            date: exercise.date,
            exercise_name: exercise.exercise_type.display_name().to_string(),
            exercise_type: exercise.exercise_type.display_name().to_string(),
            duration_minutes: exercise.duration,
            calories_burned: exercise.calories_burned,
            notes: exercise.notes.clone(),
        }
    }
}

impl From<&BodyCompositionEntry> for ExportMeasurement {
    fn from(entry: &BodyCompositionEntry) -> Self {
        Self {
            id: entry.id,
            date: entry.date,
            body_fat_percentage: entry.kfa,
            weight_kg: entry.weight,
            notes: entry.notes.clone(),
        }
    }
}

impl From<&FoodDefinition> for ExportFood {
    fn from(food: &FoodDefinition) -> Self {
        Self {
            id: food.id,
            name: food.name.clone(),
            is_supplement: food.is_supplement,
            usage_count: food.usage_count,
            nutritional_info_per_100g: NutritionalInfo::from(&food.nutrition),
            vitamins_minerals_per_100g: VitaminsMinerals::from(&food.nutrition),
            default_unit: food.unit.as_str().to_string(),
        }
    }
}

/// Build the export document from every store
pub fn export_all(db: &Database, now: DateTime<Utc>) -> Result<ExportDocument, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entries = FoodEntry::list(&conn)
        .map_err(|e| format!("Failed to list food entries: {}", e))?;
    let exercises = ExerciseEntry::list(&conn)
        .map_err(|e| format!("Failed to list exercises: {}", e))?;
    let measurements = BodyCompositionEntry::list(&conn)
        .map_err(|e| format!("Failed to list measurements: {}", e))?;
    let foods = FoodDefinition::list(&conn)
        .map_err(|e| format!("Failed to list foods: {}", e))?;
    let goals = GoalConfig::load(&conn)
        .map_err(|e| format!("Failed to load goals: {}", e))?;
    let achievements = AchievementState::load(&conn)
        .map_err(|e| format!("Failed to load achievements: {}", e))?;

    let date_range = DateRangeMillis {
        first_entry: entries.iter().map(|e| e.date.timestamp_millis()).min(),
        last_entry: entries.iter().map(|e| e.date.timestamp_millis()).max(),
    };

    let document = ExportDocument {
        meta: ExportMeta {
            export_date: now,
            version: EXPORT_VERSION.to_string(),
            description: "Complete calorie tracker data export - nutrition, exercise, and body composition history"
                .to_string(),
            data_types: [
                "food_entries",
                "exercise_entries",
                "body_composition",
                "food_database",
                "goals",
                "achievements",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        },
        user_profile: UserProfile {
            goals: ExportGoals {
                focus: goals.focus.as_str().to_string(),
                daily_calorie_target: goals.calorie_target,
                daily_protein_target: goals.protein_target,
                net_calorie_target: goals.net_target,
            },
            achievements: ExportAchievements {
                current_streak: achievements.streak,
                total_entries: achievements.total_entries,
                perfect_days: achievements.perfect_days,
                current_level: achievements.level,
            },
        },
        food_entries: entries.iter().map(ExportFoodEntry::from).collect(),
        exercise_entries: exercises.iter().map(ExportExercise::from).collect(),
        body_composition_history: measurements.iter().map(ExportMeasurement::from).collect(),
        food_database: foods.iter().map(ExportFood::from).collect(),
        summary_statistics: SummaryStatistics {
            total_food_entries: entries.len(),
            total_exercise_entries: exercises.len(),
            total_body_measurements: measurements.len(),
            foods_in_database: foods.len(),
            date_range,
        },
    };

    info!(
        entries = entries.len(),
        exercises = exercises.len(),
        measurements = measurements.len(),
        foods = foods.len(),
        "export built"
    );
    Ok(document)
}

/// Export as pretty-printed JSON
pub fn export_json(db: &Database, now: DateTime<Utc>) -> Result<String, String> {
    let document = export_all(db, now)?;
    serde_json::to_string_pretty(&document).map_err(|e| format!("Failed to serialize export: {}", e))
}

/// Remove every store in one transaction. Subsequent loads return defaults.
pub fn clear_all_data(db: &Database) -> Result<ClearAllResponse, String> {
    let stores_cleared = db
        .with_transaction(|tx| {
            let mut cleared = 0;
            for key in ALL_KEYS {
                if kv::remove(tx, key)? {
                    cleared += 1;
                }
            }
            Ok(cleared)
        })
        .map_err(|e| format!("Failed to clear data: {}", e))?;

    info!(stores_cleared, "all data cleared");
    Ok(ClearAllResponse { stores_cleared })
}
