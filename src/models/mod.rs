//! Data models
//!
//! Record types for the tracker's stores.

mod achievements;
mod body_composition;
mod exercise;
mod food_definition;
mod food_entry;
mod goals;
mod nutrition;
mod record;

pub use achievements::AchievementState;
pub use body_composition::{BodyCompositionCreate, BodyCompositionEntry};
pub use exercise::{ExerciseCreate, ExerciseEntry, ExerciseType};
pub use food_definition::{
    position_by_name, recommend, upsert, FoodDefinition, FoodDefinitionCreate,
    FoodDefinitionUpdate, Upsert,
};
pub use food_entry::{FoodEntry, FoodEntryCreate, MealType, Unit};
pub use goals::{GoalConfig, GoalFocus, GoalPreset};
pub use nutrition::{Nutrient, Nutrition};
pub use record::{next_id, Dated, Identified};
