//! Food Entry model
//!
//! A logged consumption event. Nutrition is scaled from a food definition at
//! creation and stored denormalized, so later edits to the definition never
//! change past entries.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::kv::{self, FOOD_ENTRIES_KEY};
use crate::db::DbResult;
use super::record::{impl_record, next_id};
use super::{FoodDefinition, Nutrition};

/// Meal slot of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
    Supplements,
}

impl MealType {
    pub const ALL: [MealType; 5] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snacks,
        MealType::Supplements,
    ];

    /// The four primary meal slots that make up a perfect day
    pub const PRIMARY: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snacks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snacks => "snacks",
            MealType::Supplements => "supplements",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snacks" | "snack" => Some(MealType::Snacks),
            "supplements" | "supplement" => Some(MealType::Supplements),
            _ => None,
        }
    }

    pub fn is_primary(&self) -> bool {
        !matches!(self, MealType::Supplements)
    }
}

/// Portion unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    G,
    Ml,
    Serving,
    Pill,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::G => "g",
            Unit::Ml => "ml",
            Unit::Serving => "serving",
            Unit::Pill => "pill",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => Some(Unit::G),
            "ml" => Some(Unit::Ml),
            "serving" | "servings" => Some(Unit::Serving),
            "pill" | "pills" => Some(Unit::Pill),
            _ => None,
        }
    }
}

/// A logged food entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub meal_type: MealType,
    pub food_name: String,
    pub amount: f64,
    #[serde(default)]
    pub unit: Unit,
    #[serde(flatten)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub is_supplement: bool,
}

impl_record!(FoodEntry);

/// Data for creating a new food entry
#[derive(Debug, Clone)]
pub struct FoodEntryCreate {
    pub date: DateTime<Utc>,
    pub meal_type: MealType,
    pub amount: f64,
    /// Defaults to the definition's unit
    pub unit: Option<Unit>,
}

impl FoodEntry {
    /// Build an entry from a definition, scaling its per-100 nutrition by
    /// `amount / 100`.
    pub fn from_definition(id: i64, definition: &FoodDefinition, data: &FoodEntryCreate) -> Self {
        let multiplier = data.amount / 100.0;
        Self {
            id,
            date: data.date,
            meal_type: data.meal_type,
            food_name: definition.name.clone(),
            amount: data.amount,
            unit: data.unit.unwrap_or(definition.unit),
            nutrition: definition.nutrition.scale(multiplier).non_negative(),
            is_supplement: definition.is_supplement,
        }
    }

    /// Load all entries
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        kv::load(conn, FOOD_ENTRIES_KEY)
    }

    /// Replace all entries
    pub fn save_all(conn: &Connection, entries: &[Self]) -> DbResult<()> {
        kv::save(conn, FOOD_ENTRIES_KEY, entries)
    }

    /// Create a new entry from a definition and persist it
    pub fn create(
        conn: &Connection,
        definition: &FoodDefinition,
        data: &FoodEntryCreate,
    ) -> DbResult<Self> {
        let mut entries = Self::list(conn)?;
        let id = next_id(&entries, Utc::now());
        let entry = Self::from_definition(id, definition, data);
        entries.push(entry.clone());
        Self::save_all(conn, &entries)?;
        Ok(entry)
    }

    /// Delete an entry by ID
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let mut entries = Self::list(conn)?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        Self::save_all(conn, &entries)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn definition() -> FoodDefinition {
        FoodDefinition {
            id: 1,
            name: "Oats".to_string(),
            unit: Unit::G,
            is_supplement: false,
            nutrition: Nutrition {
                calories: 380.0,
                protein: 13.0,
                iron: 4.0,
                ..Default::default()
            },
            usage_count: 3,
        }
    }

    #[test]
    fn test_from_definition_scales_per_100() {
        let data = FoodEntryCreate {
            date: Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap(),
            meal_type: MealType::Breakfast,
            amount: 50.0,
            unit: None,
        };
        let entry = FoodEntry::from_definition(10, &definition(), &data);

        assert_eq!(entry.food_name, "Oats");
        assert_eq!(entry.unit, Unit::G);
        assert!((entry.nutrition.calories - 190.0).abs() < 1e-9);
        assert!((entry.nutrition.protein - 6.5).abs() < 1e-9);
        assert!((entry.nutrition.iron - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_deserialize_stored_shape() {
        let json = r#"{
            "id": 1714550000000,
            "date": "2024-05-01T07:30:00.000Z",
            "mealType": "snacks",
            "foodName": "Apple",
            "amount": 150,
            "unit": "g",
            "calories": 78,
            "protein": 0.4,
            "carbs": 21,
            "fat": 0.3,
            "vitaminC": 6.9
        }"#;
        let entry: FoodEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.meal_type, MealType::Snacks);
        assert_eq!(entry.nutrition.calories, 78.0);
        assert_eq!(entry.nutrition.vitamin_c, 6.9);
        assert_eq!(entry.nutrition.zinc, 0.0);
        assert!(!entry.is_supplement);
    }

    #[test]
    fn test_meal_type_from_str() {
        assert_eq!(MealType::from_str("Snack"), Some(MealType::Snacks));
        assert_eq!(MealType::from_str("dinner"), Some(MealType::Dinner));
        assert_eq!(MealType::from_str("brunch"), None);
        assert!(!MealType::Supplements.is_primary());
    }
}
