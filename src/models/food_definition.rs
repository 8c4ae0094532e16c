//! Food Definition model
//!
//! A reusable nutrition profile expressed per 100 units. Names are unique
//! case-insensitively.

use chrono::Utc;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::kv::{self, FOOD_DATABASE_KEY};
use crate::db::DbResult;
use super::record::{next_id, Identified};
use super::{Nutrition, Unit};

/// A food in the personal database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDefinition {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub is_supplement: bool,
    /// Per 100 units
    #[serde(flatten)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub usage_count: u32,
}

impl Identified for FoodDefinition {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Data for creating a food definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodDefinitionCreate {
    pub name: String,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub is_supplement: bool,
    pub nutrition: Nutrition,
}

/// Data for updating a food definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodDefinitionUpdate {
    pub name: Option<String>,
    pub unit: Option<Unit>,
    pub is_supplement: Option<bool>,
    pub nutrition: Option<Nutrition>,
}

/// Result of recording a food use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Incremented,
}

/// Find the position of a definition by case-insensitive name
pub fn position_by_name(foods: &[FoodDefinition], name: &str) -> Option<usize> {
    let needle = name.trim().to_lowercase();
    foods.iter().position(|f| f.name.trim().to_lowercase() == needle)
}

/// Insert a new definition or bump the usage count of the existing one with
/// the same name. Returns the stored definition.
pub fn upsert(foods: &mut Vec<FoodDefinition>, data: &FoodDefinitionCreate) -> (FoodDefinition, Upsert) {
    if let Some(idx) = position_by_name(foods, &data.name) {
        foods[idx].usage_count += 1;
        return (foods[idx].clone(), Upsert::Incremented);
    }

    let food = FoodDefinition {
        id: next_id(foods, Utc::now()),
        name: data.name.trim().to_string(),
        unit: data.unit,
        is_supplement: data.is_supplement,
        nutrition: data.nutrition.non_negative(),
        usage_count: 1,
    };
    foods.push(food.clone());
    (food, Upsert::Inserted)
}

/// Foods matching a search term, limited to supplements or non-supplements,
/// most used first.
pub fn recommend<'a>(
    foods: &'a [FoodDefinition],
    search: &str,
    supplements: bool,
    limit: usize,
) -> Vec<&'a FoodDefinition> {
    let needle = search.trim().to_lowercase();
    let mut matches: Vec<&FoodDefinition> = foods
        .iter()
        .filter(|f| f.is_supplement == supplements)
        .filter(|f| f.name.to_lowercase().contains(&needle))
        .collect();
    // Stable sort keeps insertion order among equal counts
    matches.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
    matches.truncate(limit);
    matches
}

impl FoodDefinition {
    /// Load the whole food database
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        kv::load(conn, FOOD_DATABASE_KEY)
    }

    /// Replace the whole food database
    pub fn save_all(conn: &Connection, foods: &[Self]) -> DbResult<()> {
        kv::save(conn, FOOD_DATABASE_KEY, foods)
    }

    /// Get a definition by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        Ok(Self::list(conn)?.into_iter().find(|f| f.id == id))
    }

    /// Get a definition by case-insensitive name
    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let foods = Self::list(conn)?;
        Ok(position_by_name(&foods, name).map(|idx| foods[idx].clone()))
    }

    /// Insert or increment usage, then persist
    pub fn record_use(conn: &Connection, data: &FoodDefinitionCreate) -> DbResult<(Self, Upsert)> {
        let mut foods = Self::list(conn)?;
        let result = upsert(&mut foods, data);
        Self::save_all(conn, &foods)?;
        Ok(result)
    }

    /// Merge changes into a definition
    pub fn update(conn: &Connection, id: i64, data: &FoodDefinitionUpdate) -> DbResult<Option<Self>> {
        let mut foods = Self::list(conn)?;
        let Some(food) = foods.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };

        if let Some(ref name) = data.name {
            food.name = name.trim().to_string();
        }
        if let Some(unit) = data.unit {
            food.unit = unit;
        }
        if let Some(is_supplement) = data.is_supplement {
            food.is_supplement = is_supplement;
        }
        if let Some(nutrition) = data.nutrition {
            food.nutrition = nutrition.non_negative();
        }

        let updated = food.clone();
        Self::save_all(conn, &foods)?;
        Ok(Some(updated))
    }

    /// Delete a definition by ID
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let mut foods = Self::list(conn)?;
        let before = foods.len();
        foods.retain(|f| f.id != id);
        if foods.len() == before {
            return Ok(false);
        }
        Self::save_all(conn, &foods)?;
        Ok(true)
    }
}

impl From<&FoodDefinition> for FoodDefinitionCreate {
    fn from(food: &FoodDefinition) -> Self {
        Self {
            name: food.name.clone(),
            unit: food.unit,
            is_supplement: food.is_supplement,
            nutrition: food.nutrition,
        }
    }
}
