//! Food database tools
//!
//! Managing the per-100 food definitions and the most-used suggestions.

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{
    recommend, FoodDefinition, FoodDefinitionCreate, FoodDefinitionUpdate, MealType, Upsert,
};

/// Number of suggestions returned by recommend_foods
pub const RECOMMENDATION_LIMIT: usize = 10;

/// Response for add_food
#[derive(Debug, Serialize)]
pub struct AddFoodResponse {
    pub food: FoodDefinition,
    pub created: bool,
}

/// Response for list_foods
#[derive(Debug, Serialize)]
pub struct ListFoodsResponse {
    pub foods: Vec<FoodDefinition>,
    pub total: usize,
}

fn validate_create(data: &FoodDefinitionCreate) -> Result<(), String> {
    if data.name.trim().is_empty() {
        return Err("Food name must not be empty".to_string());
    }
    if data.nutrition.calories < 0.0 {
        return Err("Calories must not be negative".to_string());
    }
    Ok(())
}

/// Add a food, or bump its usage count when the name already exists
pub fn add_food(db: &Database, data: &FoodDefinitionCreate) -> Result<AddFoodResponse, String> {
    validate_create(data)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let (food, upsert) = FoodDefinition::record_use(&conn, data)
        .map_err(|e| format!("Failed to save food: {}", e))?;

    info!(id = food.id, name = %food.name, usage = food.usage_count, "food recorded");

    Ok(AddFoodResponse {
        food,
        created: upsert == Upsert::Inserted,
    })
}

/// Merge changes into a food definition. Existing entries keep their
/// denormalized nutrition.
pub fn update_food(
    db: &Database,
    id: i64,
    data: &FoodDefinitionUpdate,
) -> Result<Option<FoodDefinition>, String> {
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            return Err("Food name must not be empty".to_string());
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if let Some(ref name) = data.name {
        let clash = FoodDefinition::get_by_name(&conn, name)
            .map_err(|e| format!("Failed to check food name: {}", e))?;
        if clash.is_some_and(|f| f.id != id) {
            return Err(format!("A food named '{}' already exists", name.trim()));
        }
    }

    FoodDefinition::update(&conn, id, data)
        .map_err(|e| format!("Failed to update food: {}", e))
}

/// Delete a food definition
pub fn delete_food(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    FoodDefinition::delete(&conn, id)
        .map_err(|e| format!("Failed to delete food: {}", e))
}

/// List foods, optionally filtered by a name substring, most used first
pub fn list_foods(db: &Database, search: Option<&str>) -> Result<ListFoodsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let mut foods = FoodDefinition::list(&conn)
        .map_err(|e| format!("Failed to list foods: {}", e))?;

    if let Some(search) = search {
        let needle = search.trim().to_lowercase();
        foods.retain(|f| f.name.to_lowercase().contains(&needle));
    }
    foods.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));

    let total = foods.len();
    Ok(ListFoodsResponse { foods, total })
}

/// Suggestions for a meal slot. The supplements slot only suggests
/// supplements; the other slots never do.
pub fn recommend_foods(
    db: &Database,
    search: &str,
    meal_type: &str,
) -> Result<Vec<FoodDefinition>, String> {
    let meal_type = MealType::from_str(meal_type)
        .ok_or_else(|| format!("Invalid meal_type '{}'", meal_type))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let foods = FoodDefinition::list(&conn)
        .map_err(|e| format!("Failed to list foods: {}", e))?;

    let supplements = meal_type == MealType::Supplements;
    Ok(recommend(&foods, search, supplements, RECOMMENDATION_LIMIT)
        .into_iter()
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Nutrition, Unit};

    fn food(name: &str, is_supplement: bool) -> FoodDefinitionCreate {
        FoodDefinitionCreate {
            name: name.to_string(),
            unit: if is_supplement { Unit::Pill } else { Unit::G },
            is_supplement,
            nutrition: Nutrition {
                calories: 120.0,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_add_food_dedupes_by_name() {
        let db = Database::in_memory().unwrap();
        assert!(add_food(&db, &food("Banana", false)).unwrap().created);

        let again = add_food(&db, &food("banana ", false)).unwrap();
        assert!(!again.created);
        assert_eq!(again.food.usage_count, 2);
        assert_eq!(list_foods(&db, None).unwrap().total, 1);
    }

    #[test]
    fn test_update_and_delete_food() {
        let db = Database::in_memory().unwrap();
        let banana = add_food(&db, &food("Banana", false)).unwrap().food;
        add_food(&db, &food("Apple", false)).unwrap();

        let update = FoodDefinitionUpdate {
            name: Some("apple".to_string()),
            ..Default::default()
        };
        assert!(update_food(&db, banana.id, &update).is_err());

        let update = FoodDefinitionUpdate {
            name: Some("Plantain".to_string()),
            ..Default::default()
        };
        let updated = update_food(&db, banana.id, &update).unwrap().unwrap();
        assert_eq!(updated.name, "Plantain");
        assert_eq!(updated.usage_count, 1);

        assert!(update_food(&db, 7, &FoodDefinitionUpdate::default()).unwrap().is_none());
        assert!(delete_food(&db, banana.id).unwrap());
        assert_eq!(list_foods(&db, Some("plan")).unwrap().total, 0);
    }

    #[test]
    fn test_recommend_foods_by_slot() {
        let db = Database::in_memory().unwrap();
        add_food(&db, &food("Whey", false)).unwrap();
        add_food(&db, &food("Wheat bread", false)).unwrap();
        add_food(&db, &food("Wheat bread", false)).unwrap();
        add_food(&db, &food("Vitamin D", true)).unwrap();

        let lunch = recommend_foods(&db, "whe", "lunch").unwrap();
        let names: Vec<&str> = lunch.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Wheat bread", "Whey"]);

        let supplements = recommend_foods(&db, "", "supplements").unwrap();
        assert_eq!(supplements.len(), 1);
        assert_eq!(supplements[0].name, "Vitamin D");

        assert!(recommend_foods(&db, "", "elevenses").is_err());
    }

    #[test]
    fn test_recommend_limit() {
        let db = Database::in_memory().unwrap();
        for i in 0..15 {
            add_food(&db, &food(&format!("Food {}", i), false)).unwrap();
        }
        assert_eq!(recommend_foods(&db, "food", "dinner").unwrap().len(), RECOMMENDATION_LIMIT);
    }
}
