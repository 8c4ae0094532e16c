//! Food entry tools
//!
//! Logging, deleting and browsing food entries.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::info;

use crate::analytics::{aggregate, filter_period, meal_breakdown, Period};
use crate::db::Database;
use crate::models::{
    Dated, FoodDefinition, FoodDefinitionCreate, FoodEntry, FoodEntryCreate, MealType, Unit,
    Upsert,
};

/// Response for add_food_entry
#[derive(Debug, Serialize)]
pub struct AddFoodEntryResponse {
    pub entry: FoodEntry,
    pub food_id: i64,
    pub usage_count: u32,
    pub new_food: bool,
}

/// Totals for the entries of a listing
#[derive(Debug, Serialize)]
pub struct EntryPeriodStats {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub meals: BTreeMap<MealType, f64>,
    pub total_entries: usize,
    pub unique_days: usize,
    /// Divided by days that have entries
    pub avg_calories_per_day: f64,
    pub avg_protein_per_day: f64,
}

/// Response for list_food_entries
#[derive(Debug, Serialize)]
pub struct ListFoodEntriesResponse {
    /// Newest first
    pub entries: Vec<FoodEntry>,
    pub stats: EntryPeriodStats,
}

/// Response for history_overview
#[derive(Debug, Serialize)]
pub struct HistoryOverview {
    pub oldest_date: DateTime<Utc>,
    pub newest_date: DateTime<Utc>,
    pub unique_days: usize,
    pub total_entries: usize,
}

fn parse_meal_type(meal_type: &str) -> Result<MealType, String> {
    MealType::from_str(meal_type).ok_or_else(|| {
        format!(
            "Invalid meal_type '{}'. Must be one of: breakfast, lunch, dinner, snacks, supplements",
            meal_type
        )
    })
}

fn parse_unit(unit: Option<&str>) -> Result<Option<Unit>, String> {
    match unit {
        Some(u) => Unit::from_str(u)
            .map(Some)
            .ok_or_else(|| format!("Invalid unit '{}'. Must be one of: g, ml, serving, pill", u)),
        None => Ok(None),
    }
}

fn validate_amount(amount: f64) -> Result<(), String> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err("Amount must be greater than 0".to_string());
    }
    Ok(())
}

/// Log a food by its per-100 profile.
///
/// The profile is recorded in the food database first (inserted, or its
/// usage count bumped when the name already exists), then the entry is
/// scaled from the stored definition.
pub fn add_food_entry(
    db: &Database,
    food: &FoodDefinitionCreate,
    meal_type: &str,
    amount: f64,
    unit: Option<&str>,
    date: DateTime<Utc>,
) -> Result<AddFoodEntryResponse, String> {
    if food.name.trim().is_empty() {
        return Err("Food name must not be empty".to_string());
    }
    validate_amount(amount)?;
    let meal_type = parse_meal_type(meal_type)?;
    let unit = parse_unit(unit)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let (definition, upsert) = FoodDefinition::record_use(&conn, food)
        .map_err(|e| format!("Failed to record food: {}", e))?;

    let data = FoodEntryCreate {
        date,
        meal_type,
        amount,
        unit,
    };
    let entry = FoodEntry::create(&conn, &definition, &data)
        .map_err(|e| format!("Failed to log food entry: {}", e))?;

    info!(
        id = entry.id,
        food = %entry.food_name,
        meal = meal_type.as_str(),
        calories = entry.nutrition.calories,
        "food entry logged"
    );

    Ok(AddFoodEntryResponse {
        entry,
        food_id: definition.id,
        usage_count: definition.usage_count,
        new_food: upsert == Upsert::Inserted,
    })
}

/// Log an existing food definition
pub fn add_food_entry_by_id(
    db: &Database,
    food_id: i64,
    meal_type: &str,
    amount: f64,
    unit: Option<&str>,
    date: DateTime<Utc>,
) -> Result<AddFoodEntryResponse, String> {
    let definition = {
        let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
        FoodDefinition::get_by_id(&conn, food_id)
            .map_err(|e| format!("Failed to get food: {}", e))?
            .ok_or_else(|| format!("Food not found with id: {}", food_id))?
    };

    add_food_entry(
        db,
        &FoodDefinitionCreate::from(&definition),
        meal_type,
        amount,
        unit,
        date,
    )
}

/// Delete a food entry
pub fn delete_food_entry(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = FoodEntry::delete(&conn, id)
        .map_err(|e| format!("Failed to delete food entry: {}", e))?;
    if deleted {
        info!(id, "food entry deleted");
    }
    Ok(deleted)
}

/// List entries of a period, optionally filtered by a food name substring
pub fn list_food_entries<Tz: TimeZone>(
    db: &Database,
    period: Period,
    anchor: NaiveDate,
    search: Option<&str>,
    tz: &Tz,
) -> Result<ListFoodEntriesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let all = FoodEntry::list(&conn)
        .map_err(|e| format!("Failed to list food entries: {}", e))?;

    let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
    let mut entries: Vec<FoodEntry> = filter_period(&all, period, anchor, tz)
        .into_iter()
        .filter(|e| needle.is_empty() || e.food_name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    entries.sort_by(|a, b| b.date.cmp(&a.date));

    let totals = aggregate(&entries);
    let unique_days = entries
        .iter()
        .map(|e| e.local_day(tz))
        .collect::<HashSet<_>>()
        .len();
    let per_day = totals.per(unique_days as f64);

    let stats = EntryPeriodStats {
        calories: totals.calories,
        protein: totals.protein,
        carbs: totals.carbs,
        fat: totals.fat,
        meals: meal_breakdown(&entries),
        total_entries: entries.len(),
        unique_days,
        avg_calories_per_day: per_day.calories,
        avg_protein_per_day: per_day.protein,
    };

    Ok(ListFoodEntriesResponse { entries, stats })
}

/// Span and size of the whole entry history; `None` when there are no entries
pub fn history_overview<Tz: TimeZone>(db: &Database, tz: &Tz) -> Result<Option<HistoryOverview>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entries = FoodEntry::list(&conn)
        .map_err(|e| format!("Failed to list food entries: {}", e))?;

    let (Some(oldest), Some(newest)) = (
        entries.iter().map(|e| e.date).min(),
        entries.iter().map(|e| e.date).max(),
    ) else {
        return Ok(None);
    };

    let unique_days = entries
        .iter()
        .map(|e| e.local_day(tz))
        .collect::<HashSet<_>>()
        .len();

    Ok(Some(HistoryOverview {
        oldest_date: oldest,
        newest_date: newest,
        unique_days,
        total_entries: entries.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Nutrition;

    fn oats() -> FoodDefinitionCreate {
        FoodDefinitionCreate {
            name: "Oats".to_string(),
            unit: Unit::G,
            is_supplement: false,
            nutrition: Nutrition {
                calories: 380.0,
                protein: 13.0,
                carbs: 60.0,
                fat: 7.0,
                ..Default::default()
            },
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_add_food_entry_scales_and_counts_usage() {
        let db = Database::in_memory().unwrap();

        let first = add_food_entry(&db, &oats(), "breakfast", 50.0, None, at(10, 8)).unwrap();
        assert!(first.new_food);
        assert_eq!(first.usage_count, 1);
        assert!((first.entry.nutrition.calories - 190.0).abs() < 1e-9);
        assert!((first.entry.nutrition.protein - 6.5).abs() < 1e-9);

        let mut renamed = oats();
        renamed.name = "OATS".to_string();
        let second = add_food_entry(&db, &renamed, "snack", 100.0, Some("g"), at(10, 15)).unwrap();
        assert!(!second.new_food);
        assert_eq!(second.usage_count, 2);
        assert_eq!(second.food_id, first.food_id);
        assert_eq!(second.entry.meal_type, MealType::Snacks);
        assert!(second.entry.id > first.entry.id);
    }

    #[test]
    fn test_add_food_entry_validates_input() {
        let db = Database::in_memory().unwrap();
        assert!(add_food_entry(&db, &oats(), "brunch", 50.0, None, at(10, 8)).is_err());
        assert!(add_food_entry(&db, &oats(), "lunch", 0.0, None, at(10, 8)).is_err());
        assert!(add_food_entry(&db, &oats(), "lunch", 50.0, Some("cup"), at(10, 8)).is_err());

        let mut unnamed = oats();
        unnamed.name = "  ".to_string();
        assert!(add_food_entry(&db, &unnamed, "lunch", 50.0, None, at(10, 8)).is_err());
    }

    #[test]
    fn test_add_by_id_and_delete() {
        let db = Database::in_memory().unwrap();
        let first = add_food_entry(&db, &oats(), "breakfast", 50.0, None, at(10, 8)).unwrap();

        let again = add_food_entry_by_id(&db, first.food_id, "lunch", 200.0, None, at(10, 12)).unwrap();
        assert_eq!(again.usage_count, 2);
        assert!((again.entry.nutrition.calories - 760.0).abs() < 1e-9);
        assert!(add_food_entry_by_id(&db, 42, "lunch", 10.0, None, at(10, 12)).is_err());

        assert!(delete_food_entry(&db, first.entry.id).unwrap());
        assert!(!delete_food_entry(&db, first.entry.id).unwrap());
    }

    #[test]
    fn test_list_food_entries_with_search() {
        let db = Database::in_memory().unwrap();
        add_food_entry(&db, &oats(), "breakfast", 100.0, None, at(10, 8)).unwrap();
        add_food_entry(&db, &oats(), "breakfast", 100.0, None, at(11, 8)).unwrap();
        let mut rice = oats();
        rice.name = "Rice".to_string();
        add_food_entry(&db, &rice, "dinner", 100.0, None, at(11, 19)).unwrap();

        let anchor = NaiveDate::from_ymd_opt(2024, 5, 11).unwrap();
        let listed = list_food_entries(&db, Period::Week, anchor, None, &Utc).unwrap();
        assert_eq!(listed.entries.len(), 3);
        assert_eq!(listed.entries[0].food_name, "Rice");
        assert_eq!(listed.stats.unique_days, 2);
        assert!((listed.stats.avg_calories_per_day - 570.0).abs() < 1e-9);
        assert_eq!(listed.stats.meals[&MealType::Dinner], 380.0);

        let searched = list_food_entries(&db, Period::All, anchor, Some("oat"), &Utc).unwrap();
        assert_eq!(searched.entries.len(), 2);

        let day = list_food_entries(&db, Period::Day, anchor, None, &Utc).unwrap();
        assert_eq!(day.stats.total_entries, 2);
    }

    #[test]
    fn test_history_overview() {
        let db = Database::in_memory().unwrap();
        assert!(history_overview(&db, &Utc).unwrap().is_none());

        add_food_entry(&db, &oats(), "breakfast", 100.0, None, at(12, 8)).unwrap();
        add_food_entry(&db, &oats(), "lunch", 100.0, None, at(3, 12)).unwrap();
        add_food_entry(&db, &oats(), "dinner", 100.0, None, at(12, 19)).unwrap();

        let overview = history_overview(&db, &Utc).unwrap().unwrap();
        assert_eq!(overview.oldest_date, at(3, 12));
        assert_eq!(overview.newest_date, at(12, 19));
        assert_eq!(overview.unique_days, 2);
        assert_eq!(overview.total_entries, 3);
    }
}
