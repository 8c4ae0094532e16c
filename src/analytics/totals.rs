//! Nutrition aggregation
//!
//! Sums nutrient fields per bucket and over periods, and derives the meal,
//! macro and daily-value breakdowns shown alongside them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{FoodEntry, MealType, Nutrient, Nutrition};
use super::buckets::DayBucket;

/// Reference daily values for tracked micronutrients
pub const DAILY_VALUES: [(Nutrient, f64); 15] = [
    (Nutrient::Fiber, 30.0),
    (Nutrient::Sugar, 50.0),
    (Nutrient::VitaminA, 900.0),
    (Nutrient::VitaminC, 90.0),
    (Nutrient::VitaminD, 20.0),
    (Nutrient::VitaminE, 15.0),
    (Nutrient::VitaminK, 120.0),
    (Nutrient::VitaminB6, 1.7),
    (Nutrient::VitaminB12, 2.4),
    (Nutrient::Calcium, 1000.0),
    (Nutrient::Iron, 18.0),
    (Nutrient::Magnesium, 400.0),
    (Nutrient::Potassium, 3500.0),
    (Nutrient::Sodium, 2300.0),
    (Nutrient::Zinc, 11.0),
];

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Sum every nutrient over a set of entries
pub fn aggregate<'a, I>(entries: I) -> Nutrition
where
    I: IntoIterator<Item = &'a FoodEntry>,
{
    entries.into_iter().map(|e| &e.nutrition).sum()
}

/// Totals for one day
#[derive(Debug, Clone, Serialize)]
pub struct DayTotals {
    pub date: NaiveDate,
    pub entry_count: usize,
    pub totals: Nutrition,
}

/// Per-bucket totals, in bucket order
pub fn bucket_totals(buckets: &[DayBucket<'_, FoodEntry>]) -> Vec<DayTotals> {
    buckets
        .iter()
        .map(|b| DayTotals {
            date: b.day,
            entry_count: b.items.len(),
            totals: aggregate(b.items.iter().copied()),
        })
        .collect()
}

/// Averages over a bucket sequence.
///
/// `average_per_active_day` divides by days that have at least one entry;
/// `average_per_calendar_day` divides by every bucket, empty days included.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodAverages {
    pub totals: Nutrition,
    pub entry_count: usize,
    pub active_days: usize,
    pub calendar_days: usize,
    pub average_per_active_day: Nutrition,
    pub average_per_calendar_day: Nutrition,
}

pub fn period_average(buckets: &[DayBucket<'_, FoodEntry>]) -> PeriodAverages {
    let totals: Nutrition = buckets
        .iter()
        .map(|b| aggregate(b.items.iter().copied()))
        .sum();
    let entry_count = buckets.iter().map(|b| b.items.len()).sum();
    let active_days = buckets.iter().filter(|b| !b.is_empty()).count();
    let calendar_days = buckets.len();

    PeriodAverages {
        totals,
        entry_count,
        active_days,
        calendar_days,
        average_per_active_day: totals.per(active_days as f64),
        average_per_calendar_day: totals.per(calendar_days as f64),
    }
}

/// Calories per meal slot; every slot is present, zero when unused
pub fn meal_breakdown<'a, I>(entries: I) -> BTreeMap<MealType, f64>
where
    I: IntoIterator<Item = &'a FoodEntry>,
{
    let mut breakdown: BTreeMap<MealType, f64> =
        MealType::ALL.into_iter().map(|m| (m, 0.0)).collect();
    for entry in entries {
        *breakdown.entry(entry.meal_type).or_insert(0.0) += entry.nutrition.calories;
    }
    breakdown
}

/// Energy contributed by each macronutrient
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroSplit {
    pub protein_kcal: f64,
    pub carbs_kcal: f64,
    pub fat_kcal: f64,
}

impl MacroSplit {
    pub fn total_kcal(&self) -> f64 {
        self.protein_kcal + self.carbs_kcal + self.fat_kcal
    }

    /// Share of each macro in percent; zeros when nothing was eaten
    pub fn percentages(&self) -> (f64, f64, f64) {
        let total = self.total_kcal();
        if total <= 0.0 {
            return (0.0, 0.0, 0.0);
        }
        (
            self.protein_kcal / total * 100.0,
            self.carbs_kcal / total * 100.0,
            self.fat_kcal / total * 100.0,
        )
    }
}

pub fn macro_calorie_split(totals: &Nutrition) -> MacroSplit {
    MacroSplit {
        protein_kcal: totals.protein * KCAL_PER_G_PROTEIN,
        carbs_kcal: totals.carbs * KCAL_PER_G_CARBS,
        fat_kcal: totals.fat * KCAL_PER_G_FAT,
    }
}

/// Intake of one nutrient against its reference daily value
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DailyValue {
    pub nutrient: Nutrient,
    pub amount: f64,
    pub reference: f64,
    pub unit: &'static str,
    /// Uncapped, so overconsumption (sodium, sugar) stays visible
    pub percent: f64,
}

pub fn daily_value_percentages(totals: &Nutrition) -> Vec<DailyValue> {
    DAILY_VALUES
        .iter()
        .map(|&(nutrient, reference)| {
            let amount = totals.get(nutrient);
            DailyValue {
                nutrient,
                amount,
                reference,
                unit: nutrient.unit(),
                percent: if reference > 0.0 { amount / reference * 100.0 } else { 0.0 },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::buckets::{bucket, Period};
    use crate::models::Unit;
    use chrono::{TimeZone, Utc};

    fn entry(id: i64, day: u32, meal_type: MealType, calories: f64, protein: f64) -> FoodEntry {
        FoodEntry {
            id,
            date: Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap(),
            meal_type,
            food_name: format!("food {}", id),
            amount: 100.0,
            unit: Unit::G,
            nutrition: Nutrition {
                calories,
                protein,
                carbs: 10.0,
                fat: 2.0,
                sodium: 50.0,
                ..Default::default()
            },
            is_supplement: false,
        }
    }

    fn sample() -> Vec<FoodEntry> {
        vec![
            entry(1, 1, MealType::Breakfast, 400.0, 20.0),
            entry(2, 1, MealType::Lunch, 600.0, 35.0),
            entry(3, 3, MealType::Dinner, 800.0, 50.0),
            entry(4, 7, MealType::Snacks, 200.0, 5.0),
        ]
    }

    #[test]
    fn test_bucket_totals_are_additive() {
        let entries = sample();
        let anchor = chrono::NaiveDate::from_ymd_opt(2024, 5, 7).unwrap();
        let buckets = bucket(&entries, Period::Rolling(7), anchor, &Utc);

        let per_bucket: Nutrition = bucket_totals(&buckets).iter().map(|d| &d.totals).sum();
        let overall = aggregate(&entries);
        for nutrient in Nutrient::ALL {
            assert!((per_bucket.get(nutrient) - overall.get(nutrient)).abs() < 1e-9);
        }
        assert_eq!(overall.calories, 2000.0);
    }

    #[test]
    fn test_period_average_both_rules() {
        let entries = sample();
        let anchor = chrono::NaiveDate::from_ymd_opt(2024, 5, 7).unwrap();
        let buckets = bucket(&entries, Period::Rolling(7), anchor, &Utc);

        let averages = period_average(&buckets);
        assert_eq!(averages.calendar_days, 7);
        assert_eq!(averages.active_days, 3);
        assert_eq!(averages.entry_count, 4);
        assert!((averages.average_per_active_day.calories - 2000.0 / 3.0).abs() < 1e-9);
        assert!((averages.average_per_calendar_day.calories - 2000.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_period_average_is_zero() {
        let entries: Vec<FoodEntry> = Vec::new();
        let averages = period_average(&bucket(&entries, Period::All, Default::default(), &Utc));
        assert_eq!(averages.calendar_days, 0);
        assert_eq!(averages.average_per_active_day, Nutrition::zero());
        assert_eq!(averages.average_per_calendar_day, Nutrition::zero());
    }

    #[test]
    fn test_meal_breakdown_has_every_slot() {
        let entries = sample();
        let breakdown = meal_breakdown(&entries);
        assert_eq!(breakdown.len(), 5);
        assert_eq!(breakdown[&MealType::Dinner], 800.0);
        assert_eq!(breakdown[&MealType::Supplements], 0.0);
    }

    #[test]
    fn test_macro_split() {
        let totals = Nutrition {
            protein: 100.0,
            carbs: 200.0,
            fat: 50.0,
            ..Default::default()
        };
        let split = macro_calorie_split(&totals);
        assert_eq!(split.protein_kcal, 400.0);
        assert_eq!(split.carbs_kcal, 800.0);
        assert_eq!(split.fat_kcal, 450.0);
        assert_eq!(split.total_kcal(), 1650.0);
        assert_eq!(MacroSplit::default().percentages(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_daily_values() {
        let totals = Nutrition {
            sodium: 4600.0,
            iron: 9.0,
            ..Default::default()
        };
        let values = daily_value_percentages(&totals);
        let sodium = values.iter().find(|v| v.nutrient == Nutrient::Sodium).unwrap();
        let iron = values.iter().find(|v| v.nutrient == Nutrient::Iron).unwrap();
        assert_eq!(sodium.percent, 200.0);
        assert_eq!(iron.percent, 50.0);
        assert_eq!(iron.unit, "mg");
    }
}
