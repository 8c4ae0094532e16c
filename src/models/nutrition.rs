//! Shared nutrition data structure
//!
//! Used by food entries (absolute amounts), food definitions (per 100 units)
//! and every aggregate produced by the analytics engine.

use serde::{Deserialize, Serialize};

/// Nutritional information
///
/// Every field is non-negative. Fields missing from stored JSON read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,      // grams
    pub carbs: f64,        // grams
    pub fat: f64,          // grams
    pub fiber: f64,        // grams
    pub sugar: f64,        // grams
    pub vitamin_a: f64,    // micrograms
    pub vitamin_c: f64,    // milligrams
    pub vitamin_d: f64,    // micrograms
    pub vitamin_e: f64,    // milligrams
    pub vitamin_k: f64,    // micrograms
    pub vitamin_b6: f64,   // milligrams
    pub vitamin_b12: f64,  // micrograms
    pub calcium: f64,      // milligrams
    pub iron: f64,         // milligrams
    pub magnesium: f64,    // milligrams
    pub potassium: f64,    // milligrams
    pub sodium: f64,       // milligrams
    pub zinc: f64,         // milligrams
}

/// A single nutrient field of [`Nutrition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Calories,
    Protein,
    Carbs,
    Fat,
    Fiber,
    Sugar,
    VitaminA,
    VitaminC,
    VitaminD,
    VitaminE,
    VitaminK,
    VitaminB6,
    VitaminB12,
    Calcium,
    Iron,
    Magnesium,
    Potassium,
    Sodium,
    Zinc,
}

impl Nutrient {
    pub const ALL: [Nutrient; 19] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Carbs,
        Nutrient::Fat,
        Nutrient::Fiber,
        Nutrient::Sugar,
        Nutrient::VitaminA,
        Nutrient::VitaminC,
        Nutrient::VitaminD,
        Nutrient::VitaminE,
        Nutrient::VitaminK,
        Nutrient::VitaminB6,
        Nutrient::VitaminB12,
        Nutrient::Calcium,
        Nutrient::Iron,
        Nutrient::Magnesium,
        Nutrient::Potassium,
        Nutrient::Sodium,
        Nutrient::Zinc,
    ];

    /// Micronutrients and the fiber/sugar pair tracked against daily values
    pub const MICROS: [Nutrient; 15] = [
        Nutrient::Fiber,
        Nutrient::Sugar,
        Nutrient::VitaminA,
        Nutrient::VitaminC,
        Nutrient::VitaminD,
        Nutrient::VitaminE,
        Nutrient::VitaminK,
        Nutrient::VitaminB6,
        Nutrient::VitaminB12,
        Nutrient::Calcium,
        Nutrient::Iron,
        Nutrient::Magnesium,
        Nutrient::Potassium,
        Nutrient::Sodium,
        Nutrient::Zinc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Protein => "protein",
            Nutrient::Carbs => "carbs",
            Nutrient::Fat => "fat",
            Nutrient::Fiber => "fiber",
            Nutrient::Sugar => "sugar",
            Nutrient::VitaminA => "vitamin_a",
            Nutrient::VitaminC => "vitamin_c",
            Nutrient::VitaminD => "vitamin_d",
            Nutrient::VitaminE => "vitamin_e",
            Nutrient::VitaminK => "vitamin_k",
            Nutrient::VitaminB6 => "vitamin_b6",
            Nutrient::VitaminB12 => "vitamin_b12",
            Nutrient::Calcium => "calcium",
            Nutrient::Iron => "iron",
            Nutrient::Magnesium => "magnesium",
            Nutrient::Potassium => "potassium",
            Nutrient::Sodium => "sodium",
            Nutrient::Zinc => "zinc",
        }
    }

    /// Display unit for the nutrient
    pub fn unit(&self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            Nutrient::Protein
            | Nutrient::Carbs
            | Nutrient::Fat
            | Nutrient::Fiber
            | Nutrient::Sugar => "g",
            Nutrient::VitaminA
            | Nutrient::VitaminD
            | Nutrient::VitaminK
            | Nutrient::VitaminB12 => "mcg",
            _ => "mg",
        }
    }
}

impl Nutrition {
    /// Create a new Nutrition with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Read one nutrient field
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Carbs => self.carbs,
            Nutrient::Fat => self.fat,
            Nutrient::Fiber => self.fiber,
            Nutrient::Sugar => self.sugar,
            Nutrient::VitaminA => self.vitamin_a,
            Nutrient::VitaminC => self.vitamin_c,
            Nutrient::VitaminD => self.vitamin_d,
            Nutrient::VitaminE => self.vitamin_e,
            Nutrient::VitaminK => self.vitamin_k,
            Nutrient::VitaminB6 => self.vitamin_b6,
            Nutrient::VitaminB12 => self.vitamin_b12,
            Nutrient::Calcium => self.calcium,
            Nutrient::Iron => self.iron,
            Nutrient::Magnesium => self.magnesium,
            Nutrient::Potassium => self.potassium,
            Nutrient::Sodium => self.sodium,
            Nutrient::Zinc => self.zinc,
        }
    }

    /// Apply `f` to every field
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            calories: f(self.calories),
            protein: f(self.protein),
            carbs: f(self.carbs),
            fat: f(self.fat),
            fiber: f(self.fiber),
            sugar: f(self.sugar),
            vitamin_a: f(self.vitamin_a),
            vitamin_c: f(self.vitamin_c),
            vitamin_d: f(self.vitamin_d),
            vitamin_e: f(self.vitamin_e),
            vitamin_k: f(self.vitamin_k),
            vitamin_b6: f(self.vitamin_b6),
            vitamin_b12: f(self.vitamin_b12),
            calcium: f(self.calcium),
            iron: f(self.iron),
            magnesium: f(self.magnesium),
            potassium: f(self.potassium),
            sodium: f(self.sodium),
            zinc: f(self.zinc),
        }
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        self.map(|v| v * multiplier)
    }

    /// Divide every field, yielding zeros when the divisor is zero
    pub fn per(&self, divisor: f64) -> Self {
        if divisor == 0.0 {
            return Self::zero();
        }
        self.map(|v| v / divisor)
    }

    /// Clamp negative values to zero
    pub fn non_negative(&self) -> Self {
        self.map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 })
    }

    /// Add another nutrition to this one
    pub fn add(&self, other: &Nutrition) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            fiber: self.fiber + other.fiber,
            sugar: self.sugar + other.sugar,
            vitamin_a: self.vitamin_a + other.vitamin_a,
            vitamin_c: self.vitamin_c + other.vitamin_c,
            vitamin_d: self.vitamin_d + other.vitamin_d,
            vitamin_e: self.vitamin_e + other.vitamin_e,
            vitamin_k: self.vitamin_k + other.vitamin_k,
            vitamin_b6: self.vitamin_b6 + other.vitamin_b6,
            vitamin_b12: self.vitamin_b12 + other.vitamin_b12,
            calcium: self.calcium + other.calcium,
            iron: self.iron + other.iron,
            magnesium: self.magnesium + other.magnesium,
            potassium: self.potassium + other.potassium,
            sodium: self.sodium + other.sodium,
            zinc: self.zinc + other.zinc,
        }
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Nutrition {
    type Output = Nutrition;

    fn mul(self, multiplier: f64) -> Nutrition {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}

impl<'a> std::iter::Sum<&'a Nutrition> for Nutrition {
    fn sum<I: Iterator<Item = &'a Nutrition>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + *n)
    }
}
