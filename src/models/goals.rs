//! Goal configuration model
//!
//! Daily targets and the built-in presets that seed them.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::kv::{self, USER_GOALS_KEY};
use crate::db::DbResult;

/// Named goal preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalFocus {
    MuscleGain,
    FatLoss,
    Maintenance,
    #[default]
    #[serde(other)]
    Custom,
}

/// Preset target values and copy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalPreset {
    pub focus: GoalFocus,
    pub label: &'static str,
    pub description: &'static str,
    pub calorie_target: f64,
    pub protein_target: f64,
    pub net_target: f64,
}

impl GoalFocus {
    pub const ALL: [GoalFocus; 4] = [
        GoalFocus::Custom,
        GoalFocus::MuscleGain,
        GoalFocus::FatLoss,
        GoalFocus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalFocus::Custom => "custom",
            GoalFocus::MuscleGain => "muscle_gain",
            GoalFocus::FatLoss => "fat_loss",
            GoalFocus::Maintenance => "maintenance",
        }
    }

    /// Unknown names fall back to custom
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "muscle_gain" => GoalFocus::MuscleGain,
            "fat_loss" => GoalFocus::FatLoss,
            "maintenance" => GoalFocus::Maintenance,
            _ => GoalFocus::Custom,
        }
    }

    pub fn preset(&self) -> GoalPreset {
        match self {
            GoalFocus::Custom => GoalPreset {
                focus: *self,
                label: "Custom",
                description: "Set your own targets manually.",
                calorie_target: 2000.0,
                protein_target: 150.0,
                net_target: -500.0,
            },
            GoalFocus::MuscleGain => GoalPreset {
                focus: *self,
                label: "Muscle Gain",
                description: "Support hypertrophy with a surplus and higher protein intake.",
                calorie_target: 2800.0,
                protein_target: 180.0,
                net_target: 250.0,
            },
            GoalFocus::FatLoss => GoalPreset {
                focus: *self,
                label: "Fat Loss",
                description: "Moderate deficit with elevated protein to maintain lean mass.",
                calorie_target: 1900.0,
                protein_target: 170.0,
                net_target: -500.0,
            },
            GoalFocus::Maintenance => GoalPreset {
                focus: *self,
                label: "Maintenance",
                description: "Keep calories and net balance level for recomposition phases.",
                calorie_target: 2300.0,
                protein_target: 160.0,
                net_target: 0.0,
            },
        }
    }
}

/// Current daily targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoalConfig {
    pub focus: GoalFocus,
    /// kcal, >= 0
    pub calorie_target: f64,
    /// grams, >= 0
    pub protein_target: f64,
    /// kcal; negative = deficit, positive = surplus, 0 = no net goal
    pub net_target: f64,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self::from_focus(GoalFocus::Custom)
    }
}

impl GoalConfig {
    /// Targets supplied by a preset
    pub fn from_focus(focus: GoalFocus) -> Self {
        let preset = focus.preset();
        Self {
            focus,
            calorie_target: preset.calorie_target,
            protein_target: preset.protein_target,
            net_target: preset.net_target,
        }
    }

    /// Clamp absolute targets to be non-negative and scrub non-finite values
    pub fn sanitized(&self) -> Self {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            focus: self.focus,
            calorie_target: finite(self.calorie_target).max(0.0),
            protein_target: finite(self.protein_target).max(0.0),
            net_target: finite(self.net_target),
        }
    }

    /// Load the stored goals
    pub fn load(conn: &Connection) -> DbResult<Self> {
        kv::load(conn, USER_GOALS_KEY)
    }

    /// Replace the stored goals wholesale
    pub fn save(&self, conn: &Connection) -> DbResult<Self> {
        let goals = self.sanitized();
        kv::save(conn, USER_GOALS_KEY, &goals)?;
        Ok(goals)
    }
}
