//! Goal tools
//!
//! Reading and replacing the daily targets.

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{GoalConfig, GoalFocus, GoalPreset};

/// Request for save_goals; missing targets are treated as 0
#[derive(Debug, Clone, Default)]
pub struct GoalsInput {
    pub focus: Option<String>,
    pub calorie_target: Option<f64>,
    pub protein_target: Option<f64>,
    pub net_target: Option<f64>,
}

/// Preset listing entry
#[derive(Debug, Serialize)]
pub struct PresetOption {
    pub value: &'static str,
    pub preset: GoalPreset,
}

/// Get the current goals
pub fn get_goals(db: &Database) -> Result<GoalConfig, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    GoalConfig::load(&conn).map_err(|e| format!("Failed to load goals: {}", e))
}

/// Replace the goals wholesale. Absolute targets are clamped to 0.
pub fn save_goals(db: &Database, input: &GoalsInput) -> Result<GoalConfig, String> {
    let goals = GoalConfig {
        focus: input
            .focus
            .as_deref()
            .map(GoalFocus::from_str)
            .unwrap_or_default(),
        calorie_target: input.calorie_target.unwrap_or(0.0),
        protein_target: input.protein_target.unwrap_or(0.0),
        net_target: input.net_target.unwrap_or(0.0),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let saved = goals
        .save(&conn)
        .map_err(|e| format!("Failed to save goals: {}", e))?;

    info!(
        focus = saved.focus.as_str(),
        calories = saved.calorie_target,
        protein = saved.protein_target,
        net = saved.net_target,
        "goals saved"
    );
    Ok(saved)
}

/// Restore the default goals
pub fn reset_goals(db: &Database) -> Result<GoalConfig, String> {
    apply_preset(db, GoalFocus::Custom.as_str())
}

/// Replace the goals with a preset's values
pub fn apply_preset(db: &Database, focus: &str) -> Result<GoalConfig, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    GoalConfig::from_focus(GoalFocus::from_str(focus))
        .save(&conn)
        .map_err(|e| format!("Failed to save goals: {}", e))
}

/// All presets with their labels and values
pub fn list_presets() -> Vec<PresetOption> {
    GoalFocus::ALL
        .iter()
        .map(|focus| PresetOption {
            value: focus.as_str(),
            preset: focus.preset(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let db = Database::in_memory().unwrap();
        assert_eq!(get_goals(&db).unwrap(), GoalConfig::default());
    }

    #[test]
    fn test_save_clamps_and_replaces() {
        let db = Database::in_memory().unwrap();
        let input = GoalsInput {
            focus: Some("fat_loss".to_string()),
            calorie_target: Some(-100.0),
            protein_target: Some(140.0),
            net_target: None,
        };
        let saved = save_goals(&db, &input).unwrap();
        assert_eq!(saved.focus, GoalFocus::FatLoss);
        assert_eq!(saved.calorie_target, 0.0);
        assert_eq!(saved.protein_target, 140.0);
        assert_eq!(saved.net_target, 0.0);
        assert_eq!(get_goals(&db).unwrap(), saved);
    }

    #[test]
    fn test_presets() {
        let db = Database::in_memory().unwrap();
        let gain = apply_preset(&db, "muscle_gain").unwrap();
        assert_eq!(gain.calorie_target, 2800.0);
        assert_eq!(gain.net_target, 250.0);

        let reset = reset_goals(&db).unwrap();
        assert_eq!(reset, GoalConfig::default());

        let presets = list_presets();
        assert_eq!(presets.len(), 4);
        assert_eq!(presets[3].preset.label, "Maintenance");
    }
}
