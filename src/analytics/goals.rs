//! Goal evaluation
//!
//! Compares current totals with the configured targets. Each goal dimension
//! is evaluated independently; disabled dimensions are left out of the
//! active set rather than reported at 0%.

use serde::Serialize;

use crate::models::GoalConfig;

/// How a target is compared against the current value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Reach at least the target (intake, protein)
    Absolute,
    /// Signed net target: negative wants a deficit, positive a surplus
    Net,
}

/// Progress of one goal dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalProgress {
    /// 0-100, capped
    pub progress_percent: f64,
    pub achieved: bool,
    /// Distance still to cover; 0 once achieved
    pub remaining: f64,
    /// Distance past the target; 0 until achieved
    pub overshoot: f64,
}

pub fn evaluate(current: f64, target: f64, kind: GoalKind) -> GoalProgress {
    match kind {
        GoalKind::Absolute => {
            let achieved = target > 0.0 && current >= target;
            let progress_percent = if target > 0.0 {
                (current / target * 100.0).min(100.0)
            } else {
                0.0
            };
            GoalProgress {
                progress_percent,
                achieved,
                remaining: (target - current).max(0.0),
                overshoot: if achieved { (current - target).max(0.0) } else { 0.0 },
            }
        }
        GoalKind::Net => {
            let achieved = if target < 0.0 {
                current <= target
            } else if target > 0.0 {
                current >= target
            } else {
                false
            };
            let magnitude = target.abs();
            let progress_percent = if magnitude > 0.0 {
                (current.abs() / magnitude * 100.0).min(100.0)
            } else {
                0.0
            };
            let distance = (current - target).abs();
            GoalProgress {
                progress_percent,
                achieved,
                remaining: if achieved { 0.0 } else { distance },
                overshoot: if achieved { distance } else { 0.0 },
            }
        }
    }
}

/// Goal dimension identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalId {
    Calorie,
    Protein,
    Net,
}

/// An enabled goal with its progress and display copy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalCard {
    pub id: GoalId,
    pub label: String,
    pub unit: &'static str,
    pub current: f64,
    pub target: f64,
    pub progress: GoalProgress,
    pub status_label: String,
    pub meta_label: String,
}

/// Today's values the goals are measured against
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GoalInputs {
    pub intake: f64,
    pub protein: f64,
    /// Intake minus exercise burn
    pub net: f64,
}

/// Evaluate every enabled goal dimension, in display order
pub fn active_goals(goals: &GoalConfig, inputs: &GoalInputs) -> Vec<GoalCard> {
    let mut cards = Vec::new();

    if goals.calorie_target > 0.0 {
        cards.push(absolute_card(
            GoalId::Calorie,
            "Calorie Intake Goal",
            "kcal",
            inputs.intake,
            goals.calorie_target,
        ));
    }

    if goals.protein_target > 0.0 {
        cards.push(absolute_card(
            GoalId::Protein,
            "Protein Goal",
            "g",
            inputs.protein,
            goals.protein_target,
        ));
    }

    if goals.net_target != 0.0 && goals.net_target.is_finite() {
        cards.push(net_card(inputs.net, goals.net_target));
    }

    cards
}

fn absolute_card(id: GoalId, label: &str, unit: &'static str, current: f64, target: f64) -> GoalCard {
    let progress = evaluate(current, target, GoalKind::Absolute);
    let remaining = progress.remaining.round() as i64;

    let (status_label, meta_label) = if progress.achieved {
        let over = (current - target).round() as i64;
        let meta = if over > 0 {
            format!("{} {} over target", over, unit)
        } else {
            "On target".to_string()
        };
        ("Goal met".to_string(), meta)
    } else {
        (
            format!("{} {} remaining", remaining, unit),
            format!("{} {} to go", remaining, unit),
        )
    };

    GoalCard {
        id,
        label: label.to_string(),
        unit,
        current,
        target,
        progress,
        status_label,
        meta_label,
    }
}

fn net_card(current: f64, target: f64) -> GoalCard {
    let progress = evaluate(current, target, GoalKind::Net);
    let deficit = target < 0.0;
    let difference = (current - target).round().abs() as i64;

    let status_label = if progress.achieved {
        "Goal met".to_string()
    } else if deficit {
        format!("{} kcal more deficit needed", difference)
    } else {
        format!("{} kcal more surplus needed", difference)
    };

    let meta_label = match (progress.achieved, deficit) {
        (true, _) if difference == 0 => "On target".to_string(),
        (true, true) => format!("{} kcal deeper deficit than target", difference),
        (true, false) => format!("{} kcal beyond target", difference),
        (false, true) => format!("{} kcal to deficit goal", difference),
        (false, false) => format!("{} kcal to surplus goal", difference),
    };

    GoalCard {
        id: GoalId::Net,
        label: if deficit { "Calorie Deficit Goal" } else { "Calorie Surplus Goal" }.to_string(),
        unit: "kcal",
        current,
        target,
        progress,
        status_label,
        meta_label,
    }
}
