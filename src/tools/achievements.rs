//! Achievement tools
//!
//! Everything is recomputed from the stores on each call. The cached
//! achievement state is only written by refresh_achievements.

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;
use tracing::info;

use crate::analytics::{
    activity_series, consistency_score, evaluate_catalog, level_milestones, Achievement,
    AchievementStats, ActivityDay, LevelMilestone, LevelTier,
};
use crate::db::Database;
use crate::models::{AchievementState, BodyCompositionEntry, FoodEntry};

/// Days covered by the activity series
pub const ACTIVITY_DAYS: u32 = 30;

/// Response for achievement_report
#[derive(Debug, Serialize)]
pub struct AchievementReport {
    pub stats: AchievementStats,
    pub achievements: Vec<Achievement>,
    pub unlocked_count: usize,
    pub tier: LevelTier,
    pub tier_name: &'static str,
    pub milestones: Vec<LevelMilestone>,
    /// Percent of the last seven days with entries
    pub consistency_score: u32,
    /// Chronological
    pub activity: Vec<ActivityDay>,
}

fn compute<Tz: TimeZone>(
    db: &Database,
    today: NaiveDate,
    tz: &Tz,
) -> Result<(Vec<FoodEntry>, AchievementStats), String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entries = FoodEntry::list(&conn)
        .map_err(|e| format!("Failed to list food entries: {}", e))?;
    let measurements = BodyCompositionEntry::list(&conn)
        .map_err(|e| format!("Failed to list measurements: {}", e))?;

    let stats = AchievementStats::compute(&entries, measurements.len(), today, tz);
    Ok((entries, stats))
}

/// Stats, catalog and progress indicators
pub fn achievement_report<Tz: TimeZone>(
    db: &Database,
    today: NaiveDate,
    tz: &Tz,
) -> Result<AchievementReport, String> {
    let (entries, stats) = compute(db, today, tz)?;

    let achievements = evaluate_catalog(&stats);
    let unlocked_count = achievements.iter().filter(|a| a.unlocked).count();
    let tier = LevelTier::for_level(stats.level);

    Ok(AchievementReport {
        achievements,
        unlocked_count,
        tier,
        tier_name: tier.name(),
        milestones: level_milestones(stats.level),
        consistency_score: consistency_score(&entries, today, tz),
        activity: activity_series(&entries, ACTIVITY_DAYS, today, tz),
        stats,
    })
}

/// Recompute the stats and overwrite the cached achievement state
pub fn refresh_achievements<Tz: TimeZone>(
    db: &Database,
    today: NaiveDate,
    tz: &Tz,
) -> Result<AchievementState, String> {
    let (_, stats) = compute(db, today, tz)?;
    let state = AchievementState::from(&stats);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    state
        .save(&conn)
        .map_err(|e| format!("Failed to save achievements: {}", e))?;

    info!(
        streak = state.streak,
        total_entries = state.total_entries,
        perfect_days = state.perfect_days,
        level = state.level,
        "achievements refreshed"
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodDefinitionCreate, Nutrition, Unit};
    use crate::tools::{body_composition, entries};
    use chrono::{Duration, Utc};

    fn snack() -> FoodDefinitionCreate {
        FoodDefinitionCreate {
            name: "Apple".to_string(),
            unit: Unit::G,
            is_supplement: false,
            nutrition: Nutrition {
                calories: 52.0,
                ..Default::default()
            },
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn log(db: &Database, days_ago: i64, meal: &str) {
        let day = today() - Duration::days(days_ago);
        let at = Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap());
        entries::add_food_entry(db, &snack(), meal, 100.0, None, at).unwrap();
    }

    #[test]
    fn test_report_and_refresh() {
        let db = Database::in_memory().unwrap();
        for meal in ["breakfast", "lunch", "dinner", "snacks"] {
            log(&db, 1, meal);
        }
        log(&db, 2, "lunch");
        for month in 1..=5 {
            let at = Utc.with_ymd_and_hms(2024, month, 1, 7, 0, 0).unwrap();
            body_composition::add_measurement(&db, 20.0, 80.0, at, None).unwrap();
        }

        let report = achievement_report(&db, today(), &Utc).unwrap();
        assert_eq!(report.stats.total_entries, 5);
        assert_eq!(report.stats.streak, 2);
        assert_eq!(report.stats.perfect_days, 1);
        assert_eq!(report.stats.today_entries, 0);
        assert_eq!(report.tier, LevelTier::Beginner);
        assert_eq!(report.consistency_score, 29);
        assert_eq!(report.activity.len(), ACTIVITY_DAYS as usize);

        let unlocked: Vec<&str> = report
            .achievements
            .iter()
            .filter(|a| a.unlocked)
            .map(|a| a.id)
            .collect();
        assert_eq!(unlocked, vec!["first-entry", "perfect-day", "kfa-tracker"]);
        assert_eq!(report.unlocked_count, 3);

        // The cache is untouched until refreshed
        let conn = db.get_conn().unwrap();
        assert_eq!(AchievementState::load(&conn).unwrap(), AchievementState::default());
        drop(conn);

        let state = refresh_achievements(&db, today(), &Utc).unwrap();
        assert_eq!(state.total_entries, 5);
        assert_eq!(state.streak, 2);
        let conn = db.get_conn().unwrap();
        assert_eq!(AchievementState::load(&conn).unwrap(), state);
    }
}
