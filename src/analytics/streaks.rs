//! Streaks, levels and achievements
//!
//! Everything here is derived from the record timeline on each call. There is
//! no stored "unlocked" flag: deleting records can lock an achievement again.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate, TimeZone};
use serde::Serialize;

use crate::models::{AchievementState, Dated, FoodEntry, MealType};
use super::buckets::{bucket, Period};

/// How far back the streak walk looks
pub const STREAK_HORIZON_DAYS: u32 = 365;

const ENTRIES_PER_LEVEL: usize = 10;

/// Consecutive days with at least one food entry, ending today or yesterday.
///
/// An empty `today` does not break the streak; the walk starts from
/// yesterday instead. The first fully missed day after that ends it.
pub fn current_streak<Tz: TimeZone>(entries: &[FoodEntry], today: NaiveDate, tz: &Tz) -> u32 {
    let logged: HashSet<NaiveDate> = entries.iter().map(|e| e.local_day(tz)).collect();

    let mut streak = 0;
    for offset in 0..STREAK_HORIZON_DAYS {
        let Some(day) = today.checked_sub_days(Days::new(u64::from(offset))) else {
            break;
        };
        if logged.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }
    streak
}

/// Days on which breakfast, lunch, dinner and snacks were all logged
pub fn perfect_days<Tz: TimeZone>(entries: &[FoodEntry], tz: &Tz) -> u32 {
    let mut slots: HashMap<NaiveDate, HashSet<MealType>> = HashMap::new();
    for entry in entries.iter().filter(|e| e.meal_type.is_primary()) {
        slots.entry(entry.local_day(tz)).or_default().insert(entry.meal_type);
    }
    slots
        .values()
        .filter(|s| s.len() == MealType::PRIMARY.len())
        .count() as u32
}

/// Level from total entries, starting at 1
pub fn level(total_entries: usize) -> u32 {
    (total_entries / ENTRIES_PER_LEVEL) as u32 + 1
}

/// Percent of the way to the next level
pub fn progress_to_next_level(total_entries: usize) -> f64 {
    (total_entries % ENTRIES_PER_LEVEL) as f64 / ENTRIES_PER_LEVEL as f64 * 100.0
}

/// Cumulative stats the achievement catalog is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AchievementStats {
    pub total_entries: u32,
    pub streak: u32,
    pub perfect_days: u32,
    pub level: u32,
    pub progress_to_next_level: f64,
    pub body_comp_entries: u32,
    pub today_entries: u32,
}

impl AchievementStats {
    pub fn compute<Tz: TimeZone>(
        entries: &[FoodEntry],
        body_comp_entries: usize,
        today: NaiveDate,
        tz: &Tz,
    ) -> Self {
        let today_entries = entries.iter().filter(|e| e.local_day(tz) == today).count();
        Self {
            total_entries: entries.len() as u32,
            streak: current_streak(entries, today, tz),
            perfect_days: perfect_days(entries, tz),
            level: level(entries.len()),
            progress_to_next_level: progress_to_next_level(entries.len()),
            body_comp_entries: body_comp_entries as u32,
            today_entries: today_entries as u32,
        }
    }

    fn metric(&self, metric: Metric) -> u32 {
        match metric {
            Metric::TotalEntries => self.total_entries,
            Metric::Streak => self.streak,
            Metric::PerfectDays => self.perfect_days,
            Metric::Level => self.level,
            Metric::BodyCompEntries => self.body_comp_entries,
        }
    }
}

impl From<&AchievementStats> for AchievementState {
    fn from(stats: &AchievementStats) -> Self {
        Self {
            streak: stats.streak,
            total_entries: stats.total_entries,
            perfect_days: stats.perfect_days,
            level: stats.level,
        }
    }
}

/// Stat an achievement rule reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalEntries,
    Streak,
    PerfectDays,
    Level,
    BodyCompEntries,
}

/// An unlock condition: `metric >= threshold`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementRule {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub metric: Metric,
    pub threshold: u32,
}

pub const CATALOG: [AchievementRule; 9] = [
    AchievementRule {
        id: "first-entry",
        title: "First Steps",
        description: "Log your first meal",
        metric: Metric::TotalEntries,
        threshold: 1,
    },
    AchievementRule {
        id: "week-streak",
        title: "Week Warrior",
        description: "Maintain a 7-day streak",
        metric: Metric::Streak,
        threshold: 7,
    },
    AchievementRule {
        id: "month-streak",
        title: "Monthly Master",
        description: "Maintain a 30-day streak",
        metric: Metric::Streak,
        threshold: 30,
    },
    AchievementRule {
        id: "perfect-day",
        title: "Perfect Day",
        description: "Track all 4 meals in a day",
        metric: Metric::PerfectDays,
        threshold: 1,
    },
    AchievementRule {
        id: "perfect-week",
        title: "Perfect Week",
        description: "Track all meals on 7 days",
        metric: Metric::PerfectDays,
        threshold: 7,
    },
    AchievementRule {
        id: "century",
        title: "Century Club",
        description: "Log 100 entries",
        metric: Metric::TotalEntries,
        threshold: 100,
    },
    AchievementRule {
        id: "kfa-tracker",
        title: "Body Aware",
        description: "Track your KFA 5 times",
        metric: Metric::BodyCompEntries,
        threshold: 5,
    },
    AchievementRule {
        id: "level-5",
        title: "Rising Star",
        description: "Reach level 5",
        metric: Metric::Level,
        threshold: 5,
    },
    AchievementRule {
        id: "level-10",
        title: "Expert Tracker",
        description: "Reach level 10",
        metric: Metric::Level,
        threshold: 10,
    },
];

/// A catalog entry evaluated against current stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
    /// current / threshold, capped at 1
    pub progress: f64,
}

impl AchievementRule {
    pub fn evaluate(&self, stats: &AchievementStats) -> Achievement {
        let current = stats.metric(self.metric);
        Achievement {
            id: self.id,
            title: self.title,
            description: self.description,
            unlocked: current >= self.threshold,
            progress: (current as f64 / self.threshold as f64).min(1.0),
        }
    }
}

/// Evaluate the whole catalog, in catalog order
pub fn evaluate_catalog(stats: &AchievementStats) -> Vec<Achievement> {
    CATALOG.iter().map(|rule| rule.evaluate(stats)).collect()
}

/// Named band of levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelTier {
    Beginner,
    Advanced,
    Expert,
    Epic,
    Legendary,
}

impl LevelTier {
    pub fn for_level(level: u32) -> Self {
        match level {
            20.. => LevelTier::Legendary,
            15..=19 => LevelTier::Epic,
            10..=14 => LevelTier::Expert,
            5..=9 => LevelTier::Advanced,
            _ => LevelTier::Beginner,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LevelTier::Beginner => "Beginner",
            LevelTier::Advanced => "Advanced",
            LevelTier::Expert => "Expert",
            LevelTier::Epic => "Epic",
            LevelTier::Legendary => "Legendary",
        }
    }
}

pub const LEVEL_MILESTONES: [u32; 6] = [1, 3, 5, 10, 15, 20];

/// A level milestone and whether it has been reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelMilestone {
    pub level: u32,
    pub unlocked: bool,
}

pub fn level_milestones(level: u32) -> Vec<LevelMilestone> {
    LEVEL_MILESTONES
        .iter()
        .map(|&m| LevelMilestone {
            level: m,
            unlocked: level >= m,
        })
        .collect()
}

/// Entry count and calories of one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub entries: u32,
    pub calories: f64,
    pub active: bool,
}

/// Per-day logging activity over the last `days` days, chronological
pub fn activity_series<Tz: TimeZone>(
    entries: &[FoodEntry],
    days: u32,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<ActivityDay> {
    bucket(entries, Period::Rolling(days), today, tz)
        .into_iter()
        .map(|b| ActivityDay {
            date: b.day,
            entries: b.items.len() as u32,
            calories: b.items.iter().map(|e| e.nutrition.calories).sum(),
            active: !b.items.is_empty(),
        })
        .collect()
}

/// Share of the last seven days with any entry, as a rounded percentage
pub fn consistency_score<Tz: TimeZone>(entries: &[FoodEntry], today: NaiveDate, tz: &Tz) -> u32 {
    let week = activity_series(entries, 7, today, tz);
    let active = week.iter().filter(|d| d.active).count();
    (active as f64 / 7.0 * 100.0).round() as u32
}
