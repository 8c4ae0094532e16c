//! Body composition tools
//!
//! Recording body-fat measurements and reporting the trend.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::info;

use crate::analytics::{
    cumulative_progress, history_window, latest_vs_previous, next_milestone, CumulativeProgress,
    MeasurementChange, MilestoneProgress, TrendDirection,
};
use crate::db::Database;
use crate::models::{BodyCompositionCreate, BodyCompositionEntry};

/// Latest measurement with derived masses
#[derive(Debug, Serialize)]
pub struct MeasurementDetail {
    pub entry: BodyCompositionEntry,
    pub fat_mass: f64,
    pub lean_mass: f64,
}

impl From<&BodyCompositionEntry> for MeasurementDetail {
    fn from(entry: &BodyCompositionEntry) -> Self {
        Self {
            entry: entry.clone(),
            fat_mass: entry.fat_mass(),
            lean_mass: entry.lean_mass(),
        }
    }
}

/// Response for body_composition_report
#[derive(Debug, Serialize)]
pub struct BodyCompositionReport {
    pub latest: Option<MeasurementDetail>,
    pub change: Option<MeasurementChange>,
    pub direction: Option<TrendDirection>,
    pub progress: Option<CumulativeProgress>,
    pub next_milestone: Option<MilestoneProgress>,
    /// Measurements inside the window, chronological
    pub history: Vec<BodyCompositionEntry>,
    pub total_measurements: usize,
}

/// Record a measurement
pub fn add_measurement(
    db: &Database,
    kfa: f64,
    weight: f64,
    date: DateTime<Utc>,
    notes: Option<String>,
) -> Result<BodyCompositionEntry, String> {
    if !(0.0..=100.0).contains(&kfa) {
        return Err("Body fat percentage must be between 0 and 100".to_string());
    }
    if !weight.is_finite() || weight <= 0.0 {
        return Err("Weight must be greater than 0".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entry = BodyCompositionEntry::create(
        &conn,
        &BodyCompositionCreate {
            date,
            kfa,
            weight,
            notes,
        },
    )
    .map_err(|e| format!("Failed to record measurement: {}", e))?;

    info!(id = entry.id, kfa, weight, "body composition recorded");
    Ok(entry)
}

/// Delete a measurement
pub fn delete_measurement(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    BodyCompositionEntry::delete(&conn, id)
        .map_err(|e| format!("Failed to delete measurement: {}", e))
}

/// Trend report; the history is limited to the last `window_days` days
pub fn body_composition_report<Tz: TimeZone>(
    db: &Database,
    window_days: u32,
    today: NaiveDate,
    tz: &Tz,
) -> Result<BodyCompositionReport, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let history = BodyCompositionEntry::list(&conn)
        .map_err(|e| format!("Failed to list measurements: {}", e))?;

    let latest = history.iter().max_by_key(|e| e.date);
    let change = latest_vs_previous(&history);

    Ok(BodyCompositionReport {
        latest: latest.map(MeasurementDetail::from),
        direction: change.map(|c| c.direction()),
        change,
        progress: cumulative_progress(&history),
        next_milestone: latest.and_then(|e| next_milestone(e.kfa)),
        history: history_window(&history, window_days, today, tz)
            .into_iter()
            .cloned()
            .collect(),
        total_measurements: history.len(),
    })
}
