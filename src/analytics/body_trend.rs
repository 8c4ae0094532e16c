//! Body-composition trend
//!
//! Change between measurements, progress since the first measurement and the
//! next body-fat milestone.

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::models::{BodyCompositionEntry, Dated};
use super::buckets::window_start;

/// Body-fat targets, highest first
pub const KFA_MILESTONES: [f64; 6] = [20.0, 18.0, 15.0, 12.0, 10.0, 8.0];

/// Change from the previous measurement to the latest
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementChange {
    pub kfa_change: f64,
    pub weight_change: f64,
}

/// Direction of the latest body-fat change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Regressing,
    Steady,
}

impl TrendDirection {
    pub fn from_kfa_change(change: f64) -> Self {
        if change < 0.0 {
            TrendDirection::Improving
        } else if change > 0.0 {
            TrendDirection::Regressing
        } else {
            TrendDirection::Steady
        }
    }
}

impl MeasurementChange {
    pub fn direction(&self) -> TrendDirection {
        TrendDirection::from_kfa_change(self.kfa_change)
    }
}

fn chronological(history: &[BodyCompositionEntry]) -> Vec<&BodyCompositionEntry> {
    let mut sorted: Vec<&BodyCompositionEntry> = history.iter().collect();
    sorted.sort_by_key(|e| e.date);
    sorted
}

/// Newest two measurements by date; `None` with fewer than two
pub fn latest_vs_previous(history: &[BodyCompositionEntry]) -> Option<MeasurementChange> {
    let sorted = chronological(history);
    match sorted.as_slice() {
        [.., previous, latest] => Some(MeasurementChange {
            kfa_change: latest.kfa - previous.kfa,
            weight_change: latest.weight - previous.weight,
        }),
        _ => None,
    }
}

/// Progress from the first measurement to the latest
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CumulativeProgress {
    pub start_date: NaiveDate,
    pub total_kfa_lost: f64,
    /// kg
    pub total_fat_mass_lost: f64,
    /// kg; positive means lean mass was gained
    pub lean_mass_change: f64,
    pub days_elapsed: i64,
}

pub fn cumulative_progress(history: &[BodyCompositionEntry]) -> Option<CumulativeProgress> {
    let sorted = chronological(history);
    let (first, last) = match sorted.as_slice() {
        [first, .., last] => (*first, *last),
        _ => return None,
    };

    Some(CumulativeProgress {
        start_date: first.date.date_naive(),
        total_kfa_lost: first.kfa - last.kfa,
        total_fat_mass_lost: first.fat_mass() - last.fat_mass(),
        lean_mass_change: last.lean_mass() - first.lean_mass(),
        days_elapsed: (last.date - first.date).num_days(),
    })
}

/// The next body-fat target below the current value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MilestoneProgress {
    pub target: f64,
    /// Share of the current value still to lose, in percent
    pub percent_remaining: f64,
    pub progress_percent: f64,
    pub points_remaining: f64,
}

/// Greatest milestone strictly below `current_kfa`; `None` once at or below
/// the lowest target
pub fn next_milestone(current_kfa: f64) -> Option<MilestoneProgress> {
    let target = KFA_MILESTONES.iter().copied().find(|&m| m < current_kfa)?;
    let points_remaining = current_kfa - target;
    let percent_remaining = points_remaining / current_kfa * 100.0;

    Some(MilestoneProgress {
        target,
        percent_remaining,
        progress_percent: 100.0 - percent_remaining,
        points_remaining,
    })
}

/// Measurements whose local day falls in the last `days` days, chronological
pub fn history_window<'a, Tz: TimeZone>(
    history: &'a [BodyCompositionEntry],
    days: u32,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<&'a BodyCompositionEntry> {
    let Some(start) = window_start(today, days) else {
        return Vec::new();
    };
    chronological(history)
        .into_iter()
        .filter(|e| {
            let day = e.local_day(tz);
            start <= day && day <= today
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn measurement(id: i64, month: u32, day: u32, kfa: f64, weight: f64) -> BodyCompositionEntry {
        BodyCompositionEntry {
            id,
            date: Utc.with_ymd_and_hms(2024, month, day, 7, 30, 0).unwrap(),
            kfa,
            weight,
            notes: None,
        }
    }

    #[test]
    fn test_cumulative_progress() {
        // Stored newest first; ordering comes from the dates
        let history = vec![
            measurement(2, 3, 1, 18.0, 78.0),
            measurement(1, 1, 1, 20.0, 80.0),
        ];
        let progress = cumulative_progress(&history).unwrap();

        assert!((progress.total_kfa_lost - 2.0).abs() < 1e-9);
        assert!((progress.total_fat_mass_lost - 1.96).abs() < 1e-9);
        assert!((progress.lean_mass_change + 0.04).abs() < 1e-9);
        assert_eq!(progress.days_elapsed, 60);
        assert_eq!(progress.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_needs_two_measurements() {
        let single = vec![measurement(1, 1, 1, 20.0, 80.0)];
        assert_eq!(cumulative_progress(&single), None);
        assert_eq!(latest_vs_previous(&single), None);
        assert_eq!(latest_vs_previous(&[]), None);
    }

    #[test]
    fn test_latest_vs_previous() {
        let history = vec![
            measurement(1, 1, 1, 22.0, 82.0),
            measurement(3, 2, 1, 20.5, 80.0),
            measurement(2, 1, 15, 21.0, 81.0),
        ];
        let change = latest_vs_previous(&history).unwrap();
        assert!((change.kfa_change + 0.5).abs() < 1e-9);
        assert!((change.weight_change + 1.0).abs() < 1e-9);
        assert_eq!(change.direction(), TrendDirection::Improving);
        assert_eq!(TrendDirection::from_kfa_change(0.0), TrendDirection::Steady);
    }

    #[test]
    fn test_next_milestone() {
        let next = next_milestone(22.0).unwrap();
        assert_eq!(next.target, 20.0);
        assert!((next.points_remaining - 2.0).abs() < 1e-9);
        assert!((next.percent_remaining - 2.0 / 22.0 * 100.0).abs() < 1e-9);
        assert!((next.progress_percent + next.percent_remaining - 100.0).abs() < 1e-9);

        // Exactly on a milestone moves on to the next one
        assert_eq!(next_milestone(18.0).unwrap().target, 15.0);
        assert_eq!(next_milestone(8.5).unwrap().target, 8.0);
        assert_eq!(next_milestone(8.0), None);
        assert_eq!(next_milestone(6.0), None);
    }

    #[test]
    fn test_history_window() {
        let history = vec![
            measurement(3, 3, 1, 18.0, 78.0),
            measurement(1, 1, 1, 20.0, 80.0),
            measurement(2, 2, 20, 19.0, 79.0),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let window = history_window(&history, 30, today, &Utc);
        let ids: Vec<i64> = window.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3]);

        assert_eq!(history_window(&history, 365, today, &Utc).len(), 3);
        assert!(history_window(&history, 0, today, &Utc).is_empty());
        assert_eq!(history_window(&history, u32::MAX, today, &Utc).len(), 3);
    }
}
