//! Energy balance
//!
//! Combines intake with exercise burn into per-day net calories and period
//! summaries with deficit/surplus day counts and best days.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::models::{ExerciseEntry, FoodEntry};
use super::buckets::{bucket, Period};

/// Sign of a day's net calories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    Surplus,
    Deficit,
    Balanced,
}

impl BalanceStatus {
    pub fn from_net(net: f64) -> Self {
        if net > 0.0 {
            BalanceStatus::Surplus
        } else if net < 0.0 {
            BalanceStatus::Deficit
        } else {
            BalanceStatus::Balanced
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceStatus::Surplus => "surplus",
            BalanceStatus::Deficit => "deficit",
            BalanceStatus::Balanced => "balanced",
        }
    }
}

/// Net result of intake minus burn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Balance {
    pub net: f64,
    pub status: BalanceStatus,
}

pub fn daily_balance(intake: f64, burned: f64) -> Balance {
    let net = intake - burned;
    Balance {
        net,
        status: BalanceStatus::from_net(net),
    }
}

/// One day's intake, burn and net
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyBalance {
    pub date: NaiveDate,
    pub intake: f64,
    pub burned: f64,
    pub net: f64,
    pub status: BalanceStatus,
}

impl DailyBalance {
    pub fn new(date: NaiveDate, intake: f64, burned: f64) -> Self {
        let balance = daily_balance(intake, burned);
        Self {
            date,
            intake,
            burned,
            net: balance.net,
            status: balance.status,
        }
    }
}

/// Per-day balances for a period, chronological.
///
/// For `Period::All` a day is present when it has food or exercise.
pub fn daily_balances<Tz: TimeZone>(
    entries: &[FoodEntry],
    exercises: &[ExerciseEntry],
    period: Period,
    anchor: NaiveDate,
    tz: &Tz,
) -> Vec<DailyBalance> {
    let mut days: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for b in bucket(entries, period, anchor, tz) {
        let intake: f64 = b.items.iter().map(|e| e.nutrition.calories).sum();
        days.entry(b.day).or_default().0 += intake;
    }
    for b in bucket(exercises, period, anchor, tz) {
        let burned: f64 = b.items.iter().map(|e| e.calories_burned).sum();
        days.entry(b.day).or_default().1 += burned;
    }

    days.into_iter()
        .map(|(date, (intake, burned))| DailyBalance::new(date, intake, burned))
        .collect()
}

/// Aggregate view of a run of daily balances
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub day_count: usize,
    pub total_intake: f64,
    pub total_burned: f64,
    pub total_net: f64,
    pub avg_intake: f64,
    pub avg_burned: f64,
    pub avg_net: f64,
    pub deficit_day_count: usize,
    pub surplus_day_count: usize,
    pub balanced_day_count: usize,
    /// Most negative net; earliest on ties; absent without a deficit day
    pub best_deficit_day: Option<DailyBalance>,
    /// Most positive net; earliest on ties; absent without a surplus day
    pub best_surplus_day: Option<DailyBalance>,
}

pub fn period_summary(balances: &[DailyBalance]) -> PeriodSummary {
    let mut chronological: Vec<&DailyBalance> = balances.iter().collect();
    chronological.sort_by_key(|b| b.date);

    let mut summary = PeriodSummary {
        day_count: balances.len(),
        total_intake: 0.0,
        total_burned: 0.0,
        total_net: 0.0,
        avg_intake: 0.0,
        avg_burned: 0.0,
        avg_net: 0.0,
        deficit_day_count: 0,
        surplus_day_count: 0,
        balanced_day_count: 0,
        best_deficit_day: None,
        best_surplus_day: None,
    };

    for day in chronological {
        summary.total_intake += day.intake;
        summary.total_burned += day.burned;
        summary.total_net += day.net;

        match day.status {
            BalanceStatus::Deficit => {
                summary.deficit_day_count += 1;
                // Strict comparison keeps the earliest of equal days
                if summary.best_deficit_day.map_or(true, |best| day.net < best.net) {
                    summary.best_deficit_day = Some(*day);
                }
            }
            BalanceStatus::Surplus => {
                summary.surplus_day_count += 1;
                if summary.best_surplus_day.map_or(true, |best| day.net > best.net) {
                    summary.best_surplus_day = Some(*day);
                }
            }
            BalanceStatus::Balanced => summary.balanced_day_count += 1,
        }
    }

    if summary.day_count > 0 {
        let n = summary.day_count as f64;
        summary.avg_intake = summary.total_intake / n;
        summary.avg_burned = summary.total_burned / n;
        summary.avg_net = summary.total_net / n;
    }

    summary
}
