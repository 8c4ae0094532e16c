//! Body composition model
//!
//! Body-fat percentage (KFA) measurements with bodyweight.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::kv::{self, KFA_HISTORY_KEY};
use crate::db::DbResult;
use super::record::{impl_record, next_id};

/// One body-fat measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyCompositionEntry {
    pub id: i64,
    pub date: DateTime<Utc>,
    /// Body-fat percentage, 0-100
    pub kfa: f64,
    /// Kilograms
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl_record!(BodyCompositionEntry);

/// Data for creating a new measurement
#[derive(Debug, Clone)]
pub struct BodyCompositionCreate {
    pub date: DateTime<Utc>,
    pub kfa: f64,
    pub weight: f64,
    pub notes: Option<String>,
}

impl BodyCompositionEntry {
    /// Fat mass in kg
    pub fn fat_mass(&self) -> f64 {
        self.weight * self.kfa / 100.0
    }

    /// Lean mass in kg
    pub fn lean_mass(&self) -> f64 {
        self.weight * (1.0 - self.kfa / 100.0)
    }

    /// Load the full measurement history
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        kv::load(conn, KFA_HISTORY_KEY)
    }

    /// Replace the measurement history
    pub fn save_all(conn: &Connection, history: &[Self]) -> DbResult<()> {
        kv::save(conn, KFA_HISTORY_KEY, history)
    }

    /// Record a new measurement
    pub fn create(conn: &Connection, data: &BodyCompositionCreate) -> DbResult<Self> {
        let mut history = Self::list(conn)?;
        let entry = Self {
            id: next_id(&history, Utc::now()),
            date: data.date,
            kfa: data.kfa,
            weight: data.weight,
            notes: data
                .notes
                .as_ref()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        };
        history.push(entry.clone());
        Self::save_all(conn, &history)?;
        Ok(entry)
    }

    /// Delete a measurement
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let mut history = Self::list(conn)?;
        let before = history.len();
        history.retain(|e| e.id != id);
        if history.len() == before {
            return Ok(false);
        }
        Self::save_all(conn, &history)?;
        Ok(true)
    }
}
