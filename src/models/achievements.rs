//! Achievement state model
//!
//! Display cache of derived progress stats. The analytics engine is the
//! source of truth; this only mirrors its last result.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::kv::{self, ACHIEVEMENTS_KEY};
use crate::db::DbResult;

/// Cached achievement stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AchievementState {
    pub streak: u32,
    pub total_entries: u32,
    pub perfect_days: u32,
    pub level: u32,
}

impl Default for AchievementState {
    fn default() -> Self {
        Self {
            streak: 0,
            total_entries: 0,
            perfect_days: 0,
            level: 1,
        }
    }
}

impl AchievementState {
    pub fn load(conn: &Connection) -> DbResult<Self> {
        kv::load(conn, ACHIEVEMENTS_KEY)
    }

    pub fn save(&self, conn: &Connection) -> DbResult<()> {
        kv::save(conn, ACHIEVEMENTS_KEY, self)
    }
}
