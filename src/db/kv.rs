//! Key-value document store
//!
//! Each logical store (entries, foods, history, goals, ...) is persisted as a
//! single JSON document under a fixed key and rewritten in full on mutation.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::connection::DbResult;

pub const FOOD_ENTRIES_KEY: &str = "calorie-entries";
pub const FOOD_DATABASE_KEY: &str = "foods-database";
pub const KFA_HISTORY_KEY: &str = "kfa-history";
pub const EXERCISE_HISTORY_KEY: &str = "exercise-history";
pub const USER_GOALS_KEY: &str = "user-goals";
pub const ACHIEVEMENTS_KEY: &str = "achievements";

/// All store keys, in the order they are cleared
pub const ALL_KEYS: [&str; 6] = [
    FOOD_ENTRIES_KEY,
    FOOD_DATABASE_KEY,
    KFA_HISTORY_KEY,
    EXERCISE_HISTORY_KEY,
    USER_GOALS_KEY,
    ACHIEVEMENTS_KEY,
];

/// Read the raw JSON text stored under a key
pub fn get_raw(conn: &Connection, key: &str) -> DbResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            [key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}

/// Load a document, falling back to `T::default()` when the key is absent
/// or the stored value does not parse.
pub fn load<T>(conn: &Connection, key: &str) -> DbResult<T>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = get_raw(conn, key)? else {
        debug!(key, "store empty, using default");
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(key, error = %e, "malformed store value, using default");
            Ok(T::default())
        }
    }
}

/// Replace the document stored under a key
pub fn save<T>(conn: &Connection, key: &str, value: &T) -> DbResult<()>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    conn.execute(
        r#"
        INSERT INTO kv_store (key, value, updated_at)
        VALUES (?1, ?2, datetime('now'))
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        params![key, json],
    )?;
    debug!(key, bytes = json.len(), "store written");
    Ok(())
}

/// Remove a key entirely
pub fn remove(conn: &Connection, key: &str) -> DbResult<bool> {
    let rows = conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
    Ok(rows > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_missing_key_loads_default() {
        let conn = setup();
        let values: Vec<i64> = load(&conn, FOOD_ENTRIES_KEY).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let conn = setup();
        save(&conn, KFA_HISTORY_KEY, &vec![1, 2, 3]).unwrap();
        save(&conn, KFA_HISTORY_KEY, &vec![4]).unwrap();

        let values: Vec<i64> = load(&conn, KFA_HISTORY_KEY).unwrap();
        assert_eq!(values, vec![4]);
    }

    #[test]
    fn test_malformed_value_loads_default() {
        let conn = setup();
        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)",
            params![EXERCISE_HISTORY_KEY, "{not json"],
        )
        .unwrap();

        let values: Vec<i64> = load(&conn, EXERCISE_HISTORY_KEY).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_remove() {
        let conn = setup();
        save(&conn, USER_GOALS_KEY, &"x").unwrap();
        assert!(remove(&conn, USER_GOALS_KEY).unwrap());
        assert!(!remove(&conn, USER_GOALS_KEY).unwrap());
        assert_eq!(get_raw(&conn, USER_GOALS_KEY).unwrap(), None);
    }
}
