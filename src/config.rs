//! Runtime configuration
//!
//! Resolves where the database lives and opens it.

use std::path::PathBuf;

use crate::db::{migrations, Database, DbResult};

/// Environment variable overriding the database location
pub const DATABASE_PATH_VAR: &str = "CALTRACK_DATABASE_PATH";

const DATABASE_FILE: &str = "caltrack.db";

/// Get the database path from environment or use the default
/// `<project>/data/caltrack.db`
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_database_path())
}

fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push(DATABASE_FILE);
    path
}

/// Open the configured database, creating its directory and applying
/// migrations
pub fn open_database() -> Result<Database, Box<dyn std::error::Error>> {
    let db_path = database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&db_path)?;
    database.with_conn(|conn| -> DbResult<()> {
        migrations::run_migrations(conn)?;
        let version = migrations::get_schema_version(conn)?;
        tracing::info!(path = %db_path.display(), version, "database ready");
        Ok(())
    })?;
    Ok(database)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_ends_with_data_file() {
        let path = default_database_path();
        assert!(path.ends_with("data/caltrack.db"));
    }
}
