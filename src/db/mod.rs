//! Database module
//!
//! SQLite-backed key-value storage for the tracker's JSON stores.

pub mod connection;
pub mod kv;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
