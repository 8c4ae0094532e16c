//! Calorie Tracker Library
//!
//! Nutrition, exercise and body-composition tracking: record stores, the
//! aggregation engine and the workflows built on them.

pub mod analytics;
pub mod config;
pub mod db;
pub mod models;
pub mod tools;
