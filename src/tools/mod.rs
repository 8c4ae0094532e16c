//! Tracker workflows
//!
//! Load, mutate and summarize the stores. Every tool returns a serializable
//! response or a human-readable error.

pub mod achievements;
pub mod body_composition;
pub mod dashboard;
pub mod data;
pub mod entries;
pub mod exercise;
pub mod foods;
pub mod goals;
pub mod reports;
